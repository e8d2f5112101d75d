use super::*;
use crate::model::DevicePreference;
use crate::rsa::{ConsensualityPenalty, RsaError};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_glimpse_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("GLIMPSE_MODEL_PATH");
        env::remove_var("GLIMPSE_MODEL_NAME");
        env::remove_var("GLIMPSE_DEVICE");
        env::remove_var("GLIMPSE_MAX_SEQ_LEN");
        env::remove_var("GLIMPSE_RATIONALITY");
        env::remove_var("GLIMPSE_RSA_ITERATIONS");
        env::remove_var("GLIMPSE_BATCH_SIZE");
        env::remove_var("GLIMPSE_CONSENSUALITY_PENALTY");
        env::remove_var("GLIMPSE_CONSENSUALITY_WEIGHT");
        env::remove_var("GLIMPSE_WORKERS");
        env::remove_var("GLIMPSE_OUTPUT_DIR");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.output_dir, PathBuf::from("output"));
    assert!(config.workers >= 1);
    assert!(config.model.model_path.is_none());
    assert_eq!(config.model.model_name, "google/pegasus-arxiv");
    assert_eq!(config.rsa.rationality, 3.0);
    assert_eq!(config.rsa.iterations, 2);
    assert_eq!(config.rsa.batch_size, 16);
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_glimpse_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.output_dir, PathBuf::from("output"));
    assert_eq!(config.workers, default_workers());
    assert_eq!(config.rsa, RsaConfig::default());
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_glimpse_env();

    let config = with_env_vars(
        &[
            ("GLIMPSE_RATIONALITY", "1.5"),
            ("GLIMPSE_RSA_ITERATIONS", "0"),
            ("GLIMPSE_BATCH_SIZE", "4"),
            ("GLIMPSE_WORKERS", "3"),
            ("GLIMPSE_OUTPUT_DIR", "/tmp/glimpse-out"),
            ("GLIMPSE_MODEL_NAME", "t5-small"),
            ("GLIMPSE_DEVICE", "cpu"),
        ],
        Config::from_env,
    )
    .expect("should parse overrides");

    assert_eq!(config.rsa.rationality, 1.5);
    assert_eq!(config.rsa.iterations, 0);
    assert_eq!(config.rsa.batch_size, 4);
    assert_eq!(config.workers, 3);
    assert_eq!(config.output_dir, PathBuf::from("/tmp/glimpse-out"));
    assert_eq!(config.model.model_name, "t5-small");
    assert_eq!(config.model.device, DevicePreference::Cpu);
}

#[test]
#[serial]
fn test_from_env_penalty_and_weight() {
    clear_glimpse_env();

    let config = with_env_vars(
        &[
            ("GLIMPSE_CONSENSUALITY_PENALTY", "multiplicative"),
            ("GLIMPSE_CONSENSUALITY_WEIGHT", "0.5"),
        ],
        Config::from_env,
    )
    .unwrap();

    assert_eq!(
        config.rsa.penalty,
        ConsensualityPenalty::Multiplicative { weight: 0.5 }
    );
}

#[test]
#[serial]
fn test_validate_rejects_bad_env_rationality() {
    clear_glimpse_env();
    let dir = TempDir::new().unwrap();

    let mut config = with_env_vars(&[("GLIMPSE_RATIONALITY", "-2")], Config::from_env)
        .expect("out-of-range values still parse");
    config.output_dir = dir.path().to_path_buf();

    assert_eq!(config.rsa.rationality, -2.0);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Rsa(RsaError::InvalidConfig { .. }))
    ));
}

#[test]
#[serial]
fn test_override_replaces_bad_env_rationality_before_validation() {
    clear_glimpse_env();
    let dir = TempDir::new().unwrap();

    let mut config = with_env_vars(
        &[("GLIMPSE_RATIONALITY", "-2"), ("GLIMPSE_WORKERS", "0")],
        Config::from_env,
    )
    .unwrap();
    config.output_dir = dir.path().to_path_buf();
    config.rsa.rationality = 1.5;
    config.workers = 2;

    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_from_env_rejects_unknown_device() {
    clear_glimpse_env();

    let result = with_env_vars(&[("GLIMPSE_DEVICE", "tpu")], Config::from_env);

    match result {
        Err(ConfigError::Model { reason }) => assert!(reason.contains("GLIMPSE_DEVICE")),
        other => panic!("expected Model error, got {other:?}"),
    }
}

#[test]
#[serial]
fn test_from_env_rejects_unparseable_max_seq_len() {
    clear_glimpse_env();

    let result = with_env_vars(&[("GLIMPSE_MAX_SEQ_LEN", "abc")], Config::from_env);

    match result {
        Err(ConfigError::Model { reason }) => assert!(reason.contains("GLIMPSE_MAX_SEQ_LEN")),
        other => panic!("expected Model error, got {other:?}"),
    }
}

#[test]
#[serial]
fn test_from_env_rejects_unparseable_iterations() {
    clear_glimpse_env();

    let result = with_env_vars(&[("GLIMPSE_RSA_ITERATIONS", "two")], Config::from_env);

    assert!(result.is_err());
}

#[test]
#[serial]
fn test_zero_env_workers_fail_validation() {
    clear_glimpse_env();

    let config = with_env_vars(&[("GLIMPSE_WORKERS", "0")], Config::from_env).unwrap();

    assert_eq!(config.workers, 0);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidWorkers { .. })
    ));
}

#[test]
#[serial]
fn test_from_env_rejects_bad_workers() {
    clear_glimpse_env();

    let result = with_env_vars(&[("GLIMPSE_WORKERS", "many")], Config::from_env);

    match result {
        Err(ConfigError::WorkersParseError { value, .. }) => assert_eq!(value, "many"),
        other => panic!("expected WorkersParseError, got {other:?}"),
    }
}

#[test]
#[serial]
fn test_from_env_empty_model_path_is_none() {
    clear_glimpse_env();

    let config = with_env_vars(&[("GLIMPSE_MODEL_PATH", "  ")], Config::from_env).unwrap();

    assert!(config.model.model_path.is_none());
}

#[test]
fn test_validate_default_config() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        output_dir: dir.path().join("out"),
        ..Default::default()
    };

    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_output_dir_is_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("not-a-dir");
    std::fs::write(&file, b"x").unwrap();
    let config = Config {
        output_dir: file,
        ..Default::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotADirectory { .. })
    ));
}

#[test]
fn test_validate_missing_model_path() {
    let dir = TempDir::new().unwrap();
    let mut config = Config {
        output_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    config.model.model_path = Some(dir.path().join("no-model"));

    assert!(matches!(
        config.validate(),
        Err(ConfigError::PathNotFound { .. })
    ));
}

#[test]
fn test_validate_rejects_zero_workers() {
    let config = Config {
        output_dir: PathBuf::from("definitely-not-present-dir"),
        workers: 0,
        ..Default::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidWorkers { .. })
    ));
}

#[test]
fn test_validate_rejects_bad_model_settings() {
    let mut config = Config {
        output_dir: PathBuf::from("definitely-not-present-dir"),
        ..Default::default()
    };
    config.model.max_seq_len = 0;

    assert!(matches!(config.validate(), Err(ConfigError::Model { .. })));
}
