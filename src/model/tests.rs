use super::*;
use std::path::PathBuf;

use crate::constants::{DEFAULT_MAX_SEQ_LEN, DEFAULT_MODEL_NAME};

#[test]
fn test_config_default() {
    let config = ModelConfig::default();

    assert!(config.model_path.is_none());
    assert_eq!(config.model_name, DEFAULT_MODEL_NAME);
    assert_eq!(config.device, DevicePreference::Auto);
    assert_eq!(config.max_seq_len, DEFAULT_MAX_SEQ_LEN);
}

#[test]
fn test_config_new() {
    let config = ModelConfig::new("/models/t5-small").with_model_name("t5-small");

    assert_eq!(config.model_path, Some(PathBuf::from("/models/t5-small")));
    assert_eq!(config.model_name, "t5-small");
}

#[test]
fn test_config_validate() {
    assert!(ModelConfig::default().validate().is_ok());

    let zero_len = ModelConfig {
        max_seq_len: 0,
        ..Default::default()
    };
    assert!(zero_len.validate().is_err());

    let empty_path = ModelConfig::new("");
    assert!(empty_path.validate().is_err());
}

#[test]
fn test_device_preference_parse() {
    assert_eq!("cpu".parse::<DevicePreference>(), Ok(DevicePreference::Cpu));
    assert_eq!("CUDA".parse::<DevicePreference>(), Ok(DevicePreference::Cuda));
    assert_eq!("mps".parse::<DevicePreference>(), Ok(DevicePreference::Metal));
    assert_eq!("auto".parse::<DevicePreference>(), Ok(DevicePreference::Auto));
    assert!("tpu".parse::<DevicePreference>().is_err());
}

#[test]
fn test_device_preference_display_roundtrips() {
    for pref in [
        DevicePreference::Auto,
        DevicePreference::Cpu,
        DevicePreference::Cuda,
        DevicePreference::Metal,
    ] {
        assert_eq!(pref.to_string().parse::<DevicePreference>(), Ok(pref));
    }
}

#[test]
fn test_select_cpu_device() {
    let device = select_device(DevicePreference::Cpu).unwrap();

    assert!(device.is_cpu());
}

#[cfg(not(feature = "cuda"))]
#[test]
fn test_select_cuda_without_feature_fails() {
    let result = select_device(DevicePreference::Cuda);

    assert!(matches!(
        result,
        Err(ModelError::DeviceUnavailable { .. })
    ));
}

#[test]
fn test_load_without_path_is_invalid() {
    let result = Seq2SeqScorer::load(ModelConfig::default());

    assert!(matches!(result, Err(ModelError::InvalidConfig { .. })));
}

#[test]
fn test_load_with_missing_model() {
    let config = ModelConfig::new("/nonexistent/path/t5-small").with_device(DevicePreference::Cpu);
    let result = Seq2SeqScorer::load(config);

    assert!(matches!(result, Err(ModelError::ModelNotFound { .. })));
}

#[test]
fn test_load_with_missing_weights() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.json"), "{}").unwrap();

    let config = ModelConfig::new(dir.path()).with_device(DevicePreference::Cpu);
    let result = Seq2SeqScorer::load(config);

    match result {
        Err(ModelError::ModelLoadFailed { reason }) => {
            assert!(reason.contains("model.safetensors"));
        }
        other => panic!("expected ModelLoadFailed, got {other:?}"),
    }
}

#[test]
fn test_tokenizer_path_resolution() {
    let dir = tempfile::TempDir::new().unwrap();

    assert_eq!(
        tokenizer::tokenizer_path(dir.path()),
        dir.path().join("tokenizer.json")
    );
    assert_eq!(
        tokenizer::tokenizer_path(&dir.path().join("tokenizer.json")),
        dir.path().join("tokenizer.json")
    );
}

#[test]
fn test_missing_tokenizer_is_reported() {
    let dir = tempfile::TempDir::new().unwrap();

    let result = tokenizer::load_tokenizer_with_truncation(dir.path(), 16);

    assert!(matches!(result, Err(ModelError::ModelNotFound { .. })));
}
