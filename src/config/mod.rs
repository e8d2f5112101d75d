//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `GLIMPSE_*` environment variables;
//! the binary's flags take precedence over both.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::constants::DEFAULT_OUTPUT_DIR;
use crate::model::ModelConfig;
use crate::rsa::RsaConfig;

/// Run configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `GLIMPSE_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Scorer model settings.
    pub model: ModelConfig,

    /// Reranking hyperparameters.
    pub rsa: RsaConfig,

    /// Directory for result files. Default: `output`.
    pub output_dir: PathBuf,

    /// Groups reranked concurrently. Default: available parallelism.
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            rsa: RsaConfig::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            workers: default_workers(),
        }
    }
}

/// Worker count used when `GLIMPSE_WORKERS` is not set.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

impl Config {
    const ENV_OUTPUT_DIR: &'static str = "GLIMPSE_OUTPUT_DIR";
    const ENV_WORKERS: &'static str = "GLIMPSE_WORKERS";

    /// Loads configuration from environment variables (falling back to defaults).
    ///
    /// Only rejects values that do not parse. Call [`Config::validate`] once every
    /// override is applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let model = ModelConfig::from_env().map_err(|reason| ConfigError::Model { reason })?;
        let rsa = RsaConfig::from_env()?;
        let output_dir = Self::parse_path_from_env(Self::ENV_OUTPUT_DIR, defaults.output_dir);
        let workers = Self::parse_workers_from_env(defaults.workers)?;

        Ok(Self {
            model,
            rsa,
            output_dir,
            workers,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.output_dir.clone(),
            });
        }

        if let Some(ref path) = self.model.model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        self.model
            .validate()
            .map_err(|reason| ConfigError::Model { reason })?;
        self.rsa.validate()?;

        if self.workers == 0 {
            return Err(ConfigError::InvalidWorkers {
                value: self.workers.to_string(),
            });
        }

        Ok(())
    }

    fn parse_workers_from_env(default: usize) -> Result<usize, ConfigError> {
        match env::var(Self::ENV_WORKERS) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::WorkersParseError {
                    value: value.clone(),
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default)
    }
}
