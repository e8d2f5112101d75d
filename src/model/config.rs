use std::path::PathBuf;

use crate::constants::{DEFAULT_MAX_SEQ_LEN, DEFAULT_MAX_TARGET_LEN, DEFAULT_MODEL_NAME};

use super::device::DevicePreference;

/// Configuration for [`Seq2SeqScorer`](super::Seq2SeqScorer).
///
/// `model_path` points at a directory holding `config.json`, `model.safetensors`
/// and `tokenizer.json`. Without a path the scorer cannot be loaded and callers
/// fall back to the lexical stub.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub model_path: Option<PathBuf>,

    /// Identifier written to output metadata.
    pub model_name: String,

    pub device: DevicePreference,

    /// Source tokens kept before truncation.
    pub max_seq_len: usize,

    /// Candidate tokens scored before truncation.
    pub max_target_len: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            model_name: DEFAULT_MODEL_NAME.to_string(),
            device: DevicePreference::default(),
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            max_target_len: DEFAULT_MAX_TARGET_LEN,
        }
    }
}

impl ModelConfig {
    pub const ENV_MODEL_PATH: &'static str = "GLIMPSE_MODEL_PATH";
    pub const ENV_MODEL_NAME: &'static str = "GLIMPSE_MODEL_NAME";
    pub const ENV_DEVICE: &'static str = "GLIMPSE_DEVICE";
    pub const ENV_MAX_SEQ_LEN: &'static str = "GLIMPSE_MAX_SEQ_LEN";

    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: Some(model_path.into()),
            ..Default::default()
        }
    }

    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = name.into();
        self
    }

    pub fn with_device(mut self, device: DevicePreference) -> Self {
        self.device = device;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_seq_len == 0 {
            return Err("max_seq_len must be greater than 0".to_string());
        }

        if self.max_target_len == 0 {
            return Err("max_target_len must be greater than 0".to_string());
        }

        if let Some(ref path) = self.model_path
            && path.as_os_str().is_empty()
        {
            return Err("model_path cannot be empty when provided".to_string());
        }

        Ok(())
    }

    /// Reads `GLIMPSE_*` overrides on top of defaults. Set but unparseable values are errors.
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let model_path = std::env::var(Self::ENV_MODEL_PATH)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let model_name = std::env::var(Self::ENV_MODEL_NAME)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.model_name);

        let device = match std::env::var(Self::ENV_DEVICE) {
            Ok(value) => value
                .parse()
                .map_err(|e| format!("{}: {e}", Self::ENV_DEVICE))?,
            Err(_) => defaults.device,
        };

        let max_seq_len = match std::env::var(Self::ENV_MAX_SEQ_LEN) {
            Ok(value) => value.trim().parse().map_err(|_| {
                format!("{}='{}' is not a token count", Self::ENV_MAX_SEQ_LEN, value)
            })?,
            Err(_) => defaults.max_seq_len,
        };

        Ok(Self {
            model_path,
            model_name,
            device,
            max_seq_len,
            max_target_len: defaults.max_target_len,
        })
    }
}
