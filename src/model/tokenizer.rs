use std::path::{Path, PathBuf};

use tokenizers::{Tokenizer, TruncationParams};

use super::error::ModelError;

/// Resolves `tokenizer.json` from a model directory or an explicit file path.
pub fn tokenizer_path(model_path: &Path) -> PathBuf {
    if model_path
        .file_name()
        .is_some_and(|name| name == std::ffi::OsStr::new("tokenizer.json"))
    {
        model_path.to_path_buf()
    } else if model_path.is_dir() {
        model_path.join("tokenizer.json")
    } else {
        model_path
            .parent()
            .map(|parent| parent.join("tokenizer.json"))
            .unwrap_or_else(|| PathBuf::from("tokenizer.json"))
    }
}

/// Loads the tokenizer with source truncation at `max_len` tokens.
///
/// Encoder inputs longer than the model's context are cut rather than rejected,
/// matching how seq2seq checkpoints are scored in practice.
pub fn load_tokenizer_with_truncation(
    model_path: &Path,
    max_len: usize,
) -> Result<Tokenizer, ModelError> {
    let path = tokenizer_path(model_path);
    if !path.exists() {
        return Err(ModelError::ModelNotFound { path });
    }

    let mut tokenizer =
        Tokenizer::from_file(&path).map_err(|e| ModelError::TokenizationFailed {
            reason: format!("failed to load {}: {}", path.display(), e),
        })?;

    let truncation = TruncationParams {
        max_length: max_len,
        ..Default::default()
    };

    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| ModelError::TokenizationFailed {
            reason: format!("failed to configure truncation: {}", e),
        })?;

    Ok(tokenizer)
}

/// Encodes `text` to token ids (special tokens included, e.g. the trailing `</s>`).
pub fn encode_ids(tokenizer: &Tokenizer, text: &str) -> Result<Vec<u32>, ModelError> {
    tokenizer
        .encode(text, true)
        .map(|encoding| encoding.get_ids().to_vec())
        .map_err(|e| ModelError::TokenizationFailed {
            reason: e.to_string(),
        })
}
