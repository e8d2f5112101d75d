use std::path::Path;

use candle_core::{D, DType, Device, IndexOp, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::t5::{self, T5ForConditionalGeneration};
use parking_lot::Mutex;
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::scoring::{LikelihoodScorer, ScoringError};

use super::config::ModelConfig;
use super::device::select_device;
use super::error::ModelError;
use super::tokenizer::{encode_ids, load_tokenizer_with_truncation};

/// Encoder-decoder scorer: `log p(candidate | source)` under a T5-family checkpoint.
///
/// The model is owned by this handle and guarded by a mutex; each batch acquires it
/// once, scores its pairs sequentially (proper batching would need padding), and
/// releases it.
pub struct Seq2SeqScorer {
    model: Mutex<T5ForConditionalGeneration>,
    tokenizer: Tokenizer,
    device: Device,
    config: ModelConfig,
    decoder_start_token_id: u32,
}

impl std::fmt::Debug for Seq2SeqScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Seq2SeqScorer")
            .field("device", &format!("{:?}", self.device))
            .field("config", &self.config)
            .field("decoder_start_token_id", &self.decoder_start_token_id)
            .finish()
    }
}

impl Seq2SeqScorer {
    pub fn load(config: ModelConfig) -> Result<Self, ModelError> {
        if let Err(reason) = config.validate() {
            return Err(ModelError::InvalidConfig { reason });
        }

        let Some(model_path) = config.model_path.clone() else {
            return Err(ModelError::InvalidConfig {
                reason: "model_path is required to load a seq2seq scorer".to_string(),
            });
        };

        if !model_path.exists() {
            return Err(ModelError::ModelNotFound { path: model_path });
        }

        let config_path = model_path.join("config.json");
        if !config_path.exists() {
            return Err(ModelError::ModelLoadFailed {
                reason: format!("Missing config.json in {}", model_path.display()),
            });
        }

        let weights_path = model_path.join("model.safetensors");
        if !weights_path.exists() {
            return Err(ModelError::ModelLoadFailed {
                reason: format!("Missing model.safetensors in {}", model_path.display()),
            });
        }

        let device = select_device(config.device)?;
        debug!(?device, "Selected compute device for scorer");

        info!(
            model_path = %model_path.display(),
            model_name = %config.model_name,
            "Loading seq2seq scoring model"
        );

        let (model, start_token) = Self::load_model(&model_path, &device)?;
        let tokenizer = load_tokenizer_with_truncation(&model_path, config.max_seq_len)?;

        info!(
            max_seq_len = config.max_seq_len,
            max_target_len = config.max_target_len,
            "Seq2seq scoring model loaded"
        );

        Ok(Self {
            model: Mutex::new(model),
            tokenizer,
            device,
            config,
            decoder_start_token_id: start_token,
        })
    }

    fn load_model(
        model_path: &Path,
        device: &Device,
    ) -> Result<(T5ForConditionalGeneration, u32), ModelError> {
        let raw = std::fs::read_to_string(model_path.join("config.json"))?;
        let mut model_config: t5::Config =
            serde_json::from_str(&raw).map_err(|e| ModelError::ModelLoadFailed {
                reason: format!("Failed to parse config: {}", e),
            })?;
        // Scoring decodes one target token per step, which needs the kv cache.
        model_config.use_cache = true;

        let weights_path = model_path.join("model.safetensors");
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };

        let model = T5ForConditionalGeneration::load(vb, &model_config).map_err(|e| {
            ModelError::ModelLoadFailed {
                reason: format!("Failed to load encoder-decoder weights: {}", e),
            }
        })?;

        let start = model_config
            .decoder_start_token_id
            .unwrap_or(model_config.pad_token_id) as u32;

        Ok((model, start))
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Sums target-token log-probabilities under teacher forcing.
    fn log_likelihood(
        &self,
        model: &mut T5ForConditionalGeneration,
        source: &str,
        candidate: &str,
    ) -> Result<f64, ModelError> {
        let source_ids = encode_ids(&self.tokenizer, source)?;
        let mut target_ids = encode_ids(&self.tokenizer, candidate)?;
        target_ids.truncate(self.config.max_target_len);

        if target_ids.is_empty() {
            return Err(ModelError::TokenizationFailed {
                reason: "candidate produced no tokens".to_string(),
            });
        }

        model.clear_kv_cache();

        let input_ids = Tensor::new(source_ids.as_slice(), &self.device)?.unsqueeze(0)?;
        let encoder_output = model.encode(&input_ids)?;

        let mut previous = self.decoder_start_token_id;
        let mut total = 0.0f64;
        for &target in &target_ids {
            let decoder_input = Tensor::new(&[previous], &self.device)?.unsqueeze(0)?;
            let logits = model
                .decode(&decoder_input, &encoder_output)?
                .squeeze(0)?
                .to_dtype(DType::F32)?;
            let log_probs = candle_nn::ops::log_softmax(&logits, D::Minus1)?;
            total += f64::from(log_probs.i(target as usize)?.to_scalar::<f32>()?);
            previous = target;
        }

        model.clear_kv_cache();

        debug!(
            source_tokens = source_ids.len(),
            target_tokens = target_ids.len(),
            log_prob = total,
            "Scored pair"
        );

        Ok(total)
    }
}

impl LikelihoodScorer for Seq2SeqScorer {
    fn name(&self) -> &str {
        &self.config.model_name
    }

    fn score_batch(&self, pairs: &[(&str, &str)]) -> Result<Vec<f64>, ScoringError> {
        let mut model = self.model.lock();
        let mut scores = Vec::with_capacity(pairs.len());
        for (source, candidate) in pairs {
            scores.push(self.log_likelihood(&mut model, source, candidate)?);
        }
        Ok(scores)
    }
}
