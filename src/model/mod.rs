//! Model-backed likelihood scoring.
//!
//! - [`device`] selects CPU / CUDA / Metal.
//! - [`seq2seq`] loads an encoder-decoder checkpoint and implements
//!   [`LikelihoodScorer`](crate::scoring::LikelihoodScorer).
//!
//! Nothing outside this module knows about candle or tokenizers.

pub mod config;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// Encoder-decoder scorer.
pub mod seq2seq;
/// Tokenizer loading helpers.
pub mod tokenizer;

#[cfg(test)]
mod tests;

pub use config::ModelConfig;
pub use device::{DevicePreference, select_device};
pub use error::ModelError;
pub use seq2seq::Seq2SeqScorer;
