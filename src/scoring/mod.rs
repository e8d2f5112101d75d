//! Pairwise likelihood scoring.
//!
//! [`LikelihoodScorer`] is the single capability the reranker needs from a model:
//! `log p(candidate | source)` for a batch of pairs. [`LikelihoodMatrixBuilder`]
//! turns it into a dense `[source][candidate]` matrix.
//!
//! Backends:
//! - [`crate::model::Seq2SeqScorer`] runs an encoder-decoder checkpoint with candle.
//! - [`LexicalScorer`] is a deterministic unigram stub for runs without model files.
//! - `MockScorer` (behind `mock`) serves fixed tables in tests.

pub mod error;
pub mod matrix;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod scorer;


pub use error::ScoringError;
pub use matrix::LikelihoodMatrixBuilder;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockScorer;
pub use scorer::{LEXICAL_SCORER_NAME, LexicalScorer, LikelihoodScorer};
