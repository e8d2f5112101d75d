//! Rational Speech Acts reranking.
//!
//! A literal listener `L0` is read off the likelihood matrix, then a speaker and
//! listener alternately best-respond to each other for a fixed number of rounds.
//! The final speaker picks `best_rsa`; the raw likelihoods pick `best_base`.
//!
//! - [`RsaReranker`] ties scoring, the [`RsaEngine`] and selection together for one group.
//! - [`consensuality`] measures how generic each candidate is.
//! - [`ConsensualityPenalty`] controls how that feeds back into the speaker.

pub mod config;
pub mod consensuality;
pub mod engine;
pub mod error;
pub mod reranker;
pub mod selector;
pub mod types;


pub use config::{ConsensualityPenalty, RsaConfig};
pub use consensuality::{consensuality, normalized_entropy};
pub use engine::{RsaDistributions, RsaEngine};
pub use error::{RsaError, RsaResult};
pub use reranker::RsaReranker;
pub use selector::{argmax_first, best_per_source};
pub use types::{GroupWarning, RerankOutcome};
