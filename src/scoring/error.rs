use thiserror::Error;

use crate::model::ModelError;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("scorer backend failed: {reason}")]
    Backend { reason: String },

    #[error("scorer returned {actual} scores for a batch of {expected} pairs")]
    BatchSizeMismatch { expected: usize, actual: usize },

    #[error("non-finite log-probability {value} for source {source_index}, candidate {candidate_index}")]
    NonFinite {
        source_index: usize,
        candidate_index: usize,
        value: f64,
    },

    #[error("cannot normalize {axis} {index}: every entry is impossible or non-finite")]
    DegenerateDistribution { axis: &'static str, index: usize },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}
