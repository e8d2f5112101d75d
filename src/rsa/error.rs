use thiserror::Error;

use crate::scoring::ScoringError;

#[derive(Debug, Error)]
pub enum RsaError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("invalid reranker configuration: {reason}")]
    InvalidConfig { reason: String },
}

pub type RsaResult<T> = Result<T, RsaError>;
