//! Speaker-listener recursion.
//!
//! States run `S0 → L1 → S1 → … → Lt → St`:
//!
//! - `S0`: literal speaker, row softmax of `rationality · ll`. Its argmax per
//!   source is the likelihood baseline.
//! - `Lk`: column softmax of `ln Sk-1` (uniform source prior).
//! - `Sk`: row softmax of `rationality · ln Lk − penalty + ln S0`.
//!
//! `L0`, the column softmax of `ll`, is reported and supplies the consensuality
//! that drives the penalty. A single-source group keeps every `Lk` at one, so
//! its speaker stays at `S0`.
//!
//! Every step works on log-values with max-subtracted log-sum-exp and returns a
//! fresh matrix; only the reported distributions are exponentiated.

use tracing::{debug, trace};

use crate::constants::PROBABILITY_TOLERANCE;
use crate::matrix::{ScoreMatrix, log_sum_exp};
use crate::scoring::ScoringError;

use super::config::{ConsensualityPenalty, RsaConfig};
use super::consensuality::consensuality;

/// Distributions produced by one engine run.
#[derive(Debug, Clone, PartialEq)]
pub struct RsaDistributions {
    /// `L0`, per candidate column a distribution over sources.
    pub initial_listener: ScoreMatrix,
    /// `St`, per source row a distribution over candidates. `S0` when `rounds == 0`.
    pub speaker: ScoreMatrix,
    /// `Lt`, per candidate column a distribution over sources. `L0` when `rounds == 0`.
    pub listener: ScoreMatrix,
    /// Consensuality of `L0`. This vector drives the speaker penalty.
    pub initial_consensuality: Vec<f64>,
    /// Consensuality of `Lt`.
    pub consensuality: Vec<f64>,
    pub rounds: usize,
}

#[derive(Debug, Clone)]
pub struct RsaEngine {
    rationality: f64,
    iterations: usize,
    penalty: ConsensualityPenalty,
}

impl RsaEngine {
    /// Builds an engine from a config. Call [`RsaConfig::validate`] first.
    pub fn new(config: &RsaConfig) -> Self {
        Self {
            rationality: config.rationality,
            iterations: config.iterations,
            penalty: config.penalty,
        }
    }

    /// Runs the fixed-depth recursion over a `[source][candidate]` log-likelihood matrix.
    pub fn run(&self, likelihood: &ScoreMatrix) -> Result<RsaDistributions, ScoringError> {
        check_likelihood(likelihood)?;

        let initial_log_listener = listener_update(likelihood)?;
        let initial_listener = initial_log_listener.map(f64::exp);
        let initial_consensuality = consensuality(&initial_listener);

        let literal_speaker =
            row_normalize(&likelihood.map(|ll| self.rationality * ll), "source row")?;

        let mut log_listener = initial_log_listener;
        let mut log_speaker = literal_speaker.clone();

        for round in 1..=self.iterations {
            log_listener = listener_update(&log_speaker)?;
            log_speaker =
                self.speaker_update(&log_listener, &literal_speaker, &initial_consensuality)?;
            trace!(round, "Pragmatic round complete");
        }

        let speaker = log_speaker.map(f64::exp);
        let listener = log_listener.map(f64::exp);
        check_distributions(&speaker, &listener)?;

        let consensuality = consensuality(&listener);

        debug!(
            sources = likelihood.rows(),
            candidates = likelihood.cols(),
            rounds = self.iterations,
            rationality = self.rationality,
            "RSA recursion complete"
        );

        Ok(RsaDistributions {
            initial_listener,
            speaker,
            listener,
            initial_consensuality,
            consensuality,
            rounds: self.iterations,
        })
    }

    /// `ln S[s, c] = u(s, c) − logsumexp_c u(s, ·)` with
    /// `u = penalty(rationality · ln L, consensuality) + ln S0`.
    fn speaker_update(
        &self,
        log_listener: &ScoreMatrix,
        literal_speaker: &ScoreMatrix,
        consensuality: &[f64],
    ) -> Result<ScoreMatrix, ScoringError> {
        let (rows, cols) = log_listener.shape();
        let utility = ScoreMatrix::from_fn(rows, cols, |s, c| {
            let u = self.rationality * log_listener.get(s, c);
            self.penalty.apply(u, consensuality[c]) + literal_speaker.get(s, c)
        });

        row_normalize(&utility, "source row")
    }
}

/// Row-normalizes log-scores: `x[s, c] − logsumexp_c x[s, ·]`.
fn row_normalize(
    log_scores: &ScoreMatrix,
    axis: &'static str,
) -> Result<ScoreMatrix, ScoringError> {
    let mut normalized = log_scores.clone();
    for (s, row) in log_scores.iter_rows().enumerate() {
        let normalizer = log_sum_exp(row.iter().copied());
        if !normalizer.is_finite() {
            return Err(ScoringError::DegenerateDistribution { axis, index: s });
        }
        for (c, &u) in row.iter().enumerate() {
            normalized.set(s, c, u - normalizer);
        }
    }

    Ok(normalized)
}

/// Column-normalizes log-scores: `ln L[s, c] = x[s, c] − logsumexp_s x[·, c]`.
///
/// The uniform prior over sources cancels in the normalization.
pub(crate) fn listener_update(log_scores: &ScoreMatrix) -> Result<ScoreMatrix, ScoringError> {
    let mut log_listener = log_scores.clone();

    for c in 0..log_scores.cols() {
        let column = log_scores.column(c);
        let normalizer = log_sum_exp(column.iter().copied());
        if !normalizer.is_finite() {
            return Err(ScoringError::DegenerateDistribution {
                axis: "candidate column",
                index: c,
            });
        }
        for (s, &x) in column.iter().enumerate() {
            log_listener.set(s, c, x - normalizer);
        }
    }

    Ok(log_listener)
}

fn check_likelihood(likelihood: &ScoreMatrix) -> Result<(), ScoringError> {
    if likelihood.is_empty() {
        return Err(ScoringError::InvalidInput {
            reason: "likelihood matrix is empty".to_string(),
        });
    }

    for s in 0..likelihood.rows() {
        for (c, &value) in likelihood.row(s).iter().enumerate() {
            if value.is_nan() || value == f64::INFINITY {
                return Err(ScoringError::NonFinite {
                    source_index: s,
                    candidate_index: c,
                    value,
                });
            }
        }
    }

    Ok(())
}

fn check_distributions(speaker: &ScoreMatrix, listener: &ScoreMatrix) -> Result<(), ScoringError> {
    for (s, sum) in speaker.row_sums().into_iter().enumerate() {
        if !sum.is_finite() || (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(ScoringError::DegenerateDistribution {
                axis: "speaker row",
                index: s,
            });
        }
    }

    for (c, sum) in listener.column_sums().into_iter().enumerate() {
        if !sum.is_finite() || (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(ScoringError::DegenerateDistribution {
                axis: "listener column",
                index: c,
            });
        }
    }

    Ok(())
}
