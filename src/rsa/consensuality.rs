//! Consensuality (genericness) of candidates.
//!
//! For candidate `c`, the listener column `L[·, c]` is a distribution over sources.
//! Its Shannon entropy, normalized by `ln(n_sources)`, is the consensuality:
//! `1.0` when the candidate fits every source equally (generic), `0.0` when it
//! points at a single source (specific).

use crate::constants::NEUTRAL_CONSENSUALITY;
use crate::matrix::ScoreMatrix;

/// Normalized entropy of a probability vector, in `[0, 1]`. Zero entries contribute 0.
pub fn normalized_entropy(probabilities: &[f64]) -> f64 {
    let n = probabilities.len();
    if n <= 1 {
        return NEUTRAL_CONSENSUALITY;
    }

    let entropy: f64 = probabilities
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| -p * p.ln())
        .sum();

    (entropy / (n as f64).ln()).clamp(0.0, 1.0)
}

/// Consensuality per candidate, computed from a listener matrix in probability space.
///
/// A single-source group has no distribution to compare against, so every
/// candidate gets [`NEUTRAL_CONSENSUALITY`].
pub fn consensuality(listener: &ScoreMatrix) -> Vec<f64> {
    if listener.rows() <= 1 {
        return vec![NEUTRAL_CONSENSUALITY; listener.cols()];
    }

    (0..listener.cols())
        .map(|col| normalized_entropy(&listener.column(col)))
        .collect()
}
