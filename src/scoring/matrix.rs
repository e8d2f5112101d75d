use tracing::debug;

use crate::constants::DEFAULT_BATCH_SIZE;
use crate::matrix::ScoreMatrix;

use super::error::ScoringError;
use super::scorer::LikelihoodScorer;

/// Builds dense `[source][candidate]` log-likelihood matrices from a scorer.
///
/// Pairs are enumerated row-major and sent to the scorer in chunks of `batch_size`.
/// Each score is written back by its `(source, candidate)` index, so the matrix does
/// not depend on how pairs were chunked.
pub struct LikelihoodMatrixBuilder<'a> {
    scorer: &'a dyn LikelihoodScorer,
    batch_size: usize,
}

impl std::fmt::Debug for LikelihoodMatrixBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LikelihoodMatrixBuilder")
            .field("scorer", &self.scorer.name())
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl<'a> LikelihoodMatrixBuilder<'a> {
    pub fn new(scorer: &'a dyn LikelihoodScorer) -> Self {
        Self {
            scorer,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Sets the number of pairs per scorer call (clamped to at least 1).
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Scores every `(source, candidate)` pair.
    ///
    /// Any scorer failure aborts the build. `NaN` and `+inf` scores are rejected;
    /// `-inf` is kept as an impossible pair.
    pub fn build<S, C>(&self, sources: &[S], candidates: &[C]) -> Result<ScoreMatrix, ScoringError>
    where
        S: AsRef<str>,
        C: AsRef<str>,
    {
        if sources.is_empty() || candidates.is_empty() {
            return Err(ScoringError::InvalidInput {
                reason: format!(
                    "cannot build a likelihood matrix for {} sources and {} candidates",
                    sources.len(),
                    candidates.len()
                ),
            });
        }

        let n_candidates = candidates.len();
        let total = sources.len() * n_candidates;
        let index_of = |flat: usize| (flat / n_candidates, flat % n_candidates);

        debug!(
            sources = sources.len(),
            candidates = n_candidates,
            pairs = total,
            batch_size = self.batch_size,
            batches = total.div_ceil(self.batch_size),
            "Building likelihood matrix"
        );

        let mut matrix = ScoreMatrix::filled(sources.len(), n_candidates, f64::NEG_INFINITY);

        for start in (0..total).step_by(self.batch_size) {
            let end = (start + self.batch_size).min(total);
            let pairs: Vec<(&str, &str)> = (start..end)
                .map(|flat| {
                    let (s, c) = index_of(flat);
                    (sources[s].as_ref(), candidates[c].as_ref())
                })
                .collect();

            let scores = self.scorer.score_batch(&pairs)?;
            if scores.len() != pairs.len() {
                return Err(ScoringError::BatchSizeMismatch {
                    expected: pairs.len(),
                    actual: scores.len(),
                });
            }

            for (flat, score) in (start..end).zip(scores) {
                let (s, c) = index_of(flat);
                if score.is_nan() || score == f64::INFINITY {
                    return Err(ScoringError::NonFinite {
                        source_index: s,
                        candidate_index: c,
                        value: score,
                    });
                }
                matrix.set(s, c, score);
            }
        }

        Ok(matrix)
    }
}
