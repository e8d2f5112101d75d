use std::collections::HashMap;

use parking_lot::Mutex;

use super::error::ScoringError;
use super::scorer::LikelihoodScorer;

/// Scorer backed by a fixed `(source, candidate) -> log-prob` table.
///
/// Pairs missing from the table get `default_score`. Every batch size seen is
/// recorded so tests can assert on batching.
#[derive(Debug, Default)]
pub struct MockScorer {
    table: HashMap<(String, String), f64>,
    default_score: f64,
    fail_on: Option<String>,
    batch_sizes: Mutex<Vec<usize>>,
}

impl MockScorer {
    pub fn new(default_score: f64) -> Self {
        Self {
            default_score,
            ..Default::default()
        }
    }

    /// Builds a scorer from a dense `[source][candidate]` table.
    pub fn from_matrix(sources: &[&str], candidates: &[&str], scores: &[&[f64]]) -> Self {
        let mut scorer = Self::new(f64::NEG_INFINITY);
        for (s, source) in sources.iter().enumerate() {
            for (c, candidate) in candidates.iter().enumerate() {
                scorer = scorer.with_score(source, candidate, scores[s][c]);
            }
        }
        scorer
    }

    pub fn with_score(mut self, source: &str, candidate: &str, score: f64) -> Self {
        self.table
            .insert((source.to_string(), candidate.to_string()), score);
        self
    }

    /// Makes any batch containing `candidate` fail.
    pub fn failing_on(mut self, candidate: &str) -> Self {
        self.fail_on = Some(candidate.to_string());
        self
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.batch_sizes.lock().len()
    }
}

impl LikelihoodScorer for MockScorer {
    fn name(&self) -> &str {
        "mock-scorer"
    }

    fn score_batch(&self, pairs: &[(&str, &str)]) -> Result<Vec<f64>, ScoringError> {
        self.batch_sizes.lock().push(pairs.len());

        if let Some(ref bad) = self.fail_on
            && pairs.iter().any(|(_, candidate)| candidate == bad)
        {
            return Err(ScoringError::Backend {
                reason: format!("mock failure for candidate '{bad}'"),
            });
        }

        Ok(pairs
            .iter()
            .map(|(source, candidate)| {
                self.table
                    .get(&(source.to_string(), candidate.to_string()))
                    .copied()
                    .unwrap_or(self.default_score)
            })
            .collect())
    }
}
