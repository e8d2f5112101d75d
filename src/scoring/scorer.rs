use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::error::ScoringError;

/// Pairwise log-likelihood capability: `log p(candidate | source)`.
///
/// Implementations must be reentrant. The reranker never inspects how scores are
/// produced (model architecture, tokenization, device placement all stay behind
/// this trait).
pub trait LikelihoodScorer: Send + Sync {
    /// Identifier recorded in output metadata.
    fn name(&self) -> &str;

    /// Scores `(source, candidate)` pairs, one log-probability per pair, in input order.
    fn score_batch(&self, pairs: &[(&str, &str)]) -> Result<Vec<f64>, ScoringError>;

    fn score(&self, source: &str, candidate: &str) -> Result<f64, ScoringError> {
        let scores = self.score_batch(&[(source, candidate)])?;
        match scores.as_slice() {
            [score] => Ok(*score),
            _ => Err(ScoringError::BatchSizeMismatch {
                expected: 1,
                actual: scores.len(),
            }),
        }
    }
}

pub const LEXICAL_SCORER_NAME: &str = "lexical-unigram-stub";

/// Smoothing mass added to every vocabulary entry.
const LEXICAL_SMOOTHING: f64 = 0.5;

/// Deterministic scorer used when no model is configured.
///
/// Treats the source as an add-k smoothed unigram language model over the joint
/// source/candidate vocabulary and scores each candidate token under it, plus one
/// end-of-sequence token. Candidates that reuse source words score higher.
#[derive(Debug, Clone, Default)]
pub struct LexicalScorer;

impl LexicalScorer {
    pub fn new() -> Self {
        Self
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn log_likelihood(source: &str, candidate: &str) -> f64 {
        let source_tokens = Self::tokenize(source);
        let candidate_tokens = Self::tokenize(candidate);

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for token in &source_tokens {
            *counts.entry(token.as_str()).or_default() += 1;
        }

        let vocabulary: HashSet<&str> = source_tokens
            .iter()
            .chain(candidate_tokens.iter())
            .map(String::as_str)
            .collect();
        // +1 for the end-of-sequence token.
        let vocab_size = (vocabulary.len() + 1) as f64;
        let denominator = source_tokens.len() as f64 + LEXICAL_SMOOTHING * vocab_size;

        let token_log_prob = |token: &str| {
            let count = counts.get(token).copied().unwrap_or(0) as f64;
            ((count + LEXICAL_SMOOTHING) / denominator).ln()
        };

        let eos = (LEXICAL_SMOOTHING / denominator).ln();
        candidate_tokens
            .iter()
            .map(|t| token_log_prob(t))
            .sum::<f64>()
            + eos
    }
}

impl LikelihoodScorer for LexicalScorer {
    fn name(&self) -> &str {
        LEXICAL_SCORER_NAME
    }

    fn score_batch(&self, pairs: &[(&str, &str)]) -> Result<Vec<f64>, ScoringError> {
        debug!(batch = pairs.len(), "Scoring batch (lexical stub)");
        Ok(pairs
            .iter()
            .map(|(source, candidate)| Self::log_likelihood(source, candidate))
            .collect())
    }
}
