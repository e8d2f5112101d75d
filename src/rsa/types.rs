use crate::matrix::ScoreMatrix;

use super::engine::RsaDistributions;

/// Non-fatal conditions where reranking degenerates but still completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupWarning {
    /// One source: listeners are trivially certain and consensuality is neutral.
    SingleSource,
    /// One candidate: every selection returns that candidate.
    SingleCandidate,
}

impl GroupWarning {
    pub fn detect(n_sources: usize, n_candidates: usize) -> Vec<Self> {
        let mut warnings = Vec::new();
        if n_sources == 1 {
            warnings.push(Self::SingleSource);
        }
        if n_candidates == 1 {
            warnings.push(Self::SingleCandidate);
        }
        warnings
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleSource => "single_source",
            Self::SingleCandidate => "single_candidate",
        }
    }
}

impl std::fmt::Display for GroupWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the reranker derives for one group.
#[derive(Debug, Clone)]
pub struct RerankOutcome {
    /// Per source, the candidate with the highest final speaker probability.
    pub best_rsa: Vec<String>,
    /// Per source, the candidate with the highest raw log-likelihood.
    pub best_base: Vec<String>,
    /// Raw `[source][candidate]` log-likelihoods.
    pub likelihood: ScoreMatrix,
    pub distributions: RsaDistributions,
    pub warnings: Vec<GroupWarning>,
}

impl RerankOutcome {
    pub fn speaker(&self) -> &ScoreMatrix {
        &self.distributions.speaker
    }

    pub fn listener(&self) -> &ScoreMatrix {
        &self.distributions.listener
    }

    pub fn initial_listener(&self) -> &ScoreMatrix {
        &self.distributions.initial_listener
    }
}
