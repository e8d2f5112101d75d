use tracing::{debug, warn};

use crate::matrix::ScoreMatrix;
use crate::scoring::{LikelihoodMatrixBuilder, LikelihoodScorer, ScoringError};

use super::config::RsaConfig;
use super::engine::RsaEngine;
use super::error::RsaResult;
use super::selector::best_per_source;
use super::types::{GroupWarning, RerankOutcome};

/// Reranks one group of sources and candidates: score → recurse → select.
pub struct RsaReranker<'a> {
    scorer: &'a dyn LikelihoodScorer,
    config: RsaConfig,
    engine: RsaEngine,
}

impl std::fmt::Debug for RsaReranker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaReranker")
            .field("scorer", &self.scorer.name())
            .field("config", &self.config)
            .finish()
    }
}

impl<'a> RsaReranker<'a> {
    pub fn new(scorer: &'a dyn LikelihoodScorer, config: RsaConfig) -> RsaResult<Self> {
        config.validate()?;
        let engine = RsaEngine::new(&config);
        Ok(Self {
            scorer,
            config,
            engine,
        })
    }

    pub fn config(&self) -> &RsaConfig {
        &self.config
    }

    /// Scores every pair with the scorer, then reranks.
    pub fn rerank<S: AsRef<str>>(
        &self,
        sources: &[S],
        candidates: &[String],
    ) -> RsaResult<RerankOutcome> {
        let likelihood = LikelihoodMatrixBuilder::new(self.scorer)
            .with_batch_size(self.config.batch_size)
            .build(sources, candidates)?;

        self.rerank_matrix(candidates, likelihood)
    }

    /// Reranks from a precomputed `[source][candidate]` log-likelihood matrix.
    pub fn rerank_matrix(
        &self,
        candidates: &[String],
        likelihood: ScoreMatrix,
    ) -> RsaResult<RerankOutcome> {
        if likelihood.cols() != candidates.len() || likelihood.rows() == 0 {
            return Err(ScoringError::InvalidInput {
                reason: format!(
                    "likelihood matrix is {}x{} but there are {} candidates",
                    likelihood.rows(),
                    likelihood.cols(),
                    candidates.len()
                ),
            }
            .into());
        }

        let warnings = GroupWarning::detect(likelihood.rows(), likelihood.cols());
        for warning in &warnings {
            warn!(
                warning = %warning,
                sources = likelihood.rows(),
                candidates = likelihood.cols(),
                "Degenerate group, reranking continues"
            );
        }

        let distributions = self.engine.run(&likelihood)?;

        let best_rsa = best_per_source(&distributions.speaker, candidates);
        let best_base = best_per_source(&likelihood, candidates);

        debug!(
            sources = likelihood.rows(),
            candidates = candidates.len(),
            changed = best_rsa
                .iter()
                .zip(&best_base)
                .filter(|(rsa, base)| rsa != base)
                .count(),
            "Selected best candidates"
        );

        Ok(RerankOutcome {
            best_rsa,
            best_base,
            likelihood,
            distributions,
            warnings,
        })
    }
}
