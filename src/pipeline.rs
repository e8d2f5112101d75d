//! Runs every group of a summaries file through the reranker.
//!
//! Groups are independent. Each runs as a blocking task and at most `workers` run
//! at once; results come back in input order. A group that fails is reported
//! with its id and does not stop the others.

use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::input::Group;
use crate::output::{FailureRecord, GroupRecord};
use crate::rsa::{RsaConfig, RsaError, RsaReranker};
use crate::scoring::LikelihoodScorer;

#[derive(Debug, Error)]
pub enum GroupError {
    #[error(transparent)]
    Rerank(#[from] RsaError),

    #[error("reranking task aborted: {0}")]
    Aborted(String),
}

#[derive(Debug)]
pub struct GroupFailure {
    pub id: String,
    pub error: GroupError,
}

impl From<&GroupFailure> for FailureRecord {
    fn from(failure: &GroupFailure) -> Self {
        Self {
            id: failure.id.clone(),
            error: failure.error.to_string(),
        }
    }
}

/// Records in group order, plus the groups that failed.
#[derive(Debug, Default)]
pub struct PipelineReport {
    pub records: Vec<GroupRecord>,
    pub failures: Vec<GroupFailure>,
}

impl PipelineReport {
    pub fn failure_records(&self) -> Vec<FailureRecord> {
        self.failures.iter().map(FailureRecord::from).collect()
    }
}

/// Reranks one group synchronously.
pub fn rerank_group(
    group: &Group,
    scorer: &dyn LikelihoodScorer,
    config: RsaConfig,
) -> Result<GroupRecord, RsaError> {
    let rationality = config.rationality;
    let reranker = RsaReranker::new(scorer, config)?;
    let outcome = reranker.rerank(&group.source_texts, &group.candidates)?;

    debug!(
        id = %group.id,
        sources = group.n_sources(),
        candidates = group.n_candidates(),
        "Group reranked"
    );
    Ok(GroupRecord::new(group, &outcome, rationality))
}

/// Reranks all groups with bounded parallelism.
///
/// Fails up front only when `config` is invalid; per-group errors land in
/// [`PipelineReport::failures`].
pub async fn rerank_groups(
    groups: Vec<Group>,
    scorer: Arc<dyn LikelihoodScorer>,
    config: RsaConfig,
    workers: usize,
) -> Result<PipelineReport, RsaError> {
    config.validate()?;
    let workers = workers.max(1);
    let total = groups.len();

    info!(
        groups = total,
        workers,
        scorer = scorer.name(),
        rationality = config.rationality,
        iterations = config.iterations,
        "Reranking groups"
    );

    let tasks = groups.into_iter().map(|group| {
        let scorer = Arc::clone(&scorer);
        let config = config.clone();
        async move {
            let id = group.id.clone();
            let joined =
                tokio::task::spawn_blocking(move || rerank_group(&group, scorer.as_ref(), config))
                    .await;
            match joined {
                Ok(Ok(record)) => Ok(record),
                Ok(Err(error)) => Err(GroupFailure {
                    id,
                    error: error.into(),
                }),
                Err(join_error) => Err(GroupFailure {
                    id,
                    error: GroupError::Aborted(join_error.to_string()),
                }),
            }
        }
    });

    let results: Vec<Result<GroupRecord, GroupFailure>> =
        stream::iter(tasks).buffered(workers).collect().await;

    let mut report = PipelineReport::default();
    for result in results {
        match result {
            Ok(record) => report.records.push(record),
            Err(failure) => {
                warn!(id = %failure.id, error = %failure.error, "Group failed, skipping");
                report.failures.push(failure);
            }
        }
    }

    info!(
        succeeded = report.records.len(),
        failed = report.failures.len(),
        "Reranking complete"
    );
    Ok(report)
}
