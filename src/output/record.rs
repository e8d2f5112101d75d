use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::info;

use crate::input::Group;
use crate::matrix::ScoreMatrix;
use crate::rsa::RerankOutcome;

use super::error::OutputError;
use super::frame::{LabeledMatrix, TextCandidates};

/// Everything recorded for one group.
#[derive(Debug, Clone, Serialize)]
pub struct GroupRecord {
    pub id: String,
    /// Per source, the RSA choice.
    pub best_rsa: Vec<String>,
    /// Per source, the highest-likelihood choice.
    pub best_base: Vec<String>,
    pub speaker_df: LabeledMatrix,
    pub listener_df: LabeledMatrix,
    pub initial_listener: LabeledMatrix,
    /// Raw log-likelihoods; `-inf` serializes as `null`.
    pub language_model_proba_df: LabeledMatrix,
    pub initial_consensuality_scores: Vec<f64>,
    pub consensuality_scores: Vec<f64>,
    pub gold: String,
    pub rationality: f64,
    pub text_candidates: TextCandidates,
}

impl GroupRecord {
    pub fn new(group: &Group, outcome: &RerankOutcome, rationality: f64) -> Self {
        let labeled = |values: &ScoreMatrix| {
            LabeledMatrix::new(&group.source_texts, &group.candidates, values)
        };

        Self {
            id: group.id.clone(),
            best_rsa: outcome.best_rsa.clone(),
            best_base: outcome.best_base.clone(),
            speaker_df: labeled(outcome.speaker()),
            listener_df: labeled(outcome.listener()),
            initial_listener: labeled(outcome.initial_listener()),
            language_model_proba_df: labeled(&outcome.likelihood),
            initial_consensuality_scores: outcome.distributions.initial_consensuality.clone(),
            consensuality_scores: outcome.distributions.consensuality.clone(),
            gold: group.gold.clone(),
            rationality,
            text_candidates: TextCandidates::from_records(&group.rows),
        }
    }
}

/// A group that could not be reranked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub id: String,
    pub error: String,
}

/// Top-level output document.
#[derive(Debug, Clone, Serialize)]
pub struct RerankOutput {
    pub results: Vec<GroupRecord>,

    #[serde(rename = "metadata/reranking_model")]
    pub reranking_model: String,

    #[serde(rename = "metadata/rsa_iterations")]
    pub rsa_iterations: usize,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FailureRecord>,
}

impl RerankOutput {
    pub fn new(
        results: Vec<GroupRecord>,
        reranking_model: impl Into<String>,
        rsa_iterations: usize,
    ) -> Self {
        Self {
            results,
            reranking_model: reranking_model.into(),
            rsa_iterations,
            failures: Vec::new(),
        }
    }

    pub fn with_failures(mut self, failures: Vec<FailureRecord>) -> Self {
        self.failures = failures;
        self
    }
}

/// `{output_dir}/{stem}-_-r{rationality}-_-rsa_reranked-{model}.json`, with `/`
/// in the model name replaced by `-`.
pub fn output_path(
    output_dir: &Path,
    summaries_path: &Path,
    rationality: f64,
    model_name: &str,
) -> PathBuf {
    let stem = summaries_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!(
        "{stem}-_-r{rationality}-_-rsa_reranked-{}.json",
        model_name.replace('/', "-")
    ))
}

/// Writes `output` as JSON indented by four spaces, creating parent directories.
pub fn write_json(path: &Path, output: &RerankOutput) -> Result<(), OutputError> {
    let io_error = |source: std::io::Error| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_error)?;
    }

    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    output.serialize(&mut serializer)?;
    writer.write_all(b"\n").map_err(io_error)?;
    writer.flush().map_err(io_error)?;

    info!(
        path = %path.display(),
        groups = output.results.len(),
        failures = output.failures.len(),
        "Wrote reranking results"
    );
    Ok(())
}
