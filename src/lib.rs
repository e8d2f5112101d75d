//! Glimpse library crate (used by the `glimpse-rsa` binary and integration tests).
//!
//! Reranks candidate summaries of multi-document groups with the Rational Speech
//! Acts (RSA) model: a pragmatic speaker prefers candidates that let a listener
//! recover their own source over candidates that fit every source equally.
//!
//! # Public API Surface
//!
//! ## Pipeline
//! - [`load_summaries`], [`group_summaries`] - CSV input and grouping
//! - [`rerank_groups`] - Parallel per-group reranking with failure isolation
//! - [`RerankOutput`], [`write_json`], [`output_path`] - Result document
//!
//! ## Reranking
//! - [`RsaReranker`], [`RsaConfig`] - One group: score, recurse, select
//! - [`RsaEngine`], [`RsaDistributions`] - Speaker/listener recursion
//! - [`consensuality`] - Candidate genericness
//!
//! ## Scoring
//! - [`LikelihoodScorer`] - `log p(candidate | source)` capability
//! - [`LikelihoodMatrixBuilder`] - Batched matrix construction
//! - [`Seq2SeqScorer`], [`ModelConfig`] - Candle encoder-decoder backend
//! - [`LexicalScorer`] - Deterministic stub for runs without model files
//!
//! ## Test/Mock Support
//! `MockScorer` is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod input;
pub mod matrix;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod rsa;
pub mod scoring;

pub use config::{Config, ConfigError};
pub use input::{Group, SchemaError, SummaryRecord, group_summaries, load_summaries};
pub use matrix::{ScoreMatrix, log_sum_exp};
pub use model::{DevicePreference, ModelConfig, ModelError, Seq2SeqScorer};
pub use output::{
    FailureRecord, GroupRecord, LabeledMatrix, OutputError, RerankOutput, output_path, write_json,
};
pub use pipeline::{GroupError, GroupFailure, PipelineReport, rerank_group, rerank_groups};
pub use rsa::{
    ConsensualityPenalty, GroupWarning, RerankOutcome, RsaConfig, RsaDistributions, RsaEngine,
    RsaError, RsaReranker, consensuality,
};
#[cfg(any(test, feature = "mock"))]
pub use scoring::MockScorer;
pub use scoring::{
    LEXICAL_SCORER_NAME, LexicalScorer, LikelihoodMatrixBuilder, LikelihoodScorer, ScoringError,
};
