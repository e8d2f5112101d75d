//! Cross-cutting, shared constants.
//!
//! Defaults here mirror the reference reranking setup (Pegasus scorer, rationality 3,
//! two pragmatic rounds, batches of 16). Component configs fall back to these values.

pub const DEFAULT_MODEL_NAME: &str = "google/pegasus-arxiv";

pub const DEFAULT_RATIONALITY: f64 = 3.0;

pub const DEFAULT_RSA_ITERATIONS: usize = 2;

pub const DEFAULT_BATCH_SIZE: usize = 16;

pub const DEFAULT_CONSENSUALITY_WEIGHT: f64 = 1.0;

/// Maximum source tokens fed to the encoder.
pub const DEFAULT_MAX_SEQ_LEN: usize = 512;

/// Maximum candidate tokens scored by the decoder.
pub const DEFAULT_MAX_TARGET_LEN: usize = 256;

/// Consensuality reported for groups with a single source.
pub const NEUTRAL_CONSENSUALITY: f64 = 0.0;

/// Tolerance used when checking that distributions sum to one.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Columns every summaries file must carry.
pub const REQUIRED_COLUMNS: [&str; 6] = ["index", "id", "text", "gold", "summary", "id_candidate"];

pub const DEFAULT_OUTPUT_DIR: &str = "output";
