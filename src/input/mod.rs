//! Summaries input: CSV loading, schema validation and grouping by `id`.

pub mod error;
pub mod group;
pub mod record;


pub use error::SchemaError;
pub use group::{Group, group_summaries};
pub use record::{SummaryRecord, load_summaries, missing_columns};
