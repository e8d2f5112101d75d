//! Result records and the JSON output document.

pub mod error;
pub mod frame;
pub mod record;


pub use error::OutputError;
pub use frame::{LabeledMatrix, TextCandidates, cell_value};
pub use record::{FailureRecord, GroupRecord, RerankOutput, output_path, write_json};
