use std::fs::File;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::constants::REQUIRED_COLUMNS;

use super::error::SchemaError;

/// One row of a summaries file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRecord {
    /// Zero-based data row position in the file (header excluded).
    pub row: usize,
    pub index: String,
    pub id: String,
    pub text: String,
    pub gold: String,
    pub summary: String,
    pub id_candidate: String,
    /// Every column of the row in header order, required ones included.
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Deserialize)]
struct RequiredFields {
    index: String,
    id: String,
    text: String,
    gold: String,
    summary: String,
    id_candidate: String,
}

impl SummaryRecord {
    pub fn field(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }
}

/// Required columns absent from `headers`, in canonical order.
pub fn missing_columns(headers: &[&str]) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h.trim() == **required))
        .map(|c| c.to_string())
        .collect()
}

/// Loads and validates a summaries CSV.
///
/// The header is checked before any row is parsed. Extra columns are kept in
/// [`SummaryRecord::fields`] but otherwise ignored.
pub fn load_summaries(path: &Path) -> Result<Vec<SummaryRecord>, SchemaError> {
    let file = File::open(path).map_err(|source| SchemaError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new().flexible(false).from_reader(file);

    let csv_error = |source: csv::Error| SchemaError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut headers = reader.headers().map_err(csv_error)?.clone();
    headers.trim();

    let missing = missing_columns(&headers.iter().collect::<Vec<_>>());
    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns {
            path: path.to_path_buf(),
            missing,
        });
    }
    debug!(path = %path.display(), columns = headers.len(), "Summaries header validated");

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(csv_error)?;
        let required: RequiredFields = record.deserialize(Some(&headers)).map_err(csv_error)?;
        let fields = headers
            .iter()
            .zip(record.iter())
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        records.push(SummaryRecord {
            row,
            index: required.index,
            id: required.id,
            text: required.text,
            gold: required.gold,
            summary: required.summary,
            id_candidate: required.id_candidate,
            fields,
        });
    }

    info!(path = %path.display(), rows = records.len(), "Loaded summaries");
    Ok(records)
}
