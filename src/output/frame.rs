//! Column-oriented JSON views matching pandas `DataFrame.to_dict()`.
//!
//! `to_dict()` nests column first: `{column: {row_label: value}}`. Key order follows
//! column and row order. Non-finite values serialize as `null`.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::input::SummaryRecord;
use crate::matrix::ScoreMatrix;

/// A `[source][candidate]` matrix with its labels, serialized `{candidate: {source: value}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledMatrix {
    pub sources: Vec<String>,
    pub candidates: Vec<String>,
    pub values: ScoreMatrix,
}

impl LabeledMatrix {
    pub fn new(sources: &[String], candidates: &[String], values: &ScoreMatrix) -> Self {
        Self {
            sources: sources.to_vec(),
            candidates: candidates.to_vec(),
            values: values.clone(),
        }
    }
}

struct Column<'a> {
    sources: &'a [String],
    values: &'a ScoreMatrix,
    col: usize,
}

impl Serialize for Column<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sources.len()))?;
        for (row, source) in self.sources.iter().enumerate() {
            map.serialize_entry(source, &self.values.get(row, self.col))?;
        }
        map.end()
    }
}

impl Serialize for LabeledMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.candidates.len()))?;
        for (col, candidate) in self.candidates.iter().enumerate() {
            let column = Column {
                sources: &self.sources,
                values: &self.values,
                col,
            };
            map.serialize_entry(candidate, &column)?;
        }
        map.end()
    }
}

/// The raw rows of a group, serialized `{column: {row: value}}`.
///
/// Row labels are file row positions. Cells that read as numbers are emitted as
/// JSON numbers; empty cells become `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCandidates {
    columns: Vec<String>,
    rows: Vec<(usize, Vec<String>)>,
}

impl TextCandidates {
    pub fn from_records(records: &[SummaryRecord]) -> Self {
        let columns = records
            .first()
            .map(|r| r.fields.iter().map(|(name, _)| name.clone()).collect())
            .unwrap_or_default();
        let rows = records
            .iter()
            .map(|r| (r.row, r.fields.iter().map(|(_, v)| v.clone()).collect()))
            .collect();
        Self { columns, rows }
    }
}

/// Reads a CSV cell the way a dataframe loader would type it.
pub fn cell_value(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    if let Ok(int) = raw.parse::<i64>() {
        return Value::from(int);
    }
    match raw.parse::<f64>() {
        Ok(float) if float.is_finite() => Value::from(float),
        _ => Value::from(raw),
    }
}

struct CellColumn<'a> {
    rows: &'a [(usize, Vec<String>)],
    col: usize,
}

impl Serialize for CellColumn<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rows.len()))?;
        for (row, cells) in self.rows {
            let value = cells.get(self.col).map_or(Value::Null, |c| cell_value(c));
            map.serialize_entry(&row.to_string(), &value)?;
        }
        map.end()
    }
}

impl Serialize for TextCandidates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (col, name) in self.columns.iter().enumerate() {
            let column = CellColumn {
                rows: &self.rows,
                col,
            };
            map.serialize_entry(name, &column)?;
        }
        map.end()
    }
}
