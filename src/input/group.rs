use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use super::error::SchemaError;
use super::record::SummaryRecord;

/// All records sharing one `id`: a set of source documents and the candidate
/// summaries to rerank against them.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: String,
    /// Unique, in first-seen order.
    pub source_texts: Vec<String>,
    /// Unique, in first-seen order.
    pub candidates: Vec<String>,
    /// `gold` of the group's first row.
    pub gold: String,
    pub rows: Vec<SummaryRecord>,
}

impl Group {
    /// Builds a group from its rows. Empty cells are not sources or candidates.
    pub fn from_records(id: String, rows: Vec<SummaryRecord>) -> Result<Self, SchemaError> {
        let source_texts = unique_non_empty(rows.iter().map(|r| r.text.as_str()));
        if source_texts.is_empty() {
            return Err(SchemaError::EmptyGroup { id, field: "text" });
        }

        let candidates = unique_non_empty(rows.iter().map(|r| r.summary.as_str()));
        if candidates.is_empty() {
            return Err(SchemaError::EmptyGroup {
                id,
                field: "summary",
            });
        }

        let skipped = rows
            .iter()
            .filter(|r| r.text.trim().is_empty() || r.summary.trim().is_empty())
            .count();
        if skipped > 0 {
            warn!(id = %id, skipped, "Rows with empty text or summary cells");
        }

        let gold = rows.first().map(|r| r.gold.clone()).unwrap_or_default();

        Ok(Self {
            id,
            source_texts,
            candidates,
            gold,
            rows,
        })
    }

    pub fn n_sources(&self) -> usize {
        self.source_texts.len()
    }

    pub fn n_candidates(&self) -> usize {
        self.candidates.len()
    }
}

fn unique_non_empty<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| !v.trim().is_empty())
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// Groups records by `id` in order of first appearance.
pub fn group_summaries(records: Vec<SummaryRecord>) -> Result<Vec<Group>, SchemaError> {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<SummaryRecord>> = HashMap::new();

    for record in records {
        let bucket = buckets.entry(record.id.clone()).or_insert_with(|| {
            order.push(record.id.clone());
            Vec::new()
        });
        bucket.push(record);
    }

    let groups = order
        .into_iter()
        .map(|id| {
            let rows = buckets.remove(&id).unwrap_or_default();
            Group::from_records(id, rows)
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(groups = groups.len(), "Grouped summaries by id");
    Ok(groups)
}
