//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;

pub const HEADER: &str = "index,id,text,gold,summary,id_candidate";

/// Two documents, each with two sources and three candidates. Candidate
/// wording overlaps one source much more than the other.
pub fn sample_rows() -> Vec<[&'static str; 6]> {
    vec![
        ["0", "news-1", "The council approved the city budget on Tuesday evening.", "Budget approved.", "The council approved the budget.", "0"],
        ["1", "news-1", "Heavy rain flooded several downtown streets overnight.", "Budget approved.", "Rain flooded downtown streets.", "1"],
        ["2", "news-1", "The council approved the city budget on Tuesday evening.", "Budget approved.", "Things happened in the city.", "2"],
        ["3", "sport-7", "The home team won the championship after overtime.", "Team wins.", "The home team won the championship.", "0"],
        ["4", "sport-7", "A young striker signed a five year contract.", "Team wins.", "Striker signed a contract.", "1"],
        ["5", "sport-7", "A young striker signed a five year contract.", "Team wins.", "Sports news today.", "2"],
    ]
}

fn quote(field: &str) -> String {
    if field.contains(',') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Writes `rows` under `HEADER` into `dir/name` and returns the path.
pub fn write_summaries(dir: &TempDir, name: &str, rows: &[[&str; 6]]) -> PathBuf {
    let mut contents = String::from(HEADER);
    contents.push('\n');
    for row in rows {
        let line: Vec<String> = row.iter().map(|f| quote(f)).collect();
        contents.push_str(&line.join(","));
        contents.push('\n');
    }

    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}
