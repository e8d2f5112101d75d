//! End-to-end runs: CSV in, reranked JSON out.

mod common;

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tempfile::TempDir;

use glimpse::{
    LEXICAL_SCORER_NAME, LexicalScorer, LikelihoodScorer, MockScorer, RerankOutput, RsaConfig,
    SchemaError, group_summaries, load_summaries, output_path, rerank_groups, write_json,
};

use common::{HEADER, sample_rows, write_summaries};

async fn run(
    summaries: &Path,
    out_dir: &Path,
    scorer: Arc<dyn LikelihoodScorer>,
    config: RsaConfig,
) -> (std::path::PathBuf, Value) {
    let records = load_summaries(summaries).expect("load summaries");
    let groups = group_summaries(records).expect("group summaries");
    let model_name = scorer.name().to_string();

    let report = rerank_groups(groups, scorer, config.clone(), 2)
        .await
        .expect("valid config");
    let failures = report.failure_records();
    let output = RerankOutput::new(report.records, &model_name, config.iterations)
        .with_failures(failures);

    let path = output_path(out_dir, summaries, config.rationality, &model_name);
    write_json(&path, &output).expect("write output");

    let text = std::fs::read_to_string(&path).expect("read output");
    (path, serde_json::from_str(&text).expect("valid JSON"))
}

fn speaker_row_sum(speaker: &Value, source: &str) -> f64 {
    speaker
        .as_object()
        .unwrap()
        .values()
        .map(|column| column[source].as_f64().unwrap())
        .sum()
}

#[tokio::test]
async fn test_rerank_csv_to_json() {
    let dir = TempDir::new().unwrap();
    let summaries = write_summaries(&dir, "multi_news-sample.csv", &sample_rows());
    let out_dir = dir.path().join("output");

    let (path, json) = run(
        &summaries,
        &out_dir,
        Arc::new(LexicalScorer::new()),
        RsaConfig::default(),
    )
    .await;

    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "multi_news-sample-_-r3-_-rsa_reranked-lexical-unigram-stub.json"
    );
    assert_eq!(json["metadata/reranking_model"], LEXICAL_SCORER_NAME);
    assert_eq!(json["metadata/rsa_iterations"], 2);
    assert!(json.get("failures").is_none());

    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["id"], "news-1");
    assert_eq!(results[1]["id"], "sport-7");

    let news = &results[0];
    assert_eq!(news["gold"], "Budget approved.");
    assert_eq!(news["rationality"], 3.0);
    assert_eq!(
        news["best_base"],
        serde_json::json!(["The council approved the budget.", "Rain flooded downtown streets."])
    );
    assert_eq!(
        news["best_rsa"],
        serde_json::json!(["The council approved the budget.", "Rain flooded downtown streets."])
    );
    assert_eq!(news["consensuality_scores"].as_array().unwrap().len(), 3);
    assert_eq!(news["text_candidates"]["summary"]["2"], "Things happened in the city.");

    for source in [
        "The council approved the city budget on Tuesday evening.",
        "Heavy rain flooded several downtown streets overnight.",
    ] {
        let sum = speaker_row_sum(&news["speaker_df"], source);
        assert!((sum - 1.0).abs() < 1e-6, "speaker row sums to {sum}");
    }

    let sport = &results[1];
    assert_eq!(sport["best_rsa"].as_array().unwrap().len(), 2);
    assert_eq!(sport["language_model_proba_df"].as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn test_failed_group_is_reported_and_others_written() {
    let dir = TempDir::new().unwrap();
    let summaries = write_summaries(&dir, "sample.csv", &sample_rows());
    let scorer = MockScorer::new(-4.0).failing_on("Sports news today.");

    let (_, json) = run(
        &summaries,
        dir.path(),
        Arc::new(scorer),
        RsaConfig::default().with_iterations(1),
    )
    .await;

    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], "news-1");
    assert_eq!(json["metadata/rsa_iterations"], 1);

    let failures = json["failures"].as_array().unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0]["id"], "sport-7");
    assert!(failures[0]["error"].as_str().unwrap().contains("Sports news today."));
}

#[tokio::test]
async fn test_single_source_group_is_neutral() {
    let dir = TempDir::new().unwrap();
    let rows = vec![
        ["0", "solo", "A dog ran.", "g", "A dog ran.", "0"],
        ["1", "solo", "A dog ran.", "g", "Something happened.", "1"],
    ];
    let summaries = write_summaries(&dir, "solo.csv", &rows);

    let (_, json) = run(
        &summaries,
        dir.path(),
        Arc::new(LexicalScorer::new()),
        RsaConfig::default(),
    )
    .await;

    let record = &json["results"][0];
    assert_eq!(record["best_rsa"], serde_json::json!(["A dog ran."]));
    assert_eq!(record["consensuality_scores"], serde_json::json!([0.0, 0.0]));
    assert_eq!(record["initial_consensuality_scores"], serde_json::json!([0.0, 0.0]));
}

#[test]
fn test_missing_columns_fail_before_scoring() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.csv");
    std::fs::write(&path, "index,id,text,summary\n0,a,b,c\n").unwrap();

    let err = load_summaries(&path).unwrap_err();

    assert!(matches!(err, SchemaError::MissingColumns { .. }));
    assert!(err.to_string().contains("gold"));
    assert!(err.to_string().contains("id_candidate"));
}

#[test]
fn test_fixture_header_matches_required_columns() {
    assert_eq!(
        HEADER.split(',').collect::<Vec<_>>(),
        glimpse::constants::REQUIRED_COLUMNS.to_vec()
    );
}
