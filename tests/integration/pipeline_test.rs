use std::fs;
use std::path::Path;

use nli_keywords::dataset::load_split;
use nli_keywords::utils::test::{
    AugmentedRecord, WordListExtractor, records_from_batch, sample_records, write_jsonl,
    write_parquet,
};
use nli_keywords::{
    ExtractorConfig, KeywordError, OutputFormat, PipelineConfig, TextColumns, TextRankExtractor,
    run_pipeline, run_with_extractor,
};

fn config_for(input: &Path, output: &Path, splits: &[&str]) -> PipelineConfig {
    PipelineConfig {
        input_dir: input.to_path_buf(),
        output_dir: output.to_path_buf(),
        splits: splits.iter().map(ToString::to_string).collect(),
        show_progress: false,
        ..PipelineConfig::default()
    }
}

fn saved_records(dir: &Path, split: &str) -> Vec<AugmentedRecord> {
    let split = load_split(dir, split, 1024).unwrap();
    split
        .batches
        .iter()
        .flat_map(|batch| records_from_batch::<AugmentedRecord>(batch).unwrap())
        .collect()
}

#[test]
fn test_multinli_layout_end_to_end() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    for split in ["train", "validation_matched", "validation_mismatched"] {
        write_parquet(&input.path().join(format!("{split}.parquet")), &sample_records()).unwrap();
    }

    let config = config_for(
        input.path(),
        output.path(),
        &["train", "validation_matched", "validation_mismatched"],
    );
    let (dataset, report) = run_with_extractor(&config, &WordListExtractor).unwrap();

    assert_eq!(report.splits.len(), 3);
    assert_eq!(report.total_rows(), 3 * sample_records().len());
    for split in &dataset.splits {
        assert_eq!(
            split.column_names(),
            vec!["pairID", "premise", "hypothesis", "label", "keywords"]
        );
    }

    let records = saved_records(output.path(), "validation_matched");
    assert_eq!(records.len(), sample_records().len());
    // empty premise contributes nothing
    assert_eq!(records[3].keywords, vec!["and", "gays", "lesbians"]);
    for (record, original) in records.iter().zip(sample_records()) {
        assert_eq!(record.premise, original.premise);
        assert_eq!(record.hypothesis, original.hypothesis);
        assert_eq!(record.label, original.label);
    }
}

#[test]
fn test_keywords_are_union_of_both_texts() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_jsonl(&input.path().join("train.jsonl"), &sample_records()).unwrap();

    let config = config_for(input.path(), output.path(), &["train"]);
    run_with_extractor(&config, &WordListExtractor).unwrap();

    for record in saved_records(output.path(), "train") {
        let text = format!("{} {}", record.premise, record.hypothesis).to_lowercase();
        for keyword in &record.keywords {
            assert!(text.contains(keyword.as_str()), "{keyword} not in {text}");
        }
        let mut sorted = record.keywords.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, record.keywords);
    }
}

#[test]
fn test_textrank_pipeline() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_parquet(&input.path().join("train.parquet"), &sample_records()).unwrap();

    let config = config_for(input.path(), output.path(), &["train"]);
    let extractor = TextRankExtractor::new(ExtractorConfig::default()).unwrap();
    let (_, report) = run_with_extractor(&config, &extractor).unwrap();
    assert_eq!(report.splits[0].rows, sample_records().len());

    let records = saved_records(output.path(), "train");
    assert_eq!(records[3].keywords, vec!["gays", "lesbians"]);
    for record in &records {
        assert!(!record.keywords.is_empty());
        // at most top_n from each text
        assert!(record.keywords.len() <= 10);
        assert!(!record.keywords.iter().any(|k| k == "and" || k == "the"));
    }
}

#[test]
fn test_run_pipeline_writes_dataset_dict() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_parquet(&input.path().join("train.parquet"), &sample_records()).unwrap();
    write_parquet(
        &input.path().join("validation_matched.parquet"),
        &sample_records(),
    )
    .unwrap();

    let config = config_for(input.path(), output.path(), &["train", "validation_matched"]);
    let report = run_pipeline(&config).unwrap();
    assert_eq!(report.total_rows(), 2 * sample_records().len());

    let dict: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output.path().join("dataset_dict.json")).unwrap())
            .unwrap();
    assert_eq!(dict["splits"], serde_json::json!(["train", "validation_matched"]));

    let split_dir = output.path().join("train");
    assert!(split_dir.join("data-00000-of-00001.arrow").is_file());
    let state: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(split_dir.join("state.json")).unwrap()).unwrap();
    assert_eq!(state["_split"], "train");
    assert_eq!(
        state["_data_files"][0]["filename"],
        "data-00000-of-00001.arrow"
    );
}

#[test]
fn test_parquet_output() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_parquet(&input.path().join("train.parquet"), &sample_records()).unwrap();

    let config = PipelineConfig {
        output_format: OutputFormat::Parquet,
        ..config_for(input.path(), output.path(), &["train"])
    };
    run_with_extractor(&config, &WordListExtractor).unwrap();

    assert!(
        output
            .path()
            .join("train")
            .join("data-00000-of-00001.parquet")
            .is_file()
    );
    assert_eq!(saved_records(output.path(), "train").len(), sample_records().len());
}

#[test]
fn test_missing_split_fails() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_parquet(&input.path().join("train.parquet"), &sample_records()).unwrap();

    let config = config_for(input.path(), output.path(), &["train", "validation_matched"]);
    let err = run_with_extractor(&config, &WordListExtractor).unwrap_err();
    assert!(matches!(err, KeywordError::SplitNotFound { ref split, .. } if split == "validation_matched"));
    assert!(!output.path().join("dataset_dict.json").exists());
}

#[test]
fn test_missing_dropped_column() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_parquet(&input.path().join("train.parquet"), &sample_records()).unwrap();

    let mut config = config_for(input.path(), output.path(), &["train"]);
    config.dropped_columns.push("annotator_labels".to_string());
    let err = run_with_extractor(&config, &WordListExtractor).unwrap_err();
    assert!(matches!(err, KeywordError::ColumnNotFound { .. }));

    config.ignore_missing_columns = true;
    let (dataset, _) = run_with_extractor(&config, &WordListExtractor).unwrap();
    assert!(dataset.get("train").is_some());
}

#[test]
fn test_custom_text_columns() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let rows = [
        serde_json::json!({"sentence1": "Red apples grow", "sentence2": "Apples are red", "label": 0}),
        serde_json::json!({"sentence1": "Cats sleep", "sentence2": null, "label": 1}),
    ];
    let body = rows.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n");
    fs::write(input.path().join("train.jsonl"), body).unwrap();

    let config = PipelineConfig {
        dropped_columns: Vec::new(),
        columns: TextColumns {
            premise: "sentence1".to_string(),
            hypothesis: "sentence2".to_string(),
            output: "terms".to_string(),
        },
        ..config_for(input.path(), output.path(), &["train"])
    };
    let (dataset, report) = run_with_extractor(&config, &WordListExtractor).unwrap();
    // {apples, are, grow, red} and {cats, sleep}
    assert_eq!(report.splits[0].keywords, 6);

    let split = dataset.get("train").unwrap();
    let mut names = split.column_names();
    assert_eq!(names.pop().as_deref(), Some("terms"));
    names.sort();
    assert_eq!(names, vec!["label", "sentence1", "sentence2"]);
}
