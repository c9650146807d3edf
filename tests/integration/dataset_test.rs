use std::fs;

use nli_keywords::dataset::{DEFAULT_DROPPED_COLUMNS, load_split};
use nli_keywords::utils::test::{
    NliRecord, records_from_batch, records_to_batch, sample_records, write_jsonl, write_parquet,
};
use nli_keywords::{
    DatasetDict, KeywordError, OutputFormat, Split, load_dataset, remove_columns, save_to_disk,
};

#[test]
fn test_load_mixed_formats() {
    let dir = tempfile::tempdir().unwrap();
    write_parquet(&dir.path().join("train.parquet"), &sample_records()).unwrap();
    write_jsonl(&dir.path().join("validation_matched.jsonl"), &sample_records()).unwrap();

    let splits = vec!["train".to_string(), "validation_matched".to_string()];
    let dataset = load_dataset(dir.path(), &splits, 2).unwrap();

    assert_eq!(dataset.split_names(), vec!["train", "validation_matched"]);
    assert_eq!(dataset.num_rows(), 2 * sample_records().len());
    let train = dataset.get("train").unwrap();
    assert_eq!(train.batches.len(), 2);
    assert!(train.schema.field_with_name("premise_binary_parse").is_ok());
}

#[test]
fn test_drop_default_columns() {
    let dir = tempfile::tempdir().unwrap();
    write_parquet(&dir.path().join("train.parquet"), &sample_records()).unwrap();

    let split = load_split(dir.path(), "train", 1024).unwrap();
    let split = remove_columns(split, &DEFAULT_DROPPED_COLUMNS[..], false).unwrap();
    assert_eq!(
        split.column_names(),
        vec!["pairID", "premise", "hypothesis", "label"]
    );
    assert_eq!(split.num_rows(), sample_records().len());
}

#[test]
fn test_saved_split_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let batch = records_to_batch(&sample_records()).unwrap();
    let dataset = DatasetDict::new(vec![Split::new("train", batch.schema(), vec![batch])]);

    let out = dir.path().join("saved");
    save_to_disk(&dataset, &out, OutputFormat::Arrow).unwrap();

    // metadata files next to the data are not read back as rows
    let reloaded = load_split(&out, "train", 1024).unwrap();
    assert_eq!(reloaded.num_rows(), sample_records().len());
    let records: Vec<NliRecord> = reloaded
        .batches
        .iter()
        .flat_map(|b| records_from_batch::<NliRecord>(b).unwrap())
        .collect();
    assert_eq!(records, sample_records());

    let info: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(out.join("train").join("dataset_info.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(info["num_rows"], sample_records().len());
}

#[test]
fn test_save_replaces_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("saved");
    let batch = records_to_batch(&sample_records()).unwrap();
    let dataset = DatasetDict::new(vec![Split::new("train", batch.schema(), vec![batch])]);

    save_to_disk(&dataset, &out, OutputFormat::Parquet).unwrap();
    save_to_disk(&dataset, &out, OutputFormat::Arrow).unwrap();

    let split_dir = out.join("train");
    assert!(!split_dir.join("data-00000-of-00001.parquet").exists());
    assert!(split_dir.join("data-00000-of-00001.arrow").is_file());
    assert_eq!(load_split(&out, "train", 1024).unwrap().num_rows(), sample_records().len());
}

#[test]
fn test_mismatched_shards() {
    let dir = tempfile::tempdir().unwrap();
    write_parquet(&dir.path().join("train-00000-of-00002.parquet"), &sample_records()).unwrap();
    fs::write(
        dir.path().join("train-00001-of-00002.jsonl"),
        "{\"premise\": \"a b\", \"hypothesis\": \"c d\"}\n",
    )
    .unwrap();

    let err = load_split(dir.path(), "train", 1024).unwrap_err();
    assert!(matches!(err, KeywordError::SchemaMismatch(_)));
}

#[test]
fn test_input_dir_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(load_split(&missing, "train", 1024).is_err());
}
