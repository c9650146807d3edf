//! Saving datasets to disk
//!
//! Layout (one directory per split, like a saved dataset dictionary):
//!
//! ```text
//! <out>/dataset_dict.json
//! <out>/<split>/data-00000-of-00001.{arrow,parquet}
//! <out>/<split>/dataset_info.json
//! <out>/<split>/state.json
//! ```

use std::fs;
use std::io::BufWriter;
use std::path::Path;

use arrow::ipc::writer::StreamWriter;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use serde::Serialize;

use super::{DatasetDict, OutputFormat, Split};
use crate::error::util::{create_file, ensure_directory};
use crate::error::{KeywordError, Result};
use crate::utils::logging::{log_rows_done, log_warning};

/// Name of the single data file written per split
pub fn data_file_name(format: OutputFormat) -> String {
    format!("data-00000-of-00001.{}", format.extension())
}

#[derive(Debug, Serialize)]
struct DatasetDictFile<'a> {
    splits: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct DataFile {
    filename: String,
}

#[derive(Debug, Serialize)]
struct SplitState<'a> {
    #[serde(rename = "_data_files")]
    data_files: Vec<DataFile>,
    #[serde(rename = "_fingerprint")]
    fingerprint: String,
    #[serde(rename = "_format_columns")]
    format_columns: Option<Vec<String>>,
    #[serde(rename = "_format_kwargs")]
    format_kwargs: serde_json::Map<String, serde_json::Value>,
    #[serde(rename = "_format_type")]
    format_type: Option<String>,
    #[serde(rename = "_output_all_columns")]
    output_all_columns: bool,
    #[serde(rename = "_split")]
    split: &'a str,
}

#[derive(Debug, Serialize)]
struct ColumnInfo {
    name: String,
    data_type: String,
    nullable: bool,
}

#[derive(Debug, Serialize)]
struct SplitInfo {
    description: String,
    num_rows: usize,
    columns: Vec<ColumnInfo>,
    created_at: String,
}

/// Random 16-hex-digit fingerprint identifying one write of a split
fn fingerprint() -> String {
    format!("{:016x}", rand::random::<u64>())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = create_file(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)?;
    Ok(())
}

fn write_arrow_stream(path: &Path, split: &Split) -> Result<()> {
    let file = BufWriter::new(create_file(path)?);
    let mut writer = StreamWriter::try_new(file, &split.schema)?;
    for batch in &split.batches {
        writer.write(batch)?;
    }
    writer.finish()?;
    Ok(())
}

fn write_parquet(path: &Path, split: &Split) -> Result<()> {
    let file = create_file(path)?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, split.schema(), Some(props))?;
    for batch in &split.batches {
        writer.write(batch)?;
    }
    writer.close()?;
    Ok(())
}

/// Write one split into `split_dir`, replacing whatever was there
fn save_split(split: &Split, split_dir: &Path, format: OutputFormat) -> Result<()> {
    if split_dir.exists() {
        log_warning("Overwriting existing split directory", Some(split_dir));
        fs::remove_dir_all(split_dir).map_err(|e| KeywordError::io(split_dir, e))?;
    }
    ensure_directory(split_dir)?;

    let file_name = data_file_name(format);
    let data_path = split_dir.join(&file_name);
    match format {
        OutputFormat::Arrow => write_arrow_stream(&data_path, split)?,
        OutputFormat::Parquet => write_parquet(&data_path, split)?,
    }

    let state = SplitState {
        data_files: vec![DataFile {
            filename: file_name,
        }],
        fingerprint: fingerprint(),
        format_columns: None,
        format_kwargs: serde_json::Map::new(),
        format_type: None,
        output_all_columns: false,
        split: &split.name,
    };
    write_json(&split_dir.join("state.json"), &state)?;

    let info = SplitInfo {
        description: "NLI pairs with extracted keyword sets".to_string(),
        num_rows: split.num_rows(),
        columns: split
            .schema
            .fields()
            .iter()
            .map(|f| ColumnInfo {
                name: f.name().clone(),
                data_type: f.data_type().to_string(),
                nullable: f.is_nullable(),
            })
            .collect(),
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    write_json(&split_dir.join("dataset_info.json"), &info)
}

/// Save every split of `dict` under `out_dir`
pub fn save_to_disk(dict: &DatasetDict, out_dir: &Path, format: OutputFormat) -> Result<()> {
    let start = std::time::Instant::now();
    ensure_directory(out_dir)?;

    for split in &dict.splits {
        log::info!("Saving split '{}' ({} rows)", split.name, split.num_rows());
        save_split(split, &out_dir.join(&split.name), format)?;
    }

    write_json(
        &out_dir.join("dataset_dict.json"),
        &DatasetDictFile {
            splits: dict.split_names(),
        },
    )?;

    log_rows_done("Saved", out_dir, dict.num_rows(), Some(start.elapsed()));
    Ok(())
}
