//! Dataset loading
//!
//! Locates the data files of each split inside an input directory and reads
//! them into Arrow record batches. Parquet, JSON Lines and Arrow IPC stream
//! files are supported; files of a split are read in parallel.

use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::datatypes::{Schema, SchemaRef};
use arrow::error::ArrowError;
use arrow::ipc::reader::StreamReader;
use arrow::json::ReaderBuilder;
use arrow::json::reader::infer_json_schema_from_seekable;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use itertools::Itertools;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use rayon::prelude::*;

use super::{DatasetDict, InputFormat, Split, strip_stale_metadata};
use crate::error::util::{open_file, validate_directory};
use crate::error::{KeywordError, Result};
use crate::utils::logging::{log_file_read, log_rows_done, log_warning};

/// Read a Parquet file into record batches
pub fn read_parquet(path: &Path, batch_size: usize) -> Result<(SchemaRef, Vec<RecordBatch>)> {
    let file = open_file(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?.with_batch_size(batch_size);
    let schema = Arc::clone(builder.schema());
    let reader = builder.build()?;

    let batches = reader.collect::<std::result::Result<Vec<_>, ArrowError>>()?;
    Ok((schema, batches))
}

/// Read a JSON Lines file, inferring its schema from the whole file
pub fn read_json_lines(path: &Path, batch_size: usize) -> Result<(SchemaRef, Vec<RecordBatch>)> {
    let mut reader = BufReader::new(open_file(path)?);
    let (schema, records) = infer_json_schema_from_seekable(&mut reader, None)?;
    log::debug!(
        "Inferred {} columns from {} records in {}",
        schema.fields().len(),
        records,
        path.display()
    );

    let schema = Arc::new(schema);
    let json = ReaderBuilder::new(Arc::clone(&schema))
        .with_batch_size(batch_size)
        .build(reader)?;

    let batches = json.collect::<std::result::Result<Vec<_>, ArrowError>>()?;
    Ok((schema, batches))
}

/// Read an Arrow IPC stream file
pub fn read_arrow_stream(path: &Path) -> Result<(SchemaRef, Vec<RecordBatch>)> {
    let reader = StreamReader::try_new(BufReader::new(open_file(path)?), None)?;
    let schema = reader.schema();

    let batches = reader.collect::<std::result::Result<Vec<_>, ArrowError>>()?;
    Ok((schema, batches))
}

/// Read one data file, dispatching on its extension
pub fn read_data_file(path: &Path, batch_size: usize) -> Result<(SchemaRef, Vec<RecordBatch>)> {
    match InputFormat::from_path(path) {
        Some(InputFormat::Parquet) => read_parquet(path, batch_size),
        Some(InputFormat::JsonLines) => read_json_lines(path, batch_size),
        Some(InputFormat::Arrow) => read_arrow_stream(path),
        None => Err(KeywordError::Config(format!(
            "unsupported data file: {}",
            path.display()
        ))),
    }
}

/// Metadata files written next to the data by [`super::save_to_disk`]
const METADATA_FILES: [&str; 3] = ["dataset_dict.json", "dataset_info.json", "state.json"];

/// Data files directly inside `dir`, sorted by name
fn data_files_in(dir: &Path, prefix: Option<&str>) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| KeywordError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| KeywordError::io(dir, e))?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !path.is_file()
            || InputFormat::from_path(&path).is_none()
            || METADATA_FILES.contains(&name)
        {
            continue;
        }
        if prefix.is_none_or(|p| name.starts_with(p)) {
            files.push(path);
        }
    }

    Ok(files.into_iter().sorted().collect_vec())
}

/// Locate the data files of `split` inside `dir`
///
/// Looks for, in order: `<split>.parquet`, `<split>.jsonl`, `<split>.json`,
/// a `<split>/` directory of data files, and sharded `<split>-*` files.
pub fn find_split_files(dir: &Path, split: &str) -> Result<Vec<PathBuf>> {
    validate_directory(dir)?;

    for extension in ["parquet", "jsonl", "json"] {
        let candidate = dir.join(format!("{split}.{extension}"));
        if candidate.is_file() {
            return Ok(vec![candidate]);
        }
    }

    let split_dir = dir.join(split);
    if split_dir.is_dir() {
        let files = data_files_in(&split_dir, None)?;
        if !files.is_empty() {
            return Ok(files);
        }
        log_warning("Split directory holds no data files", Some(&split_dir));
    }

    let shards = data_files_in(dir, Some(&format!("{split}-")))?;
    if !shards.is_empty() {
        return Ok(shards);
    }

    Err(KeywordError::SplitNotFound {
        split: split.to_string(),
        dir: dir.to_path_buf(),
    })
}

/// Load one split, reading its files in parallel
pub fn load_split(dir: &Path, split: &str, batch_size: usize) -> Result<Split> {
    let start = std::time::Instant::now();
    let files = find_split_files(dir, split)?;
    log::info!("Loading split '{split}' from {} file(s)", files.len());

    let results: Vec<Result<(SchemaRef, Vec<RecordBatch>)>> = files
        .par_iter()
        .map(|path| {
            log_file_read(path);
            read_data_file(path, batch_size)
        })
        .collect();

    let mut schema: Option<SchemaRef> = None;
    let mut batches = Vec::new();
    for (path, result) in files.iter().zip(results) {
        let (file_schema, file_batches) = result?;
        match &schema {
            None => schema = Some(file_schema),
            Some(expected) if expected.fields() != file_schema.fields() => {
                return Err(KeywordError::SchemaMismatch(format!(
                    "{} does not match the schema of the other '{split}' files",
                    path.display()
                )));
            }
            Some(_) => {}
        }
        batches.extend(file_batches);
    }

    // Batches keep the file's metadata; rebuild them on the stripped schema
    let schema = strip_stale_metadata(schema.unwrap_or_else(|| Arc::new(Schema::empty())));
    let batches = batches
        .into_iter()
        .map(|batch| {
            let options = RecordBatchOptions::new().with_row_count(Some(batch.num_rows()));
            RecordBatch::try_new_with_options(
                Arc::clone(&schema),
                batch.columns().to_vec(),
                &options,
            )
        })
        .collect::<std::result::Result<Vec<_>, ArrowError>>()?;

    let split = Split::new(split, schema, batches);
    log_rows_done("Loaded", dir, split.num_rows(), Some(start.elapsed()));
    Ok(split)
}

/// Load the named splits from `dir`
pub fn load_dataset(dir: &Path, splits: &[String], batch_size: usize) -> Result<DatasetDict> {
    let splits = splits
        .iter()
        .map(|name| load_split(dir, name, batch_size))
        .collect::<Result<Vec<_>>>()?;

    Ok(DatasetDict::new(splits))
}
