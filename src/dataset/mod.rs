//! In-memory NLI datasets
//!
//! A dataset is a set of named splits, each a list of Arrow record batches
//! sharing one schema.

pub mod columns;
pub mod reader;
pub mod writer;

use std::sync::Arc;

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;

pub use columns::{remove_columns, strip_stale_metadata};
pub use reader::{find_split_files, load_dataset, load_split, read_data_file};
pub use writer::save_to_disk;

/// Columns of the MultiNLI release that carry no signal for keyword labelling
pub const DEFAULT_DROPPED_COLUMNS: [&str; 6] = [
    "promptID",
    "premise_binary_parse",
    "premise_parse",
    "hypothesis_binary_parse",
    "hypothesis_parse",
    "genre",
];

/// Splits of the MultiNLI release
pub const DEFAULT_SPLITS: [&str; 3] = ["train", "validation_matched", "validation_mismatched"];

/// Default number of rows per record batch when reading
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// On-disk formats the loader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Parquet,
    JsonLines,
    /// Arrow IPC stream, as written by [`save_to_disk`]
    Arrow,
}

impl InputFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "parquet" => Some(Self::Parquet),
            "jsonl" | "json" => Some(Self::JsonLines),
            "arrow" => Some(Self::Arrow),
            _ => None,
        }
    }
}

/// Formats the writer can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Arrow IPC stream files in a dataset-dictionary layout
    #[default]
    Arrow,
    Parquet,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Arrow => "arrow",
            Self::Parquet => "parquet",
        }
    }
}

/// One named split of a dataset
#[derive(Debug, Clone)]
pub struct Split {
    pub name: String,
    pub schema: SchemaRef,
    pub batches: Vec<RecordBatch>,
}

impl Split {
    pub fn new(name: impl Into<String>, schema: SchemaRef, batches: Vec<RecordBatch>) -> Self {
        Self {
            name: name.into(),
            schema,
            batches,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    pub fn schema(&self) -> SchemaRef {
        Arc::clone(&self.schema)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.schema.fields().iter().map(|f| f.name().clone()).collect()
    }

    /// Keep at most the first `limit` rows
    pub fn truncate(&mut self, limit: usize) {
        let mut remaining = limit;
        let mut kept = Vec::new();

        for batch in self.batches.drain(..) {
            if remaining == 0 {
                break;
            }
            let take = remaining.min(batch.num_rows());
            kept.push(batch.slice(0, take));
            remaining -= take;
        }

        self.batches = kept;
    }
}

/// An ordered collection of splits
#[derive(Debug, Clone, Default)]
pub struct DatasetDict {
    pub splits: Vec<Split>,
}

impl DatasetDict {
    pub fn new(splits: Vec<Split>) -> Self {
        Self { splits }
    }

    pub fn get(&self, name: &str) -> Option<&Split> {
        self.splits.iter().find(|s| s.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Split> {
        self.splits.iter_mut().find(|s| s.name == name)
    }

    pub fn split_names(&self) -> Vec<&str> {
        self.splits.iter().map(|s| s.name.as_str()).collect()
    }

    /// Total rows over all splits
    pub fn num_rows(&self) -> usize {
        self.splits.iter().map(Split::num_rows).sum()
    }
}
