//! Augment natural-language-inference datasets with keyword sets.
//!
//! Loads the splits of an NLI dataset from Parquet, JSON Lines or Arrow files,
//! drops unused columns, extracts keywords from each premise and hypothesis
//! and saves the dataset with an extra `keywords` list column.

pub mod config;
pub mod dataset;
pub mod error;
pub mod keywords;
pub mod pipeline;
pub mod transform;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::PipelineConfig;
pub use error::{KeywordError, Result};
pub use pipeline::{PipelineReport, SplitReport, run_pipeline, run_with_extractor};

// Dataset handling
pub use dataset::{DatasetDict, OutputFormat, Split, load_dataset, remove_columns, save_to_disk};

// Keyword extraction
pub use keywords::{
    ExtractorConfig, ExtractorKind, Keyword, KeywordExtractor, KeywordSet, TextRankExtractor,
    build_extractor, word_extraction,
};
pub use transform::{TextColumns, TransformOptions, process_item, transform_batch, transform_split};

// Arrow types
pub use arrow::record_batch::RecordBatch;
