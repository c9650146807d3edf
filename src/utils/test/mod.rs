//! Test utilities
//!
//! Builders for small NLI datasets and a deterministic keyword extractor,
//! shared by unit and integration tests.


// Re-export commonly used functions for convenience
pub use fixtures::{WordListExtractor, sample_records, write_jsonl, write_parquet};
pub use records::{AugmentedRecord, NliRecord, records_from_batch, records_to_batch};
