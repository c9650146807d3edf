//! Console output utilities
//!
//! This module provides utilities for formatted console output.

use arrow::util::pretty::pretty_format_batches;

use crate::dataset::Split;
use crate::error::Result;

/// Print summary information about a split
pub fn print_split_summary(split: &Split) {
    println!(
        "Split '{}': {} rows in {} batches",
        split.name,
        split.num_rows(),
        split.batches.len()
    );
    for field in split.schema.fields() {
        println!("  - {} ({})", field.name(), field.data_type());
    }
}

/// Print the first `num_rows` rows of a split as a table
pub fn print_sample_rows(split: &Split, num_rows: usize) -> Result<()> {
    let mut remaining = num_rows;
    let mut sample = Vec::new();
    for batch in &split.batches {
        if remaining == 0 {
            break;
        }
        let take = remaining.min(batch.num_rows());
        sample.push(batch.slice(0, take));
        remaining -= take;
    }

    println!("{}", pretty_format_batches(&sample)?);
    Ok(())
}
