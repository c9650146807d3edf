//! Column selection on splits

use std::sync::Arc;

use arrow::datatypes::{Schema, SchemaRef};
use arrow::record_batch::RecordBatch;

use super::Split;
use crate::error::{KeywordError, Result};
use crate::utils::logging::log_warning;

/// Schema metadata key describing the original feature layout; it no longer
/// matches once columns are dropped or added
const FEATURES_METADATA_KEY: &str = "huggingface";

/// Remove metadata that describes a column layout we are about to change
pub fn strip_stale_metadata(schema: SchemaRef) -> SchemaRef {
    if !schema.metadata().contains_key(FEATURES_METADATA_KEY) {
        return schema;
    }

    let mut metadata = schema.metadata().clone();
    metadata.remove(FEATURES_METADATA_KEY);
    Arc::new(Schema::new_with_metadata(schema.fields().clone(), metadata))
}

/// Drop `columns` from every batch of `split`
///
/// A column that does not exist is an error unless `ignore_missing` is set,
/// in which case it is skipped with a warning.
pub fn remove_columns<S: AsRef<str>>(
    split: Split,
    columns: &[S],
    ignore_missing: bool,
) -> Result<Split> {
    for column in columns {
        let column = column.as_ref();
        if split.schema.index_of(column).is_err() {
            if !ignore_missing {
                return Err(KeywordError::ColumnNotFound {
                    column: column.to_string(),
                    split: split.name.clone(),
                });
            }
            log_warning(
                &format!("Column '{column}' not found in split '{}', skipping", split.name),
                None,
            );
        }
    }

    let keep: Vec<usize> = split
        .schema
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, f)| !columns.iter().any(|c| c.as_ref() == f.name()))
        .map(|(i, _)| i)
        .collect();

    if keep.len() == split.schema.fields().len() {
        return Ok(split);
    }

    let schema = Arc::new(split.schema.project(&keep)?);
    let batches = split
        .batches
        .iter()
        .map(|batch| batch.project(&keep))
        .collect::<std::result::Result<Vec<RecordBatch>, _>>()?;

    log::debug!(
        "Split '{}': kept {} of {} columns",
        split.name,
        keep.len(),
        split.schema.fields().len()
    );

    Ok(Split::new(split.name, schema, batches))
}
