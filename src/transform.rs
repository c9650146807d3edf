//! Keyword augmentation of NLI splits
//!
//! Every row gets a `keywords` list column holding the union of the keywords
//! extracted from its premise and its hypothesis.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, ListBuilder, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;

use crate::dataset::Split;
use crate::error::{KeywordError, Result};
use crate::keywords::{KeywordExtractor, KeywordSet, word_extraction};
use crate::utils::logging::{create_main_progress_bar, finish_progress_bar};

/// Names of the input text columns and the output keyword column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextColumns {
    pub premise: String,
    pub hypothesis: String,
    pub output: String,
}

impl Default for TextColumns {
    fn default() -> Self {
        Self {
            premise: "premise".to_string(),
            hypothesis: "hypothesis".to_string(),
            output: "keywords".to_string(),
        }
    }
}

/// How a split is transformed
#[derive(Debug, Clone)]
pub struct TransformOptions {
    pub columns: TextColumns,
    /// Rows handed to the extractor per batch call
    pub chunk_size: usize,
    pub show_progress: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            columns: TextColumns::default(),
            chunk_size: 1024,
            show_progress: false,
        }
    }
}

/// Keywords of one NLI pair: the union of the premise and hypothesis sets
///
/// Missing texts count as empty.
pub fn process_item(
    extractor: &dyn KeywordExtractor,
    premise: Option<&str>,
    hypothesis: Option<&str>,
) -> Result<KeywordSet> {
    let mut keywords = word_extraction(extractor, premise.unwrap_or_default())?;
    keywords.extend(word_extraction(extractor, hypothesis.unwrap_or_default())?);
    Ok(keywords)
}

/// Keyword sets for many texts at once, matching [`word_extraction`] row by row
fn word_extraction_batch(
    extractor: &dyn KeywordExtractor,
    texts: &[Option<&str>],
) -> Result<Vec<KeywordSet>> {
    let (indices, non_blank): (Vec<usize>, Vec<&str>) = texts
        .iter()
        .enumerate()
        .filter_map(|(i, text)| text.filter(|t| !t.trim().is_empty()).map(|t| (i, t)))
        .unzip();

    let mut sets = vec![KeywordSet::new(); texts.len()];
    let extracted = extractor.extract_keywords_batch(&non_blank)?;
    if extracted.len() != non_blank.len() {
        return Err(KeywordError::Extraction(format!(
            "{} returned {} results for {} texts",
            extractor.name(),
            extracted.len(),
            non_blank.len()
        )));
    }

    for (i, keywords) in indices.into_iter().zip(extracted) {
        sets[i] = keywords.into_iter().map(|k| k.text).collect();
    }
    Ok(sets)
}

/// Values of a string column, accepting both `Utf8` and `LargeUtf8`
fn string_values<'a>(
    batch: &'a RecordBatch,
    column: &str,
    split: &str,
) -> Result<Vec<Option<&'a str>>> {
    let array = batch
        .column_by_name(column)
        .ok_or_else(|| KeywordError::ColumnNotFound {
            column: column.to_string(),
            split: split.to_string(),
        })?;

    match array.data_type() {
        DataType::Utf8 => Ok(array.as_string::<i32>().iter().collect()),
        DataType::LargeUtf8 => Ok(array.as_string::<i64>().iter().collect()),
        other => Err(KeywordError::InvalidColumnType {
            column: column.to_string(),
            data_type: other.clone(),
        }),
    }
}

/// Field of the keyword list column
pub fn keywords_field(name: &str) -> Field {
    Field::new(
        name,
        DataType::List(Arc::new(Field::new("item", DataType::Utf8, true))),
        false,
    )
}

/// `schema` with `output` appended (replacing a column of the same name)
pub fn output_schema(schema: &Schema, output: &str) -> SchemaRef {
    let mut fields: Vec<_> = schema
        .fields()
        .iter()
        .filter(|f| f.name() != output)
        .cloned()
        .collect();
    fields.push(Arc::new(keywords_field(output)));
    Arc::new(Schema::new_with_metadata(fields, schema.metadata().clone()))
}

fn build_keywords_array(sets: &[KeywordSet]) -> ArrayRef {
    let mut builder = ListBuilder::new(StringBuilder::new());
    for set in sets {
        for keyword in set {
            builder.values().append_value(keyword);
        }
        builder.append(true);
    }
    Arc::new(builder.finish())
}

/// Append the keyword column to one batch
pub fn transform_batch(
    batch: &RecordBatch,
    extractor: &dyn KeywordExtractor,
    options: &TransformOptions,
    split: &str,
) -> Result<RecordBatch> {
    transform_batch_with_progress(batch, extractor, options, split, &mut |_: usize| {})
}

fn transform_batch_with_progress(
    batch: &RecordBatch,
    extractor: &dyn KeywordExtractor,
    options: &TransformOptions,
    split: &str,
    on_rows: &mut dyn FnMut(usize),
) -> Result<RecordBatch> {
    let columns = &options.columns;
    let premises = string_values(batch, &columns.premise, split)?;
    let hypotheses = string_values(batch, &columns.hypothesis, split)?;
    let chunk_size = options.chunk_size.max(1);

    let mut sets = Vec::with_capacity(batch.num_rows());
    let chunks = premises
        .chunks(chunk_size)
        .zip(hypotheses.chunks(chunk_size));
    for (premise_chunk, hypothesis_chunk) in chunks {
        let premise_sets = word_extraction_batch(extractor, premise_chunk)?;
        let hypothesis_sets = word_extraction_batch(extractor, hypothesis_chunk)?;
        for (mut premise_set, hypothesis_set) in premise_sets.into_iter().zip(hypothesis_sets) {
            premise_set.extend(hypothesis_set);
            sets.push(premise_set);
        }
        on_rows(premise_chunk.len());
    }

    let schema = output_schema(&batch.schema(), &columns.output);
    let mut arrays: Vec<ArrayRef> = batch
        .schema()
        .fields()
        .iter()
        .zip(batch.columns())
        .filter(|(f, _)| f.name() != &columns.output)
        .map(|(_, c)| Arc::clone(c))
        .collect();
    arrays.push(build_keywords_array(&sets));

    Ok(RecordBatch::try_new(schema, arrays)?)
}

/// Append the keyword column to every batch of a split
pub fn transform_split(
    split: Split,
    extractor: &dyn KeywordExtractor,
    options: &TransformOptions,
) -> Result<Split> {
    let start = std::time::Instant::now();
    let total = split.num_rows();
    let pb = create_main_progress_bar(total as u64, Some(&split.name), options.show_progress);

    let batches = split
        .batches
        .iter()
        .map(|batch| {
            let mut on_rows = |rows: usize| pb.inc(rows as u64);
            transform_batch_with_progress(batch, extractor, options, &split.name, &mut on_rows)
        })
        .collect::<Result<Vec<_>>>()?;

    finish_progress_bar(&pb, Some("done"));
    log::info!(
        "Extracted keywords for {} rows of '{}' with {} in {:?}",
        total,
        split.name,
        extractor.name(),
        start.elapsed()
    );

    let schema = output_schema(&split.schema, &options.columns.output);
    Ok(Split::new(split.name, schema, batches))
}
