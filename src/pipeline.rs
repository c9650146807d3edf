//! End-to-end run: load, drop columns, extract keywords, save.

use std::time::{Duration, Instant};

use arrow::array::AsArray;

use crate::config::PipelineConfig;
use crate::dataset::{DatasetDict, Split, load_dataset, remove_columns, save_to_disk};
use crate::error::Result;
use crate::keywords::{KeywordExtractor, build_extractor};
use crate::transform::transform_split;
use crate::utils::logging::{create_spinner, finish_progress_bar};

/// Outcome of one split
#[derive(Debug, Clone, PartialEq)]
pub struct SplitReport {
    pub name: String,
    pub rows: usize,
    /// Keywords over all rows of the split
    pub keywords: usize,
}

impl SplitReport {
    /// Average keywords per row
    pub fn keywords_per_row(&self) -> f64 {
        if self.rows == 0 {
            0.0
        } else {
            self.keywords as f64 / self.rows as f64
        }
    }
}

/// Outcome of a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub splits: Vec<SplitReport>,
    pub elapsed: Duration,
}

impl PipelineReport {
    pub fn total_rows(&self) -> usize {
        self.splits.iter().map(|s| s.rows).sum()
    }
}

/// Count the keyword list entries of a transformed split
fn count_keywords(split: &Split, column: &str) -> usize {
    split
        .batches
        .iter()
        .filter_map(|batch| batch.column_by_name(column))
        .map(|array| {
            let offsets = array.as_list::<i32>().value_offsets();
            match (offsets.first(), offsets.last()) {
                (Some(&first), Some(&last)) => (last - first) as usize,
                _ => 0,
            }
        })
        .sum()
}

/// Run the pipeline with an already constructed extractor
pub fn run_with_extractor(
    config: &PipelineConfig,
    extractor: &dyn KeywordExtractor,
) -> Result<(DatasetDict, PipelineReport)> {
    let start = Instant::now();

    let spinner = create_spinner(Some("Loading dataset"), config.show_progress);
    let mut dataset = load_dataset(&config.input_dir, &config.splits, config.batch_size)?;
    finish_progress_bar(&spinner, None);

    let options = config.transform_options();
    let mut splits = Vec::with_capacity(dataset.splits.len());
    let mut reports = Vec::with_capacity(dataset.splits.len());

    for mut split in dataset.splits.drain(..) {
        if let Some(limit) = config.limit {
            split.truncate(limit);
        }
        let split = remove_columns(
            split,
            config.dropped_columns.as_slice(),
            config.ignore_missing_columns,
        )?;

        log::info!("Transform {}", split.name);
        let split = transform_split(split, extractor, &options)?;

        let report = SplitReport {
            name: split.name.clone(),
            rows: split.num_rows(),
            keywords: count_keywords(&split, &options.columns.output),
        };
        log::info!(
            "Split '{}': {} rows, {:.2} keywords per row",
            report.name,
            report.rows,
            report.keywords_per_row()
        );

        reports.push(report);
        splits.push(split);
    }
    dataset.splits = splits;

    save_to_disk(&dataset, &config.output_dir, config.output_format)?;

    let report = PipelineReport {
        splits: reports,
        elapsed: start.elapsed(),
    };
    Ok((dataset, report))
}

/// Build the configured extractor and run the pipeline
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineReport> {
    let extractor = build_extractor(config.extractor, config.extractor_config.clone())?;
    let (_, report) = run_with_extractor(config, extractor.as_ref())?;

    log::info!(
        "Processed {} rows in {:?}; saved to {}",
        report.total_rows(),
        report.elapsed,
        config.output_dir.display()
    );
    Ok(report)
}
