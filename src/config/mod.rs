//! Configuration for the keyword pipeline.

use std::path::PathBuf;

use crate::dataset::{DEFAULT_BATCH_SIZE, DEFAULT_DROPPED_COLUMNS, DEFAULT_SPLITS, OutputFormat};
use crate::keywords::{ExtractorConfig, ExtractorKind};
use crate::transform::{TextColumns, TransformOptions};

/// Environment variable overriding the read batch size
pub const BATCH_SIZE_ENV: &str = "NLI_KEYWORDS_BATCH_SIZE";

/// Environment variable overriding the worker thread count
pub const THREADS_ENV: &str = "NLI_KEYWORDS_THREADS";

/// Configuration for a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding the input splits
    pub input_dir: PathBuf,
    /// Directory the augmented dataset is saved to
    pub output_dir: PathBuf,
    /// Splits to process, in output order
    pub splits: Vec<String>,
    /// Columns removed before extraction
    pub dropped_columns: Vec<String>,
    /// Skip dropped columns that do not exist instead of failing
    pub ignore_missing_columns: bool,
    pub columns: TextColumns,
    pub extractor: ExtractorKind,
    pub extractor_config: ExtractorConfig,
    pub output_format: OutputFormat,
    /// Rows per record batch when reading
    pub batch_size: usize,
    /// Rows per extractor batch call
    pub chunk_size: usize,
    /// Keep at most this many rows per split
    pub limit: Option<usize>,
    pub show_progress: bool,
    /// Worker threads for the global rayon pool (`None` = one per CPU)
    pub threads: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("multi_nli"),
            output_dir: PathBuf::from("multi_nli_keywords"),
            splits: DEFAULT_SPLITS.iter().map(ToString::to_string).collect(),
            dropped_columns: DEFAULT_DROPPED_COLUMNS.iter().map(ToString::to_string).collect(),
            ignore_missing_columns: false,
            columns: TextColumns::default(),
            extractor: ExtractorKind::default(),
            extractor_config: ExtractorConfig::default(),
            output_format: OutputFormat::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            chunk_size: 1024,
            limit: None,
            show_progress: true,
            threads: None,
        }
    }
}

/// Parse a positive integer from the variable `name`, as seen by `lookup`
fn env_usize(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<usize> {
    let value = lookup(name)?;
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            log::warn!("Ignoring invalid {name}={value}");
            None
        }
    }
}

impl PipelineConfig {
    /// Apply `NLI_KEYWORDS_*` overrides read through `lookup`, normally
    /// `|name| std::env::var(name).ok()`
    ///
    /// Unparsable or zero values are ignored with a warning.
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(batch_size) = env_usize(&lookup, BATCH_SIZE_ENV) {
            self.batch_size = batch_size;
        }
        if let Some(threads) = env_usize(&lookup, THREADS_ENV) {
            self.threads = Some(threads);
        }
        self
    }

    /// Options for the per-split transform
    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            columns: self.columns.clone(),
            chunk_size: self.chunk_size,
            show_progress: self.show_progress,
        }
    }

    /// Number of worker threads that will be used
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_multinli_layout() {
        let config = PipelineConfig::default();
        assert_eq!(
            config.splits,
            vec!["train", "validation_matched", "validation_mismatched"]
        );
        assert_eq!(config.dropped_columns.len(), 6);
        assert!(config.dropped_columns.contains(&"genre".to_string()));
        assert_eq!(config.output_dir, PathBuf::from("multi_nli_keywords"));
        assert_eq!(config.extractor_config.top_n, 5);
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v.clone())
    }

    #[test]
    fn test_env_overrides() {
        let config = PipelineConfig::default()
            .with_overrides_from(vars(&[(BATCH_SIZE_ENV, "512"), (THREADS_ENV, "2")]));
        assert_eq!(config.batch_size, 512);
        assert_eq!(config.threads, Some(2));
    }

    #[test]
    fn test_invalid_env_overrides_are_ignored() {
        for bad in ["0", "-3", "many", ""] {
            let config = PipelineConfig::default()
                .with_overrides_from(vars(&[(BATCH_SIZE_ENV, bad), (THREADS_ENV, bad)]));
            assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE, "{bad}");
            assert_eq!(config.threads, None, "{bad}");
        }

        let untouched = PipelineConfig::default().with_overrides_from(vars(&[]));
        assert_eq!(untouched.batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn test_transform_options() {
        let config = PipelineConfig {
            chunk_size: 7,
            show_progress: false,
            ..PipelineConfig::default()
        };
        let options = config.transform_options();
        assert_eq!(options.chunk_size, 7);
        assert!(!options.show_progress);
        assert_eq!(options.columns.output, "keywords");
    }

    #[test]
    fn test_effective_threads() {
        let config = PipelineConfig {
            threads: Some(3),
            ..PipelineConfig::default()
        };
        assert_eq!(config.effective_threads(), 3);
        assert!(PipelineConfig::default().effective_threads() >= 1);
    }
}
