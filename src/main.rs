use anyhow::Context;
use clap::Parser;
use log::{debug, info};
use nli_keywords::dataset::{DEFAULT_DROPPED_COLUMNS, DEFAULT_SPLITS, load_split};
use nli_keywords::utils::logging::console::{print_sample_rows, print_split_summary};
use nli_keywords::{
    ExtractorConfig, ExtractorKind, OutputFormat, PipelineConfig, TextColumns, run_pipeline,
};
use std::path::PathBuf;

#[cfg(feature = "snmalloc")]
#[global_allocator]
static ALLOC: snmalloc_rs::SnMalloc = snmalloc_rs::SnMalloc;

/// Extract keyword sets from the premise and hypothesis of every NLI pair
#[derive(Parser)]
#[command(name = "nli-keywords", version)]
struct Cli {
    /// Directory holding the input splits (Parquet, JSON Lines or Arrow files)
    input: PathBuf,

    /// Directory the augmented dataset is saved to
    #[arg(short, long, default_value = "multi_nli_keywords")]
    output: PathBuf,

    /// Split to process; repeat for several (default: the MultiNLI splits)
    #[arg(long = "split")]
    splits: Vec<String>,

    /// Column to drop; repeat for several (default: the MultiNLI parse columns, promptID and genre)
    #[arg(long = "drop")]
    drop: Vec<String>,

    /// Keep every input column
    #[arg(long, conflicts_with = "drop")]
    keep_all_columns: bool,

    /// Skip dropped columns that do not exist instead of failing
    #[arg(long)]
    ignore_missing_columns: bool,

    #[arg(long, default_value = "premise")]
    premise_column: String,

    #[arg(long, default_value = "hypothesis")]
    hypothesis_column: String,

    /// Name of the keyword list column added to every split
    #[arg(long, default_value = "keywords")]
    output_column: String,

    #[arg(long, value_enum, default_value_t = ExtractorKind::TextRank)]
    extractor: ExtractorKind,

    /// Keywords per text
    #[arg(long, default_value_t = 5)]
    top_n: usize,

    /// Shortest keyphrase, in words
    #[arg(long, default_value_t = 1)]
    ngram_min: usize,

    /// Longest keyphrase, in words
    #[arg(long, default_value_t = 1)]
    ngram_max: usize,

    /// Co-occurrence window of the TextRank extractor
    #[arg(long, default_value_t = 4)]
    window: usize,

    /// Stop-word language
    #[arg(long, default_value = "en")]
    language: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Arrow)]
    format: OutputFormat,

    /// Rows per record batch when reading
    #[arg(long)]
    batch_size: Option<usize>,

    /// Process at most this many rows per split
    #[arg(long)]
    limit: Option<usize>,

    /// Worker threads (default: one per CPU)
    #[arg(long)]
    threads: Option<usize>,

    /// Print this many rows of every saved split
    #[arg(long, default_value_t = 0)]
    preview: usize,

    #[arg(long)]
    no_progress: bool,

    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Build the run configuration, reading environment overrides via `env`
    fn into_config(self, env: impl Fn(&str) -> Option<String>) -> PipelineConfig {
        let defaults = PipelineConfig::default();

        let splits = if self.splits.is_empty() {
            DEFAULT_SPLITS.iter().map(ToString::to_string).collect()
        } else {
            self.splits
        };
        let dropped_columns = if self.keep_all_columns {
            Vec::new()
        } else if self.drop.is_empty() {
            DEFAULT_DROPPED_COLUMNS.iter().map(ToString::to_string).collect()
        } else {
            self.drop
        };

        let config = PipelineConfig {
            input_dir: self.input,
            output_dir: self.output,
            splits,
            dropped_columns,
            ignore_missing_columns: self.ignore_missing_columns,
            columns: TextColumns {
                premise: self.premise_column,
                hypothesis: self.hypothesis_column,
                output: self.output_column,
            },
            extractor: self.extractor,
            extractor_config: ExtractorConfig {
                top_n: self.top_n,
                ngram_range: (self.ngram_min, self.ngram_max),
                window_size: self.window,
                language: self.language,
                ..ExtractorConfig::default()
            },
            output_format: self.format,
            limit: self.limit,
            show_progress: !self.no_progress,
            ..defaults
        }
        .with_overrides_from(env);

        // Explicit flags win over the environment
        PipelineConfig {
            batch_size: self.batch_size.unwrap_or(config.batch_size),
            threads: self.threads.or(config.threads),
            ..config
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let preview = cli.preview;
    let config = cli.into_config(|name| std::env::var(name).ok());
    debug!("{config:?}");

    if let Some(threads) = config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure worker threads")?;
    }
    info!("Using {} worker threads", config.effective_threads());

    let report = run_pipeline(&config).with_context(|| {
        format!(
            "Failed to add keywords to the dataset in {}",
            config.input_dir.display()
        )
    })?;

    for split in &report.splits {
        info!(
            "{}: {} rows, {} keywords ({:.2} per row)",
            split.name,
            split.rows,
            split.keywords,
            split.keywords_per_row()
        );
    }

    if preview > 0 {
        for name in &config.splits {
            let split = load_split(&config.output_dir, name, config.batch_size)
                .with_context(|| format!("Failed to reload saved split '{name}'"))?;
            print_split_summary(&split);
            print_sample_rows(&split, preview)?;
        }
    }

    Ok(())
}
