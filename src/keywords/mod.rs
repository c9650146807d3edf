//! Keyword extraction
//!
//! This module defines the [`KeywordExtractor`] seam used by the dataset
//! transform, the graph-based default extractor and, behind the `embeddings`
//! feature, a pretrained sentence-embedding keyword model.

#[cfg(feature = "embeddings")]
pub mod embedding;
pub mod graph;
pub mod pagerank;
pub mod stopwords;
pub mod textrank;
pub mod tokenizer;

use std::collections::BTreeSet;
use std::fmt;

use rayon::prelude::*;

use crate::error::{KeywordError, Result};

pub use stopwords::StopwordFilter;
pub use textrank::TextRankExtractor;

/// A keyword with its relevance score
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub text: String,
    pub score: f64,
}

/// Deduplicated, sorted set of keyword texts
pub type KeywordSet = BTreeSet<String>;

/// Something that can rank the keywords of a text
pub trait KeywordExtractor: Send + Sync {
    /// Short name used in logs and dataset metadata
    fn name(&self) -> &str;

    /// Extract keywords from `text`, best first
    fn extract_keywords(&self, text: &str) -> Result<Vec<Keyword>>;

    /// Extract keywords from many texts, keeping input order
    fn extract_keywords_batch(&self, texts: &[&str]) -> Result<Vec<Vec<Keyword>>> {
        texts
            .par_iter()
            .map(|text| self.extract_keywords(text))
            .collect()
    }
}

/// Which extractor implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExtractorKind {
    /// Co-occurrence graph ranking, no model download
    #[default]
    #[value(name = "textrank")]
    TextRank,
    /// Pretrained sentence-embedding model (`embeddings` feature)
    Embedding,
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TextRank => write!(f, "textrank"),
            Self::Embedding => write!(f, "embedding"),
        }
    }
}

/// Keyword extraction settings
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Number of keywords returned per text
    pub top_n: usize,
    /// Inclusive range of words per keyphrase
    pub ngram_range: (usize, usize),
    /// Co-occurrence window, in candidate words
    pub window_size: usize,
    /// PageRank damping factor
    pub damping: f64,
    pub max_iterations: usize,
    /// PageRank convergence threshold
    pub threshold: f64,
    /// Stop-word language
    pub language: String,
    /// Words shorter than this are ignored
    pub min_token_length: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            ngram_range: (1, 1),
            window_size: 4,
            damping: 0.85,
            max_iterations: 100,
            threshold: 1e-6,
            language: "en".to_string(),
            min_token_length: 2,
        }
    }
}

impl ExtractorConfig {
    /// Check that the settings describe a usable extractor
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(KeywordError::Config("top_n must be positive".to_string()));
        }
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(KeywordError::Config(format!(
                "invalid n-gram range ({min_n}, {max_n})"
            )));
        }
        if self.window_size < 2 {
            return Err(KeywordError::Config(format!(
                "window size must be at least 2, got {}",
                self.window_size
            )));
        }
        if !(0.0..1.0).contains(&self.damping) {
            return Err(KeywordError::Config(format!(
                "damping must be in [0, 1), got {}",
                self.damping
            )));
        }
        Ok(())
    }
}

/// The set of keyword texts `extractor` reports for `text`
///
/// Blank text yields an empty set without consulting the extractor.
pub fn word_extraction(extractor: &dyn KeywordExtractor, text: &str) -> Result<KeywordSet> {
    if text.trim().is_empty() {
        return Ok(KeywordSet::new());
    }

    Ok(extractor
        .extract_keywords(text)?
        .into_iter()
        .map(|k| k.text)
        .collect())
}

/// Build the extractor selected by `kind`
pub fn build_extractor(
    kind: ExtractorKind,
    config: ExtractorConfig,
) -> Result<Box<dyn KeywordExtractor>> {
    log::info!(
        "Loading {kind} keyword extractor (top_n={}, ngram_range={:?})",
        config.top_n,
        config.ngram_range
    );

    match kind {
        ExtractorKind::TextRank => Ok(Box::new(TextRankExtractor::new(config)?)),
        #[cfg(feature = "embeddings")]
        ExtractorKind::Embedding => Ok(Box::new(embedding::EmbeddingExtractor::new(&config)?)),
        #[cfg(not(feature = "embeddings"))]
        ExtractorKind::Embedding => Err(KeywordError::Config(
            "the embedding extractor requires the `embeddings` feature".to_string(),
        )),
    }
}
