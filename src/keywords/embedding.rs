//! Sentence-embedding keyword model
//!
//! Candidate n-grams are embedded together with the document and ranked by
//! cosine similarity, using the `all-MiniLM-L6-v2` sentence encoder.
//! Weights are downloaded on first use and need a libtorch installation.

use std::sync::Mutex;

use rust_bert::pipelines::keywords_extraction::{
    KeywordExtractionConfig, KeywordExtractionModel, KeywordScorerType,
};
use rust_bert::pipelines::sentence_embeddings::{
    SentenceEmbeddingsConfig, SentenceEmbeddingsModelType,
};

use super::{ExtractorConfig, Keyword, KeywordExtractor};
use crate::error::{KeywordError, Result};

/// Keyword extractor backed by a pretrained sentence-embedding model
pub struct EmbeddingExtractor {
    // The torch-backed model is not `Sync`
    model: Mutex<KeywordExtractionModel<'static>>,
}

impl EmbeddingExtractor {
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        config.validate()?;

        let model_config = KeywordExtractionConfig {
            sentence_embeddings_config: SentenceEmbeddingsConfig::from(
                SentenceEmbeddingsModelType::AllMiniLmL6V2,
            ),
            scorer_type: KeywordScorerType::CosineSimilarity,
            ngram_range: config.ngram_range,
            num_keywords: config.top_n,
            ..Default::default()
        };

        let model = KeywordExtractionModel::new(model_config)
            .map_err(|e| KeywordError::Extraction(format!("failed to load model: {e}")))?;

        Ok(Self {
            model: Mutex::new(model),
        })
    }

    fn predict(&self, texts: &[&str]) -> Result<Vec<Vec<Keyword>>> {
        let model = self
            .model
            .lock()
            .map_err(|_| KeywordError::Extraction("model lock poisoned".to_string()))?;

        let predictions = model
            .predict(texts)
            .map_err(|e| KeywordError::Extraction(e.to_string()))?;

        Ok(predictions
            .into_iter()
            .map(|keywords| {
                keywords
                    .into_iter()
                    .map(|k| Keyword {
                        text: k.text.to_lowercase(),
                        score: f64::from(k.score),
                    })
                    .collect()
            })
            .collect())
    }
}

impl KeywordExtractor for EmbeddingExtractor {
    fn name(&self) -> &str {
        "all-MiniLM-L6-v2"
    }

    fn extract_keywords(&self, text: &str) -> Result<Vec<Keyword>> {
        Ok(self.predict(&[text])?.pop().unwrap_or_default())
    }

    /// One forward pass for the whole batch
    fn extract_keywords_batch(&self, texts: &[&str]) -> Result<Vec<Vec<Keyword>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.predict(texts)
    }
}
