//! TextRank keyword extraction
//!
//! Words are ranked with PageRank over a co-occurrence graph; keyphrases are
//! n-grams of adjacent candidate words scored by the sum of their word scores.

use rustc_hash::FxHashMap;

use super::graph::CooccurrenceGraph;
use super::pagerank::PageRank;
use super::stopwords::StopwordFilter;
use super::tokenizer::{Token, Tokenizer};
use super::{ExtractorConfig, Keyword, KeywordExtractor};
use crate::error::Result;

/// Graph-based keyword extractor that needs no pretrained weights
#[derive(Debug, Clone)]
pub struct TextRankExtractor {
    config: ExtractorConfig,
    tokenizer: Tokenizer,
    stopwords: StopwordFilter,
    pagerank: PageRank,
}

/// A candidate keyphrase collected from the token stream
#[derive(Debug)]
struct Candidate {
    text: String,
    words: Vec<String>,
    first_position: usize,
}

impl TextRankExtractor {
    /// Create an extractor using the stop-word list of `config.language`
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        let stopwords = StopwordFilter::new(&config.language);
        Self::with_stopwords(config, stopwords)
    }

    /// Create an extractor with a custom stop-word filter
    pub fn with_stopwords(config: ExtractorConfig, stopwords: StopwordFilter) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tokenizer: Tokenizer::new(config.min_token_length),
            pagerank: PageRank::new(config.damping, config.max_iterations, config.threshold),
            stopwords,
            config,
        })
    }

    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = self.tokenizer.tokenize(text);
        for token in &mut tokens {
            token.is_candidate = !self.stopwords.is_stopword(&token.text)
                && !token.text.chars().all(char::is_numeric);
        }
        tokens
    }

    /// Collect every n-gram inside runs of adjacent candidate tokens
    fn candidates(&self, tokens: &[Token]) -> Vec<Candidate> {
        let (min_n, max_n) = self.config.ngram_range;
        let mut seen: FxHashMap<String, usize> = FxHashMap::default();
        let mut candidates = Vec::new();

        for run in candidate_runs(tokens) {
            for start in 0..run.len() {
                for n in min_n..=max_n {
                    let Some(window) = run.get(start..start + n) else {
                        break;
                    };
                    let words: Vec<String> = window.iter().map(|t| t.text.clone()).collect();
                    let text = words.join(" ");
                    if seen.contains_key(&text) {
                        continue;
                    }
                    seen.insert(text.clone(), candidates.len());
                    candidates.push(Candidate {
                        text,
                        words,
                        first_position: window[0].position,
                    });
                }
            }
        }

        candidates
    }
}

/// Split tokens into maximal runs of adjacent candidates within one sentence
fn candidate_runs(tokens: &[Token]) -> Vec<&[Token]> {
    let mut runs = Vec::new();
    let mut start = None;

    for (i, token) in tokens.iter().enumerate() {
        let continues = start.is_some()
            && token.is_candidate
            && tokens[i - 1].sentence_idx == token.sentence_idx;

        if continues {
            continue;
        }
        if let Some(s) = start.take() {
            runs.push(&tokens[s..i]);
        }
        if token.is_candidate {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        runs.push(&tokens[s..]);
    }

    runs
}

impl KeywordExtractor for TextRankExtractor {
    fn name(&self) -> &str {
        "textrank"
    }

    fn extract_keywords(&self, text: &str) -> Result<Vec<Keyword>> {
        let tokens = self.tokenize(text);
        if !tokens.iter().any(|t| t.is_candidate) {
            return Ok(Vec::new());
        }

        let graph = CooccurrenceGraph::from_tokens(&tokens, self.config.window_size);
        let ranks = self.pagerank.run(&graph);
        log::trace!(
            "TextRank graph: {} nodes, {} edges, {} iterations (delta {:.2e}{})",
            graph.node_count(),
            graph.edge_count(),
            ranks.iterations,
            ranks.delta,
            if ranks.converged { "" } else { ", not converged" }
        );

        let mut scored: Vec<(Candidate, f64)> = self
            .candidates(&tokens)
            .into_iter()
            .map(|candidate| {
                let score = candidate
                    .words
                    .iter()
                    .filter_map(|w| graph.node_id(w))
                    .map(|id| ranks.score(id))
                    .sum();
                (candidate, score)
            })
            .collect();

        scored.sort_by(|(a, a_score), (b, b_score)| {
            b_score
                .total_cmp(a_score)
                .then(a.first_position.cmp(&b.first_position))
        });
        scored.truncate(self.config.top_n);

        Ok(scored
            .into_iter()
            .map(|(candidate, score)| Keyword {
                text: candidate.text,
                score,
            })
            .collect())
    }
}
