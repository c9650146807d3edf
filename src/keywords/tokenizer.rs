//! Word tokenization
//!
//! Splits text into lower-cased word tokens and tracks sentence boundaries so
//! the co-occurrence graph never links words across sentences.

use std::sync::LazyLock;

use regex::Regex;

/// A run of unicode word characters
static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?u)\b\w+\b").expect("word pattern is valid"));

/// A single word token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Lower-cased token text
    pub text: String,
    /// Index of the sentence this token belongs to
    pub sentence_idx: usize,
    /// Position of the token in the whole text
    pub position: usize,
    /// Whether the token may become (part of) a keyword
    pub is_candidate: bool,
}

/// Regex-based word tokenizer
#[derive(Debug, Clone)]
pub struct Tokenizer {
    min_token_length: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Tokenizer {
    /// Create a tokenizer dropping words shorter than `min_token_length` characters
    pub fn new(min_token_length: usize) -> Self {
        Self {
            min_token_length: min_token_length.max(1),
        }
    }

    /// Tokenize `text`
    ///
    /// Every returned token starts out as a candidate; callers decide which
    /// tokens to exclude (stop words, numbers).
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut sentence_idx = 0;
        let mut last_end = 0;

        for word in WORD_PATTERN.find_iter(text) {
            if !tokens.is_empty() && is_sentence_break(&text[last_end..word.start()]) {
                sentence_idx += 1;
            }
            last_end = word.end();

            if word.as_str().chars().count() < self.min_token_length {
                continue;
            }

            tokens.push(Token {
                text: word.as_str().to_lowercase(),
                sentence_idx,
                position: tokens.len(),
                is_candidate: true,
            });
        }

        tokens
    }
}

/// A gap between two words ends a sentence when it holds a terminator
/// followed by whitespace.
fn is_sentence_break(gap: &str) -> bool {
    gap.find(['.', '!', '?'])
        .is_some_and(|i| gap[i..].chars().any(char::is_whitespace))
}
