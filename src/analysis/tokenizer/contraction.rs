//! Regex tokenizer that keeps English contractions in one token.

use std::sync::Arc;

use regex::Regex;

use super::Tokenizer;
use crate::analysis::token::{Token, TokenStream};
use crate::config::TokenizerConfig;
use crate::error::{LiwcError, Result};

/// Default token grammar.
///
/// Contractions ending in `'ll`, `'ve`, `'re`, `'d` or `'t` and a fixed list
/// of `'s`/`'m` forms stay whole; anything else is a word character followed
/// by word characters or hyphens. Alternatives are tried left to right, so the
/// contractions come first.
pub const DEFAULT_PATTERN: &str = r"(?i)\w+'(?:ll|ve|re|d|t)\b|\b(?:it|where|what|she|he|that|let)'s\b|\bi'm\b|\w[\w-]*";

/// A regex tokenizer for dictionary scoring.
#[derive(Clone, Debug)]
pub struct ContractionTokenizer {
    pattern: Arc<Regex>,
}

impl ContractionTokenizer {
    /// Create a tokenizer with the default contraction-aware pattern.
    pub fn new() -> Result<Self> {
        Self::with_pattern(DEFAULT_PATTERN)
    }

    /// Create a tokenizer with a custom pattern.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| LiwcError::analysis(format!("Invalid regex pattern: {e}")))?;

        Ok(ContractionTokenizer {
            pattern: Arc::new(regex),
        })
    }

    /// Create a tokenizer from configuration.
    pub fn from_config(config: &TokenizerConfig) -> Result<Self> {
        match &config.pattern {
            Some(pattern) => Self::with_pattern(pattern),
            None => Self::new(),
        }
    }

    /// Get the regex pattern used by this tokenizer.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

/// Matches pulled from the pattern one at a time.
///
/// Owns the text and a handle on the regex, so the stream outlives the
/// borrowed input. Empty matches are skipped.
struct TokenMatches {
    pattern: Arc<Regex>,
    text: String,
    offset: usize,
    position: usize,
}

impl Iterator for TokenMatches {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        while self.offset <= self.text.len() {
            let mat = self.pattern.find_at(&self.text, self.offset)?;
            if mat.is_empty() {
                let step = self.text[mat.end()..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                self.offset = mat.end() + step;
                continue;
            }
            self.offset = mat.end();
            let token = Token::with_offsets(mat.as_str(), self.position, mat.start(), mat.end());
            self.position += 1;
            return Some(token);
        }
        None
    }
}

impl Tokenizer for ContractionTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        Ok(Box::new(TokenMatches {
            pattern: Arc::clone(&self.pattern),
            text: text.to_string(),
            offset: 0,
            position: 0,
        }))
    }

    fn name(&self) -> &'static str {
        "contraction"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokenizer: &ContractionTokenizer, input: &str) -> Vec<String> {
        tokenizer.tokenize(input).unwrap().map(|t| t.text).collect()
    }

    #[test]
    fn test_offsets() {
        let tokenizer = ContractionTokenizer::new().unwrap();
        let tokens: Vec<Token> = tokenizer.tokenize("hello world").unwrap().collect();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "hello");
        assert_eq!(tokens[0].position, 0);
        assert_eq!(tokens[0].start_offset, 0);
        assert_eq!(tokens[0].end_offset, 5);

        assert_eq!(tokens[1].text, "world");
        assert_eq!(tokens[1].position, 1);
        assert_eq!(tokens[1].start_offset, 6);
        assert_eq!(tokens[1].end_offset, 11);
    }

    #[test]
    fn test_contractions() {
        let tokenizer = ContractionTokenizer::new().unwrap();

        assert_eq!(
            texts(&tokenizer, "We'll see, I'm sure it's fine; don't worry."),
            vec!["We'll", "see", "I'm", "sure", "it's", "fine", "don't", "worry"]
        );
        assert_eq!(
            texts(&tokenizer, "They'd say What's up, you've won"),
            vec!["They'd", "say", "What's", "up", "you've", "won"]
        );
    }

    #[test]
    fn test_possessives_are_split() {
        let tokenizer = ContractionTokenizer::new().unwrap();

        assert_eq!(texts(&tokenizer, "John's well-known cat"), vec!["John", "s", "well-known", "cat"]);
    }

    #[test]
    fn test_custom_pattern() {
        let config = TokenizerConfig {
            pattern: Some(r"\S+".to_string()),
        };
        let tokenizer = ContractionTokenizer::from_config(&config).unwrap();
        assert_eq!(texts(&tokenizer, "a,b c"), vec!["a,b", "c"]);

        assert!(ContractionTokenizer::with_pattern("(unclosed").is_err());
        assert_eq!(tokenizer.name(), "contraction");
    }

    #[test]
    fn test_stream_is_pulled_lazily() {
        let tokenizer = ContractionTokenizer::new().unwrap();
        let text = "one two ".repeat(10_000);
        let mut stream = tokenizer.tokenize(&text).unwrap();

        let third = stream.nth(2).unwrap();
        assert_eq!(third.text, "one");
        assert_eq!(third.position, 2);
        assert_eq!(third.start_offset, 8);
        assert_eq!(stream.count(), 20_000 - 3);
    }

    #[test]
    fn test_empty_matches_are_skipped() {
        let tokenizer = ContractionTokenizer::with_pattern(r"\w*").unwrap();
        let tokens: Vec<Token> = tokenizer.tokenize("ab, cé d").unwrap().collect();

        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["ab", "cé", "d"]);
        assert_eq!(tokens.iter().map(|t| t.position).collect::<Vec<_>>(), vec![0, 1, 2]);
    }
}
