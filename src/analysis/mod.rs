//! Text analysis for dictionary scoring.
//!
//! This module provides tokenization of running text and the counting of
//! dictionary categories over the resulting tokens.

pub mod counter;
pub mod token;
pub mod tokenizer;

// Re-export commonly used types
pub use counter::{
    CategoryCounter, CategoryFrequencies, CountReport, FrequencyTable, REST_ROW, WordFrequency,
};
pub use token::{Token, TokenStream};
pub use tokenizer::{ContractionTokenizer, Tokenizer};
