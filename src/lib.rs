//! # liwc-tools
//!
//! Maintenance and scoring tools for LIWC-style word-category dictionaries.
//!
//! ## Features
//!
//! - Reading and writing the two-section `.dic` text format
//! - Token matching with exact entries and longest-prefix wildcards
//! - Inferred category hierarchies and extra-hierarchical words
//! - Edit scripts, change files and wildcard deduplication
//! - Conversion between category schemas with a migration audit
//! - Category counts and frequent-word tables for running text

pub mod analysis;
pub mod cli;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod schema;
pub mod util;

pub mod prelude {
    pub use crate::analysis::{CategoryCounter, ContractionTokenizer, CountReport, Tokenizer};
    pub use crate::config::LiwcConfig;
    pub use crate::dictionary::{CategoryId, CategoryStore, Dictionary, Hierarchy, MatchEngine};
    pub use crate::error::{LiwcError, Result};
    pub use crate::schema::SchemaMatcher;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
