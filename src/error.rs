//! Error types for the liwc-tools library.
//!
//! All fallible operations return [`LiwcError`] through the crate-wide
//! [`Result`] alias. Errors raised while merging externally edited data
//! (edit scripts, deduplication files, change files) carry every problem found
//! in the input rather than only the first one, so the source file can be
//! fixed in a single pass.
//!
//! # Examples
//!
//! ```
//! use liwc_tools::dictionary::CategoryId;
//! use liwc_tools::error::{LiwcError, Result};
//!
//! fn lookup() -> Result<()> {
//!     Err(LiwcError::UnknownCategory(CategoryId::new(12)))
//! }
//!
//! match lookup() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => assert_eq!(e.to_string(), "Unknown category: 12"),
//! }
//! ```

use std::fmt::Display;
use std::io;

use thiserror::Error;

use crate::dictionary::CategoryId;
use crate::dictionary::dedup::MergeConflicts;
use crate::dictionary::edit::EditCommandError;
use crate::dictionary::update::ChangeFileIssue;

/// The main error type for dictionary operations.
#[derive(Error, Debug)]
pub enum LiwcError {
    /// I/O errors (reading dictionaries, writing review files, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A category id that was never declared in the dictionary
    #[error("Unknown category: {0}")]
    UnknownCategory(CategoryId),

    /// Text that does not parse as a category id
    #[error("Invalid category id: '{0}'")]
    InvalidCategoryId(String),

    /// One or more edit-script lines could not be applied
    #[error("Invalid edit script: {}", join_lines(.0))]
    InvalidEditCommand(Vec<EditCommandError>),

    /// Deduplication reintegration found conflicting entries
    #[error("Merge conflict: {0}")]
    MergeConflict(MergeConflicts),

    /// Change-file or matching-file header does not match a known shape
    #[error("Schema header error: {0}")]
    SchemaHeader(String),

    /// Change-file rows that cannot be applied
    #[error("Invalid change file: {}", join_lines(.0))]
    InvalidChangeFile(Vec<ChangeFileIssue>),

    /// Analysis errors (tokenizer configuration, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Delimited-file errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with LiwcError.
pub type Result<T> = std::result::Result<T, LiwcError>;

impl LiwcError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        LiwcError::Analysis(msg.into())
    }

    /// Create a new schema header error.
    pub fn schema_header<S: Into<String>>(msg: S) -> Self {
        LiwcError::SchemaHeader(msg.into())
    }

    /// Create a new invalid operation error.
    pub fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        LiwcError::InvalidOperation(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        LiwcError::Other(format!("Invalid configuration: {}", msg.into()))
    }
}

fn join_lines<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
