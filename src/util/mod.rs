//! Utility modules for liwc-tools.

pub mod delimited;

// Re-export commonly used types
pub use delimited::{Row, read_rows};
