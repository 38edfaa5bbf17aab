//! Schema migration for dictionaries.
//!
//! This module maps the categories of one dictionary version onto the
//! categories of the next, converts dictionaries across that mapping and
//! audits how words moved between versions.

pub mod audit;
pub mod matcher;

// Re-export commonly used types
pub use audit::{CategoryMigration, MigrationAudit, MigrationCell};
pub use matcher::SchemaMatcher;
