//! Word-category dictionaries.
//!
//! A dictionary declares numbered, labelled categories and lists entries
//! (plain words, or prefixes ending in `*`) with the categories they belong
//! to. This module covers reading and writing the text format, token
//! matching, hierarchy inference and the maintenance operations applied to
//! dictionaries between releases.

pub mod category;
pub mod compare;
pub mod dedup;
#[allow(clippy::module_inception)]
pub mod dictionary;
pub mod edit;
pub mod hierarchy;
pub mod ingest;
pub mod matcher;
pub mod store;
pub mod update;

pub use category::{Category, CategoryId};
pub use compare::DictionaryComparison;
pub use dedup::{DedupExtraction, ReintegrationSummary};
pub use dictionary::Dictionary;
pub use edit::EditSummary;
pub use hierarchy::Hierarchy;
pub use matcher::MatchEngine;
pub use store::CategoryStore;
pub use update::{ChangeFile, UpdateReport};
