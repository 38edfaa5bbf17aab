//! Category identifiers and category records.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LiwcError, Result};

/// Canonical identifier of a dictionary category.
///
/// Dictionary files, change files and matching files all spell category ids
/// as decimal text. Parsing goes through the integer value, so `"01"`, `" 1"`
/// and `1` all name the same category and render back as `"1"`.
///
/// # Examples
///
/// ```
/// use liwc_tools::dictionary::CategoryId;
///
/// let a: CategoryId = "01".parse().unwrap();
/// let b = CategoryId::new(1);
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "1");
/// ```
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CategoryId(u32);

impl CategoryId {
    /// Create a category id from its numeric value.
    pub fn new(value: u32) -> Self {
        CategoryId(value)
    }

    /// Parse a category id from text, ignoring surrounding whitespace.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(LiwcError::InvalidCategoryId(text.to_string()));
        }
        trimmed
            .parse::<u32>()
            .map(CategoryId)
            .map_err(|_| LiwcError::InvalidCategoryId(text.to_string()))
    }

    /// Parse a whitespace-separated list of category ids.
    pub fn parse_list(text: &str) -> Result<Vec<Self>> {
        text.split_whitespace().map(CategoryId::parse).collect()
    }

    /// The numeric value of this id.
    pub fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for CategoryId {
    fn from(value: u32) -> Self {
        CategoryId(value)
    }
}

impl FromStr for CategoryId {
    type Err = LiwcError;

    fn from_str(s: &str) -> Result<Self> {
        CategoryId::parse(s)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A labeled bucket of dictionary entries scored together.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Human-readable label, e.g. `Pronoun`.
    pub label: String,
    /// Entries (plain words and `prefix*` wildcards) in this category.
    pub words: BTreeSet<String>,
}

impl Category {
    /// Create a category with the given label and initial words.
    pub fn new<S: Into<String>>(label: S, words: BTreeSet<String>) -> Self {
        Category {
            label: label.into(),
            words,
        }
    }

    /// Number of entries in this category.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether this category has no entries.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonicalizes() {
        assert_eq!(CategoryId::parse("01").unwrap(), CategoryId::new(1));
        assert_eq!(CategoryId::parse(" 125 ").unwrap(), CategoryId::new(125));
        assert_eq!(CategoryId::parse("007").unwrap().to_string(), "7");
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!(CategoryId::parse("").is_err());
        assert!(CategoryId::parse("-1").is_err());
        assert!(CategoryId::parse("1a").is_err());
        assert!(CategoryId::parse("Pronoun").is_err());
    }

    #[test]
    fn test_parse_list() {
        let ids = CategoryId::parse_list("3 01  12").unwrap();
        assert_eq!(
            ids,
            vec![CategoryId::new(3), CategoryId::new(1), CategoryId::new(12)]
        );
        assert!(CategoryId::parse_list("3 x").is_err());
    }

    #[test]
    fn test_ordering_is_numeric() {
        let mut ids = vec![CategoryId::new(10), CategoryId::new(2), CategoryId::new(1)];
        ids.sort();
        assert_eq!(ids[0].value(), 1);
        assert_eq!(ids[2].value(), 10);
    }
}
