//! Token-to-category resolution with wildcard fallback.

use std::collections::BTreeSet;

use crate::dictionary::category::CategoryId;
use crate::dictionary::store::CategoryStore;

/// Marker that turns an entry into a prefix match.
pub const WILDCARD: char = '*';

/// Shortest prefix, in characters, tried during wildcard fallback.
const MIN_PREFIX_CHARS: usize = 2;

/// Whether a dictionary entry is a wildcard entry.
pub fn is_wildcard(entry: &str) -> bool {
    entry.ends_with(WILDCARD)
}

/// The literal prefix of an entry (the entry itself when it has no wildcard).
pub fn literal_prefix(entry: &str) -> &str {
    entry.strip_suffix(WILDCARD).unwrap_or(entry)
}

/// Resolves tokens to the categories that fire for them.
///
/// Resolution order:
///
/// 1. exact membership of the lowercased token;
/// 2. only if nothing matched exactly, `prefix*` entries for prefixes of the
///    token from its full length down to two characters, stopping at the first
///    (longest) prefix length that hits any category.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use liwc_tools::dictionary::{CategoryId, CategoryStore};
/// use liwc_tools::dictionary::matcher::MatchEngine;
///
/// let mut store = CategoryStore::new();
/// store.add_category(CategoryId::new(1), "Posemo", BTreeSet::new());
/// store.add_category(CategoryId::new(2), "Other", BTreeSet::new());
/// store.add_word(CategoryId::new(1), "happ*").unwrap();
/// store.add_word(CategoryId::new(2), "ha*").unwrap();
///
/// let engine = MatchEngine::new(&store);
/// assert_eq!(engine.categories_for_token("Happy"), [CategoryId::new(1)].into());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MatchEngine<'a> {
    store: &'a CategoryStore,
}

impl<'a> MatchEngine<'a> {
    /// Create an engine over a store snapshot.
    pub fn new(store: &'a CategoryStore) -> Self {
        MatchEngine { store }
    }

    /// Categories that fire for `token`; empty when nothing matches.
    pub fn categories_for_token(&self, token: &str) -> BTreeSet<CategoryId> {
        let token = token.to_lowercase();

        let exact = self.store.categories_containing(&token);
        if !exact.is_empty() {
            return exact;
        }

        // Byte offsets of every prefix end, longest first.
        let mut prefix_ends: Vec<usize> = token
            .char_indices()
            .map(|(offset, c)| offset + c.len_utf8())
            .collect();
        prefix_ends.reverse();

        let char_count = prefix_ends.len();
        for (index, end) in prefix_ends.into_iter().enumerate() {
            if char_count - index < MIN_PREFIX_CHARS {
                break;
            }
            let mut entry = String::with_capacity(end + 1);
            entry.push_str(&token[..end]);
            entry.push(WILDCARD);

            let hits = self.store.categories_containing(&entry);
            if !hits.is_empty() {
                return hits;
            }
        }

        BTreeSet::new()
    }

    /// Whether any category fires for `token`.
    pub fn matches(&self, token: &str) -> bool {
        !self.categories_for_token(token).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: u32) -> CategoryId {
        CategoryId::new(value)
    }

    fn store_with(entries: &[(&str, &[u32])]) -> CategoryStore {
        let mut store = CategoryStore::new();
        for value in 1..=4 {
            store.add_category(id(value), format!("C{value}"), BTreeSet::new());
        }
        for (word, cats) in entries {
            for cat in *cats {
                store.add_word(id(*cat), *word).unwrap();
            }
        }
        store
    }

    #[test]
    fn test_exact_match_case_folds() {
        let mut store = CategoryStore::new();
        store.add_category(id(1), "Pronoun", BTreeSet::new());
        store.add_category(id(2), "Funct", BTreeSet::new());
        store.add_word(id(1), "i").unwrap();
        store.add_word(id(2), "i").unwrap();
        store.add_word(id(1), "we").unwrap();

        let engine = MatchEngine::new(&store);
        assert_eq!(engine.categories_for_token("I"), [id(1), id(2)].into());
        assert_eq!(engine.categories_for_token("we"), [id(1)].into());
    }

    #[test]
    fn test_exact_wins_over_wildcards() {
        let store = store_with(&[("happy", &[3]), ("happ*", &[1]), ("happy*", &[4])]);
        let engine = MatchEngine::new(&store);

        assert_eq!(engine.categories_for_token("happy"), [id(3)].into());
        assert_eq!(engine.categories_for_token("happiness"), [id(1)].into());
    }

    #[test]
    fn test_longest_prefix_wins() {
        let store = store_with(&[("happ*", &[1]), ("ha*", &[2])]);
        let engine = MatchEngine::new(&store);

        assert_eq!(engine.categories_for_token("happy"), [id(1)].into());
        assert_eq!(engine.categories_for_token("hat"), [id(2)].into());
    }

    #[test]
    fn test_full_token_wildcard_and_minimum_prefix() {
        let store = store_with(&[("run*", &[1]), ("a*", &[2])]);
        let engine = MatchEngine::new(&store);

        assert_eq!(engine.categories_for_token("run"), [id(1)].into());
        // Single-character prefixes are never tried.
        assert!(engine.categories_for_token("apple").is_empty());
        assert!(!engine.matches("xyz"));
    }

    #[test]
    fn test_multibyte_prefixes() {
        let store = store_with(&[("géni*", &[1])]);
        let engine = MatchEngine::new(&store);

        assert_eq!(engine.categories_for_token("Génial"), [id(1)].into());
    }

    #[test]
    fn test_wildcard_helpers() {
        assert!(is_wildcard("happ*"));
        assert!(!is_wildcard("happy"));
        assert_eq!(literal_prefix("happ*"), "happ");
        assert_eq!(literal_prefix("happy"), "happy");
    }
}
