//! Inferred category hierarchies.
//!
//! Hierarchies are never stored; they are derived from the current word sets
//! each time they are requested.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::dictionary::category::CategoryId;
use crate::dictionary::store::CategoryStore;

/// An inferred `(child, parent)` relation: the child's word set is a
/// non-empty proper subset of the parent's.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hierarchy {
    /// The included category.
    pub child: CategoryId,
    /// The including category.
    pub parent: CategoryId,
}

impl Hierarchy {
    /// Create a relation.
    pub fn new(child: CategoryId, parent: CategoryId) -> Self {
        Hierarchy { child, parent }
    }
}

/// Compute every hierarchy relation present in the store.
///
/// Checks each ordered pair of distinct categories, so the cost is quadratic
/// in the number of categories.
///
/// # Examples
///
/// ```
/// use liwc_tools::dictionary::{CategoryId, CategoryStore};
/// use liwc_tools::dictionary::hierarchy::{compute_hierarchies, Hierarchy};
///
/// let mut store = CategoryStore::new();
/// store.add_category(CategoryId::new(1), "A", ["x", "y"].iter().map(|s| s.to_string()).collect());
/// store.add_category(CategoryId::new(2), "B", ["x", "y", "z"].iter().map(|s| s.to_string()).collect());
///
/// let hierarchies = compute_hierarchies(&store);
/// assert!(hierarchies.contains(&Hierarchy::new(CategoryId::new(1), CategoryId::new(2))));
/// assert!(!hierarchies.contains(&Hierarchy::new(CategoryId::new(2), CategoryId::new(1))));
/// ```
pub fn compute_hierarchies(store: &CategoryStore) -> BTreeSet<Hierarchy> {
    let mut hierarchies = BTreeSet::new();
    for (child_id, child) in store.iter() {
        if child.is_empty() {
            continue;
        }
        for (parent_id, parent) in store.iter() {
            if child_id == parent_id || child.len() >= parent.len() {
                continue;
            }
            if child.words.is_subset(&parent.words) {
                hierarchies.insert(Hierarchy::new(child_id, parent_id));
            }
        }
    }
    hierarchies
}

/// For every parent in `hierarchies`, the words not explained by any of its children.
///
/// Ids in `hierarchies` that the store does not know are treated as empty
/// categories.
pub fn extra_hierarchical_words(
    store: &CategoryStore,
    hierarchies: &BTreeSet<Hierarchy>,
) -> BTreeMap<CategoryId, BTreeSet<String>> {
    let mut explained: BTreeMap<CategoryId, BTreeSet<&str>> = BTreeMap::new();
    for hierarchy in hierarchies {
        let entry = explained.entry(hierarchy.parent).or_default();
        if let Ok(words) = store.words(hierarchy.child) {
            entry.extend(words.iter().map(String::as_str));
        }
    }

    explained
        .into_iter()
        .map(|(parent, child_words)| {
            let remainder = store
                .words(parent)
                .map(|words| {
                    words
                        .iter()
                        .filter(|w| !child_words.contains(w.as_str()))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            (parent, remainder)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|w| w.to_string()).collect()
    }

    fn id(value: u32) -> CategoryId {
        CategoryId::new(value)
    }

    #[test]
    fn test_subset_is_inferred_one_way() {
        let mut store = CategoryStore::new();
        store.add_category(id(1), "A", words(&["x", "y"]));
        store.add_category(id(2), "B", words(&["x", "y", "z"]));

        let hierarchies = compute_hierarchies(&store);
        assert_eq!(hierarchies.len(), 1);
        assert!(hierarchies.contains(&Hierarchy::new(id(1), id(2))));
    }

    #[test]
    fn test_equal_and_empty_sets_are_not_hierarchies() {
        let mut store = CategoryStore::new();
        store.add_category(id(1), "A", words(&["x", "y"]));
        store.add_category(id(2), "B", words(&["x", "y"]));
        store.add_category(id(3), "Empty", BTreeSet::new());

        assert!(compute_hierarchies(&store).is_empty());
    }

    #[test]
    fn test_chains_and_multiple_parents() {
        let mut store = CategoryStore::new();
        store.add_category(id(1), "Posemo", words(&["happy"]));
        store.add_category(id(2), "Affect", words(&["happy", "sad"]));
        store.add_category(id(3), "Psych", words(&["happy", "sad", "think"]));

        let hierarchies = compute_hierarchies(&store);
        let expected: BTreeSet<_> = [
            Hierarchy::new(id(1), id(2)),
            Hierarchy::new(id(1), id(3)),
            Hierarchy::new(id(2), id(3)),
        ]
        .into();
        assert_eq!(hierarchies, expected);
    }

    #[test]
    fn test_extra_hierarchical_words() {
        let mut store = CategoryStore::new();
        store.add_category(id(1), "Posemo", words(&["happy"]));
        store.add_category(id(2), "Negemo", words(&["sad"]));
        store.add_category(id(3), "Affect", words(&["happy", "sad", "mood"]));

        let hierarchies = compute_hierarchies(&store);
        let ehw = extra_hierarchical_words(&store, &hierarchies);

        assert_eq!(ehw.len(), 1);
        assert_eq!(ehw[&id(3)], words(&["mood"]));
    }
}
