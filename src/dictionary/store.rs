//! Category storage: the mapping from category id to label and word set.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::dictionary::category::{Category, CategoryId};
use crate::error::{LiwcError, Result};

/// Passive holder of all categories of a dictionary, ordered by id.
///
/// Every word-level operation addresses a category that must already have
/// been declared with [`CategoryStore::add_category`]; referencing any other
/// id fails with [`LiwcError::UnknownCategory`].
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use liwc_tools::dictionary::{CategoryId, CategoryStore};
///
/// let mut store = CategoryStore::new();
/// let pronoun = CategoryId::new(1);
/// store.add_category(pronoun, "Pronoun", BTreeSet::new());
/// store.add_word(pronoun, "we").unwrap();
///
/// assert!(store.words(pronoun).unwrap().contains("we"));
/// assert!(store.add_word(CategoryId::new(2), "we").is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStore {
    categories: BTreeMap<CategoryId, Category>,
}

impl CategoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        CategoryStore {
            categories: BTreeMap::new(),
        }
    }

    /// Declare a category. Re-declaring an id replaces the previous category.
    pub fn add_category<S: Into<String>>(
        &mut self,
        id: CategoryId,
        label: S,
        words: BTreeSet<String>,
    ) {
        self.categories.insert(id, Category::new(label, words));
    }

    /// Remove a category entirely.
    pub fn remove_category(&mut self, id: CategoryId) -> Result<Category> {
        self.categories
            .remove(&id)
            .ok_or(LiwcError::UnknownCategory(id))
    }

    /// Whether the category has been declared.
    pub fn contains_category(&self, id: CategoryId) -> bool {
        self.categories.contains_key(&id)
    }

    /// Add a word to a category.
    pub fn add_word<S: Into<String>>(&mut self, id: CategoryId, word: S) -> Result<()> {
        self.category_mut(id)?.words.insert(word.into());
        Ok(())
    }

    /// Drop a word from a category, returning whether it was there.
    pub fn drop_word(&mut self, id: CategoryId, word: &str) -> Result<bool> {
        Ok(self.category_mut(id)?.words.remove(word))
    }

    /// Drop a word from every category containing it, returning those categories.
    pub fn drop_word_all_categories(&mut self, word: &str) -> BTreeSet<CategoryId> {
        let mut affected = BTreeSet::new();
        for (id, category) in self.categories.iter_mut() {
            if category.words.remove(word) {
                affected.insert(*id);
            }
        }
        affected
    }

    /// Add a set of words to a category.
    pub fn union_words(&mut self, id: CategoryId, words: &BTreeSet<String>) -> Result<()> {
        let category = self.category_mut(id)?;
        category.words.extend(words.iter().cloned());
        Ok(())
    }

    /// Remove a set of words from a category.
    pub fn subtract_words(&mut self, id: CategoryId, words: &BTreeSet<String>) -> Result<()> {
        let category = self.category_mut(id)?;
        category.words.retain(|w| !words.contains(w));
        Ok(())
    }

    /// Remove every word from a category, keeping the category itself.
    pub fn clear_words(&mut self, id: CategoryId) -> Result<()> {
        self.category_mut(id)?.words.clear();
        Ok(())
    }

    /// The words of a category.
    pub fn words(&self, id: CategoryId) -> Result<&BTreeSet<String>> {
        Ok(&self.category(id)?.words)
    }

    /// The label of a category.
    pub fn description(&self, id: CategoryId) -> Result<&str> {
        Ok(&self.category(id)?.label)
    }

    /// Look up a category record.
    pub fn category(&self, id: CategoryId) -> Result<&Category> {
        self.categories
            .get(&id)
            .ok_or(LiwcError::UnknownCategory(id))
    }

    fn category_mut(&mut self, id: CategoryId) -> Result<&mut Category> {
        self.categories
            .get_mut(&id)
            .ok_or(LiwcError::UnknownCategory(id))
    }

    /// All declared category ids in numeric order.
    pub fn category_ids(&self) -> impl Iterator<Item = CategoryId> + '_ {
        self.categories.keys().copied()
    }

    /// Iterate over `(id, category)` pairs in numeric id order.
    pub fn iter(&self) -> impl Iterator<Item = (CategoryId, &Category)> + '_ {
        self.categories.iter().map(|(id, category)| (*id, category))
    }

    /// Number of declared categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether no category has been declared.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Union of the word sets of all categories.
    pub fn all_words(&self) -> BTreeSet<String> {
        self.categories
            .values()
            .flat_map(|category| category.words.iter().cloned())
            .collect()
    }

    /// Categories whose word set contains `word` literally.
    pub fn categories_containing(&self, word: &str) -> BTreeSet<CategoryId> {
        self.categories
            .iter()
            .filter(|(_, category)| category.words.contains(word))
            .map(|(id, _)| *id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|w| w.to_string()).collect()
    }

    fn sample_store() -> CategoryStore {
        let mut store = CategoryStore::new();
        store.add_category(CategoryId::new(1), "Pronoun", words(&["i", "we"]));
        store.add_category(CategoryId::new(2), "Funct", words(&["i", "the"]));
        store
    }

    #[test]
    fn test_unknown_category_is_an_error() {
        let mut store = sample_store();
        let missing = CategoryId::new(9);

        assert!(matches!(
            store.add_word(missing, "x"),
            Err(LiwcError::UnknownCategory(id)) if id == missing
        ));
        assert!(store.words(missing).is_err());
        assert!(store.description(missing).is_err());
    }

    #[test]
    fn test_readding_category_overwrites() {
        let mut store = sample_store();
        store.add_category(CategoryId::new(1), "Pronouns", BTreeSet::new());

        assert_eq!(store.description(CategoryId::new(1)).unwrap(), "Pronouns");
        assert!(store.words(CategoryId::new(1)).unwrap().is_empty());
    }

    #[test]
    fn test_drop_word_all_categories() {
        let mut store = sample_store();
        let affected = store.drop_word_all_categories("i");

        assert_eq!(affected, [CategoryId::new(1), CategoryId::new(2)].into());
        assert_eq!(store.all_words(), words(&["the", "we"]));
        assert!(!store.drop_word(CategoryId::new(1), "absent").unwrap());
        assert!(store.drop_word(CategoryId::new(2), "the").unwrap());
    }

    #[test]
    fn test_union_and_subtract() {
        let mut store = sample_store();
        store
            .union_words(CategoryId::new(1), &words(&["you", "they"]))
            .unwrap();
        store
            .subtract_words(CategoryId::new(1), &words(&["i", "they"]))
            .unwrap();

        assert_eq!(
            store.words(CategoryId::new(1)).unwrap(),
            &words(&["we", "you"])
        );
    }

    #[test]
    fn test_categories_containing_is_exact() {
        let mut store = sample_store();
        store.add_word(CategoryId::new(2), "th*").unwrap();

        assert_eq!(
            store.categories_containing("i"),
            [CategoryId::new(1), CategoryId::new(2)].into()
        );
        assert!(store.categories_containing("thy").is_empty());
    }
}
