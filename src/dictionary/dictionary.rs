//! The dictionary aggregate: categories, flat word set and audit trail.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::Path;

use log::{debug, info, warn};

use crate::dictionary::category::CategoryId;
use crate::dictionary::hierarchy::{self, Hierarchy};
use crate::dictionary::ingest::{self, IngestOutcome, IngestWarning};
use crate::dictionary::matcher::{self, MatchEngine};
use crate::dictionary::store::CategoryStore;
use crate::error::{LiwcError, Result};

/// Name reported for dictionaries that were not read from a file.
const UNNAMED: &str = "-none-";

/// A LIWC-style word-category dictionary.
///
/// The flat word set mirrors the union of all category word sets. Structural
/// edits restore it through [`Dictionary::restore_word_set`] before they
/// return.
///
/// # Examples
///
/// ```
/// use liwc_tools::dictionary::{CategoryId, Dictionary};
///
/// let dictionary = Dictionary::parse("%\n1\tPronoun\n2\tFunct\n%\ni\t1\t2\nwe\t1\n");
///
/// assert_eq!(dictionary.word_set().len(), 2);
/// assert_eq!(
///     dictionary.categories_for_token("I"),
///     [CategoryId::new(1), CategoryId::new(2)].into()
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dictionary {
    name: Option<String>,
    store: CategoryStore,
    word_set: BTreeSet<String>,
    unhandled_lines: Vec<String>,
}

impl Dictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Dictionary::default()
    }

    /// Build a dictionary from already-ingested content.
    pub fn from_outcome(outcome: IngestOutcome) -> Self {
        let mut dictionary = Dictionary::new();
        for (id, label) in outcome.declarations {
            dictionary.store.add_category(id, label, BTreeSet::new());
        }
        for (word, categories) in outcome.entries {
            for id in categories {
                // Ingestion only yields declared ids.
                if dictionary.store.add_word(id, word.clone()).is_err() {
                    warn!("Skipping '{word}' for undeclared category {id}");
                }
            }
        }
        dictionary.unhandled_lines = outcome.unhandled_lines;
        dictionary.restore_word_set();
        dictionary
    }

    /// Parse dictionary text, logging any warnings.
    pub fn parse(text: &str) -> Self {
        Self::parse_with_warnings(text).0
    }

    /// Parse dictionary text, returning the warnings alongside the dictionary.
    pub fn parse_with_warnings(text: &str) -> (Self, Vec<IngestWarning>) {
        let outcome = ingest::parse_dictionary(text);
        let warnings = outcome.warnings.clone();
        for warning in &warnings {
            warn!("{warning}");
        }
        (Self::from_outcome(outcome), warnings)
    }

    /// Read a UTF-8 dictionary file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Reading dictionary file {}", path.display());
        let text = fs::read_to_string(path)?;
        let mut dictionary = Self::parse(&text);
        dictionary.name = Some(path.display().to_string());
        info!(
            "Read {} words in {} categories",
            dictionary.word_set.len(),
            dictionary.store.len()
        );
        Ok(dictionary)
    }

    /// Write the dictionary to a new file; an existing file is never overwritten.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if path.exists() {
            return Err(LiwcError::Io(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", path.display()),
            )));
        }
        fs::write(path, self.to_dic_string())?;
        info!("Wrote dictionary to {}", path.display());
        Ok(())
    }

    /// Render the dictionary in its text format.
    pub fn to_dic_string(&self) -> String {
        ingest::render_dictionary(&self.store)
    }

    /// Source name, `-none-` for constructed dictionaries.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED)
    }

    /// Set the source name.
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = Some(name.into());
    }

    /// The category store.
    pub fn store(&self) -> &CategoryStore {
        &self.store
    }

    /// Mutable access to the category store.
    ///
    /// Call [`Dictionary::restore_word_set`] after editing through it.
    pub fn store_mut(&mut self) -> &mut CategoryStore {
        &mut self.store
    }

    /// The flat set of all entries.
    pub fn word_set(&self) -> &BTreeSet<String> {
        &self.word_set
    }

    /// Input lines that could not be interpreted when the dictionary was read.
    pub fn unhandled_lines(&self) -> &[String] {
        &self.unhandled_lines
    }

    /// Declare a category.
    pub fn add_category<S: Into<String>>(&mut self, id: CategoryId, label: S) {
        self.store.add_category(id, label, BTreeSet::new());
    }

    /// Add an entry to a category and to the word set.
    pub fn add_word(&mut self, id: CategoryId, word: &str) -> Result<()> {
        let word = ingest::normalize_word(word);
        self.store.add_word(id, word.clone())?;
        self.word_set.insert(word);
        Ok(())
    }

    /// Re-derive the flat word set from the categories.
    pub fn restore_word_set(&mut self) {
        self.word_set = self.store.all_words();
    }

    /// Whether the flat word set equals the union of all categories.
    pub fn is_consistent(&self) -> bool {
        self.word_set == self.store.all_words()
    }

    /// Categories firing for a token (exact match first, then longest wildcard).
    pub fn categories_for_token(&self, token: &str) -> BTreeSet<CategoryId> {
        MatchEngine::new(&self.store).categories_for_token(token)
    }

    /// Hierarchies inferred from the current word sets.
    pub fn hierarchies(&self) -> BTreeSet<Hierarchy> {
        hierarchy::compute_hierarchies(&self.store)
    }

    /// Extra-hierarchical words of every parent category.
    pub fn extra_hierarchical_words(&self) -> BTreeMap<CategoryId, BTreeSet<String>> {
        hierarchy::extra_hierarchical_words(&self.store, &self.hierarchies())
    }

    /// Apply the hierarchies of `model`: every child's words are added to its parent.
    pub fn complete(&mut self, model: &Dictionary) -> Result<()> {
        let hierarchies = model.hierarchies();
        self.complete_with(&hierarchies)
    }

    /// Apply this dictionary's own hierarchies to itself.
    pub fn complete_from_self(&mut self) -> Result<()> {
        let hierarchies = self.hierarchies();
        self.complete_with(&hierarchies)
    }

    pub(crate) fn complete_with(&mut self, hierarchies: &BTreeSet<Hierarchy>) -> Result<()> {
        for hierarchy in hierarchies {
            debug!("Completing {} into {}", hierarchy.child, hierarchy.parent);
            let child_words = self.store.words(hierarchy.child)?.clone();
            self.store.union_words(hierarchy.parent, &child_words)?;
        }
        self.restore_word_set();
        Ok(())
    }

    /// Remove every word from a category.
    ///
    /// For each hierarchy of `model` in which `id` is the child, the category's
    /// current words are first subtracted from that parent in this dictionary.
    pub fn empty_category(&mut self, id: CategoryId, model: &Dictionary) -> Result<()> {
        let hierarchies = model.hierarchies();
        self.empty_category_with(id, &hierarchies)
    }

    pub(crate) fn empty_category_with(
        &mut self,
        id: CategoryId,
        hierarchies: &BTreeSet<Hierarchy>,
    ) -> Result<()> {
        self.unwind_hierarchies(id, hierarchies)?;
        self.store.clear_words(id)?;
        self.restore_word_set();
        Ok(())
    }

    /// Remove a category, after undoing its contribution to its model parents.
    pub fn drop_category(&mut self, id: CategoryId, model: &Dictionary) -> Result<()> {
        let hierarchies = model.hierarchies();
        self.unwind_hierarchies(id, &hierarchies)?;
        self.store.remove_category(id)?;
        self.restore_word_set();
        Ok(())
    }

    fn unwind_hierarchies(
        &mut self,
        id: CategoryId,
        hierarchies: &BTreeSet<Hierarchy>,
    ) -> Result<()> {
        let words = self.store.words(id)?.clone();
        for hierarchy in hierarchies.iter().filter(|h| h.child == id) {
            debug!("Removing words of {id} from parent {}", hierarchy.parent);
            self.store.subtract_words(hierarchy.parent, &words)?;
        }
        Ok(())
    }

    /// A new dictionary with only the given categories.
    pub fn subset(&self, ids: &[CategoryId]) -> Result<Dictionary> {
        let mut subset = Dictionary::new();
        for &id in ids {
            let category = self.store.category(id)?;
            subset
                .store
                .add_category(id, category.label.clone(), category.words.clone());
        }
        subset.restore_word_set();
        Ok(subset)
    }

    /// Replace every wildcard entry by the corpus words sharing its prefix.
    ///
    /// Returns the number of wildcard entries expanded.
    pub fn expand_wildcards<I, S>(&mut self, corpus: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let corpus: Vec<String> = corpus
            .into_iter()
            .map(|w| ingest::normalize_word(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();

        let wildcards: Vec<String> = self
            .store
            .all_words()
            .into_iter()
            .filter(|w| matcher::is_wildcard(w))
            .collect();

        for wildcard in &wildcards {
            let categories = self.store.drop_word_all_categories(wildcard);
            let prefix = matcher::literal_prefix(wildcard);
            for word in corpus.iter().filter(|w| w.starts_with(prefix)) {
                for &id in &categories {
                    // Ids come from the store itself.
                    let _ = self.store.add_word(id, word.clone());
                }
            }
        }

        self.restore_word_set();
        info!("Expanded {} wildcard entries", wildcards.len());
        wildcards.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: u32) -> CategoryId {
        CategoryId::new(value)
    }

    fn words(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|w| w.to_string()).collect()
    }

    const AFFECT: &str = "%\n1\tPosemo\n2\tNegemo\n3\tAffect\n4\tFunct\n%\n\
happy\t1\t3\ngood\t1\t3\nsad\t2\t3\nmood\t3\nthe\t4\n";

    #[test]
    fn test_parse_builds_consistent_word_set() {
        let dictionary = Dictionary::parse(AFFECT);

        assert_eq!(dictionary.store().len(), 4);
        assert_eq!(dictionary.word_set().len(), 5);
        assert!(dictionary.is_consistent());
        assert_eq!(dictionary.name(), "-none-");
    }

    #[test]
    fn test_complete_from_model() {
        let model = Dictionary::parse(AFFECT);
        let mut target = model.clone();
        target.add_word(id(1), "glad").unwrap();

        target.complete(&model).unwrap();

        assert!(target.store().words(id(3)).unwrap().contains("glad"));
        assert!(target.is_consistent());
    }

    #[test]
    fn test_empty_category_unwinds_parents() {
        let model = Dictionary::parse(AFFECT);
        let mut dictionary = model.clone();

        dictionary.empty_category(id(1), &model).unwrap();

        assert!(dictionary.store().words(id(1)).unwrap().is_empty());
        assert_eq!(
            dictionary.store().words(id(3)).unwrap(),
            &words(&["mood", "sad"])
        );
        assert!(!dictionary.word_set().contains("happy"));
        assert!(dictionary.is_consistent());
    }

    #[test]
    fn test_empty_then_complete_leaves_unrelated_categories() {
        let model = Dictionary::parse(AFFECT);
        let mut dictionary = model.clone();

        dictionary.empty_category(id(4), &model).unwrap();
        dictionary.complete(&model).unwrap();

        for other in [id(1), id(2), id(3)] {
            assert_eq!(
                dictionary.store().words(other).unwrap(),
                model.store().words(other).unwrap()
            );
        }
        assert!(dictionary.store().words(id(4)).unwrap().is_empty());
    }

    #[test]
    fn test_drop_category_removes_id() {
        let model = Dictionary::parse(AFFECT);
        let mut dictionary = model.clone();

        dictionary.drop_category(id(2), &model).unwrap();

        assert!(!dictionary.store().contains_category(id(2)));
        assert!(!dictionary.store().words(id(3)).unwrap().contains("sad"));
        assert!(!dictionary.word_set().contains("sad"));
    }

    #[test]
    fn test_subset() {
        let dictionary = Dictionary::parse(AFFECT);
        let subset = dictionary.subset(&[id(2), id(4)]).unwrap();

        assert_eq!(subset.store().len(), 2);
        assert_eq!(subset.word_set(), &words(&["sad", "the"]));
        assert!(dictionary.subset(&[id(42)]).is_err());
    }

    #[test]
    fn test_expand_wildcards() {
        let mut dictionary =
            Dictionary::parse("%\n1\tPosemo\n2\tAffect\n%\nhapp*\t1\t2\nsad\t2\n");

        let expanded = dictionary.expand_wildcards(["happy", "Happiness", "hat", "unhappy"]);

        assert_eq!(expanded, 1);
        assert_eq!(
            dictionary.store().words(id(1)).unwrap(),
            &words(&["happiness", "happy"])
        );
        assert_eq!(
            dictionary.store().words(id(2)).unwrap(),
            &words(&["happiness", "happy", "sad"])
        );
        assert!(!dictionary.word_set().contains("happ*"));
    }

    #[test]
    fn test_save_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.dic");
        let dictionary = Dictionary::parse(AFFECT);

        dictionary.save(&path).unwrap();
        assert!(dictionary.save(&path).is_err());

        let reloaded = Dictionary::load(&path).unwrap();
        assert_eq!(reloaded.store(), dictionary.store());
        assert_eq!(reloaded.word_set(), dictionary.word_set());
    }
}
