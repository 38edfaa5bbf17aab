//! Structural comparison of two dictionaries.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dictionary::category::CategoryId;
use crate::dictionary::dictionary::Dictionary;

/// A category present on only one side of a comparison.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: CategoryId,
    pub label: String,
    pub word_count: usize,
}

/// A shared category whose label changed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelDrift {
    pub id: CategoryId,
    pub old_label: String,
    pub new_label: String,
}

/// A shared category whose words changed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordDrift {
    pub id: CategoryId,
    pub old_label: String,
    pub new_label: String,
    pub removed: BTreeSet<String>,
    pub added: BTreeSet<String>,
}

/// Differences between an old and a new dictionary.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryComparison {
    pub old_name: String,
    pub new_name: String,
    /// Unhandled lines of both sides, present only when they differ.
    pub unhandled_lines: Option<(Vec<String>, Vec<String>)>,
    /// Words of the old dictionary missing from the new one.
    pub removed_words: BTreeSet<String>,
    /// Words of the new dictionary missing from the old one.
    pub added_words: BTreeSet<String>,
    pub removed_categories: Vec<CategorySummary>,
    pub added_categories: Vec<CategorySummary>,
    pub relabeled: Vec<LabelDrift>,
    pub changed_categories: Vec<WordDrift>,
}

impl DictionaryComparison {
    /// Whether the dictionaries have no reported differences.
    pub fn is_identical(&self) -> bool {
        self.unhandled_lines.is_none()
            && self.removed_words.is_empty()
            && self.added_words.is_empty()
            && self.removed_categories.is_empty()
            && self.added_categories.is_empty()
            && self.relabeled.is_empty()
            && self.changed_categories.is_empty()
    }
}

fn summarize(dictionary: &Dictionary, ids: &BTreeSet<CategoryId>) -> Vec<CategorySummary> {
    dictionary
        .store()
        .iter()
        .filter(|(id, _)| ids.contains(id))
        .map(|(id, category)| CategorySummary {
            id,
            label: category.label.clone(),
            word_count: category.len(),
        })
        .collect()
}

impl Dictionary {
    /// Compare this (old) dictionary against a newer one without mutating either.
    pub fn compare(&self, other: &Dictionary) -> DictionaryComparison {
        let mut comparison = DictionaryComparison {
            old_name: self.name().to_string(),
            new_name: other.name().to_string(),
            ..Default::default()
        };

        if self.unhandled_lines() != other.unhandled_lines() {
            comparison.unhandled_lines = Some((
                self.unhandled_lines().to_vec(),
                other.unhandled_lines().to_vec(),
            ));
        }

        comparison.removed_words = self
            .word_set()
            .difference(other.word_set())
            .cloned()
            .collect();
        comparison.added_words = other
            .word_set()
            .difference(self.word_set())
            .cloned()
            .collect();

        let old_ids: BTreeSet<CategoryId> = self.store().category_ids().collect();
        let new_ids: BTreeSet<CategoryId> = other.store().category_ids().collect();
        comparison.removed_categories =
            summarize(self, &old_ids.difference(&new_ids).copied().collect());
        comparison.added_categories =
            summarize(other, &new_ids.difference(&old_ids).copied().collect());

        for (id, old) in self.store().iter() {
            let Ok(new) = other.store().category(id) else {
                continue;
            };
            if old.label != new.label {
                comparison.relabeled.push(LabelDrift {
                    id,
                    old_label: old.label.clone(),
                    new_label: new.label.clone(),
                });
            }
            if old.words != new.words {
                comparison.changed_categories.push(WordDrift {
                    id,
                    old_label: old.label.clone(),
                    new_label: new.label.clone(),
                    removed: old.words.difference(&new.words).cloned().collect(),
                    added: new.words.difference(&old.words).cloned().collect(),
                });
            }
        }

        comparison
    }
}

fn join(words: &BTreeSet<String>) -> String {
    words.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
}

impl fmt::Display for DictionaryComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Differences between dictionaries {} and {}",
            self.old_name, self.new_name
        )?;

        match &self.unhandled_lines {
            Some((old, new)) => {
                writeln!(f, "Old unhandled lines: {old:?}")?;
                writeln!(f, "New unhandled lines: {new:?}")?;
            }
            None => writeln!(f, "Same unhandled lines, if any")?,
        }

        if self.removed_words.is_empty() && self.added_words.is_empty() {
            writeln!(f, "Same words in dictionaries")?;
        } else {
            writeln!(
                f,
                "Old words not in new dict: {} {}",
                self.removed_words.len(),
                join(&self.removed_words)
            )?;
            writeln!(
                f,
                "New words not in old dict: {} {}",
                self.added_words.len(),
                join(&self.added_words)
            )?;
        }

        if self.removed_categories.is_empty() && self.added_categories.is_empty() {
            writeln!(f, "Same categories in use")?;
        } else {
            writeln!(f, "Old categories not in new dict: ({})", self.removed_categories.len())?;
            for c in &self.removed_categories {
                writeln!(f, "  {} {} {} words", c.id, c.label, c.word_count)?;
            }
            writeln!(f, "New categories not in old dict: ({})", self.added_categories.len())?;
            for c in &self.added_categories {
                writeln!(f, "  {} {} {} words", c.id, c.label, c.word_count)?;
            }
        }

        if self.relabeled.is_empty() {
            writeln!(f, "Same categories (if any) have same descriptions")?;
        }
        for drift in &self.relabeled {
            writeln!(
                f,
                "Category changed description: {} {} -> {}",
                drift.id, drift.old_label, drift.new_label
            )?;
        }

        if self.changed_categories.is_empty() {
            writeln!(f, "Same words in corresponding categories (if any)")?;
        }
        for drift in &self.changed_categories {
            writeln!(f, "Category with changed words: {} {}", drift.id, drift.new_label)?;
            writeln!(f, "  Removed words: {} {}", drift.removed.len(), join(&drift.removed))?;
            writeln!(f, "  Added words: {} {}", drift.added.len(), join(&drift.added))?;
        }
        Ok(())
    }
}
