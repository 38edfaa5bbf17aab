//! Where words went between two schema versions.
//!
//! For every new category the words of the category and of its old
//! counterparts are sorted into five cells:
//!
//! | cell | old categories | new category | old dictionary | new dictionary |
//! |------|----------------|--------------|----------------|----------------|
//! | [`MigrationCell::Dropped`]      | yes | no  | yes | no  |
//! | [`MigrationCell::Moved`]        | yes | no  | yes | yes |
//! | [`MigrationCell::Kept`]         | yes | yes | yes | yes |
//! | [`MigrationCell::Joined`]       | no  | yes | yes | yes |
//! | [`MigrationCell::Added`]        | no  | yes | no  | yes |

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::dictionary::{CategoryId, Dictionary};
use crate::schema::matcher::SchemaMatcher;

/// One of the five audit cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationCell {
    /// In an old counterpart, missing from the new dictionary.
    Dropped,
    /// In an old counterpart and the new dictionary, but not in this category.
    Moved,
    /// In an old counterpart and in this category.
    Kept,
    /// In this category and the old dictionary, but in no old counterpart.
    Joined,
    /// In this category, missing from the old dictionary.
    Added,
}

impl MigrationCell {
    pub const ALL: [MigrationCell; 5] = [
        MigrationCell::Dropped,
        MigrationCell::Moved,
        MigrationCell::Kept,
        MigrationCell::Joined,
        MigrationCell::Added,
    ];
}

/// Audit of a single new category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMigration {
    pub category: CategoryId,
    pub label: String,
    pub old_categories: Vec<(CategoryId, String)>,
    pub cells: BTreeMap<MigrationCell, BTreeSet<String>>,
    /// Extra-hierarchical words of the old counterparts.
    pub old_extra_hierarchical: BTreeSet<String>,
    /// Extra-hierarchical words of this category, if it is a parent.
    pub new_extra_hierarchical: Option<BTreeSet<String>>,
}

impl CategoryMigration {
    /// Words in a cell.
    pub fn cell(&self, cell: MigrationCell) -> &BTreeSet<String> {
        static EMPTY: BTreeSet<String> = BTreeSet::new();
        self.cells.get(&cell).unwrap_or(&EMPTY)
    }
}

/// Audit of a whole conversion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationAudit {
    pub matching_file: String,
    pub old_dictionary: String,
    pub new_dictionary: String,
    pub old_word_count: usize,
    pub new_word_count: usize,
    pub old_unhandled_lines: Vec<String>,
    pub new_unhandled_lines: Vec<String>,
    pub categories: Vec<CategoryMigration>,
    pub totals: BTreeMap<MigrationCell, usize>,
}

impl SchemaMatcher {
    /// Compare an old dictionary with its new-schema successor.
    pub fn audit(&self, old: &Dictionary, new: &Dictionary) -> MigrationAudit {
        let old_ehw = old.extra_hierarchical_words();
        let new_ehw = new.extra_hierarchical_words();
        let empty = BTreeSet::new();

        let mut totals: BTreeMap<MigrationCell, usize> =
            MigrationCell::ALL.iter().map(|&c| (c, 0)).collect();
        let mut categories = Vec::new();

        for (id, label) in self.new_categories() {
            let old_ids = self.old_counterparts(id);
            let new_words = new.store().words(id).unwrap_or(&empty);

            let mut old_words = BTreeSet::new();
            let mut old_extra_hierarchical = BTreeSet::new();
            let mut old_categories = Vec::new();
            for &old_id in old_ids {
                if let Ok(category) = old.store().category(old_id) {
                    old_words.extend(category.words.iter().cloned());
                    old_categories.push((old_id, category.label.clone()));
                }
                if let Some(ehw) = old_ehw.get(&old_id) {
                    old_extra_hierarchical.extend(ehw.iter().cloned());
                }
            }

            let mut cells: BTreeMap<MigrationCell, BTreeSet<String>> = BTreeMap::new();
            cells.insert(
                MigrationCell::Dropped,
                old_words
                    .iter()
                    .filter(|w| !new.word_set().contains(*w))
                    .cloned()
                    .collect(),
            );
            cells.insert(
                MigrationCell::Moved,
                old_words
                    .iter()
                    .filter(|w| new.word_set().contains(*w) && !new_words.contains(*w))
                    .cloned()
                    .collect(),
            );
            cells.insert(
                MigrationCell::Kept,
                old_words.intersection(new_words).cloned().collect(),
            );
            cells.insert(
                MigrationCell::Joined,
                new_words
                    .iter()
                    .filter(|w| old.word_set().contains(*w) && !old_words.contains(*w))
                    .cloned()
                    .collect(),
            );
            cells.insert(
                MigrationCell::Added,
                new_words
                    .iter()
                    .filter(|w| !old.word_set().contains(*w))
                    .cloned()
                    .collect(),
            );

            for (cell, words) in &cells {
                *totals.entry(*cell).or_default() += words.len();
            }

            categories.push(CategoryMigration {
                category: id,
                label: label.to_string(),
                old_categories,
                cells,
                old_extra_hierarchical,
                new_extra_hierarchical: new_ehw.get(&id).cloned(),
            });
        }

        MigrationAudit {
            matching_file: self.name().to_string(),
            old_dictionary: old.name().to_string(),
            new_dictionary: new.name().to_string(),
            old_word_count: old.word_set().len(),
            new_word_count: new.word_set().len(),
            old_unhandled_lines: old.unhandled_lines().to_vec(),
            new_unhandled_lines: new.unhandled_lines().to_vec(),
            categories,
            totals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_audit_cells() {
        let matcher = SchemaMatcher::parse(
            "match.csv",
            "v1;;v2;\n1;Posemo;10;Positive\n2;Negemo;11;Negative\n;;12;Slang\n",
        )
        .unwrap();
        let old = Dictionary::parse("%\n1\tPosemo\n2\tNegemo\n%\nhappy\t1\ngood\t1\nfine\t1\nbad\t2\n");
        let new = Dictionary::parse(
            "%\n10\tPositive\n11\tNegative\n12\tSlang\n%\nhappy\t10\nbad\t10\njoy\t10\ngood\t11\nlol\t12\n",
        );

        let audit = matcher.audit(&old, &new);
        let positive = &audit.categories[0];

        assert_eq!(positive.label, "Positive");
        assert_eq!(positive.old_categories, vec![(CategoryId::new(1), "Posemo".to_string())]);
        assert_eq!(positive.cell(MigrationCell::Dropped), &words(&["fine"]));
        assert_eq!(positive.cell(MigrationCell::Moved), &words(&["good"]));
        assert_eq!(positive.cell(MigrationCell::Kept), &words(&["happy"]));
        assert_eq!(positive.cell(MigrationCell::Joined), &words(&["bad"]));
        assert_eq!(positive.cell(MigrationCell::Added), &words(&["joy"]));

        let slang = &audit.categories[2];
        assert!(slang.old_categories.is_empty());
        assert_eq!(slang.cell(MigrationCell::Added), &words(&["lol"]));

        assert_eq!(audit.totals[&MigrationCell::Added], 2);
        assert_eq!(audit.old_word_count, 4);
    }

    #[test]
    fn test_extra_hierarchical_words() {
        let matcher =
            SchemaMatcher::parse("match.csv", "v1;;v2;\n1;Affect;1;Affect\n2;Posemo;2;Posemo\n")
                .unwrap();
        let old = Dictionary::parse("%\n1\tAffect\n2\tPosemo\n%\nhappy\t1\t2\nmood\t1\n");
        let new = matcher.convert(&old).unwrap();

        let audit = matcher.audit(&old, &new);

        assert_eq!(audit.categories[0].old_extra_hierarchical, words(&["mood"]));
        assert_eq!(
            audit.categories[0].new_extra_hierarchical,
            Some(words(&["mood"]))
        );
        assert_eq!(audit.categories[1].new_extra_hierarchical, None);
    }
}
