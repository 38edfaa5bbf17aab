//! Two-step deduplication of overlapping wildcard entries.
//!
//! [`Dictionary::prepare_dedup`] pulls overlapping entries (a wildcard
//! together with whatever it overlaps) out of the dictionary and returns them
//! as a review file. After the file has been curated by hand,
//! [`Dictionary::reintegrate`] puts the surviving entries back.
//!
//! Review file lines hold an entry followed by the categories it belonged to
//! at extraction time, tab-separated. Only the first whitespace-separated
//! token of each category field is read back, so labels may be left in place:
//!
//! ```text
//! happ*	1 (Posemo)	3 (Affect)
//! happy	1 (Posemo)
//! ```

use std::collections::BTreeSet;
use std::fmt;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::dictionary::category::CategoryId;
use crate::dictionary::dictionary::Dictionary;
use crate::dictionary::ingest::normalize_word;
use crate::dictionary::matcher::{is_wildcard, literal_prefix};
use crate::error::{LiwcError, Result};

/// An extracted entry with its categories at extraction time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupEntry {
    pub word: String,
    pub categories: Vec<(CategoryId, String)>,
}

/// Entries removed by [`Dictionary::prepare_dedup`], in sorted order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupExtraction {
    pub entries: Vec<DedupEntry>,
}

impl DedupExtraction {
    /// The removed words.
    pub fn words(&self) -> BTreeSet<String> {
        self.entries.iter().map(|e| e.word.clone()).collect()
    }

    /// Render the review file.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.word);
            for (id, label) in &entry.categories {
                out.push_str(&format!("\t{id} ({})", review_label(label)));
            }
            out.push('\n');
        }
        out
    }
}

/// Labels may hold tabs; the review file uses them as field separators.
fn review_label(label: &str) -> String {
    label
        .split(['\t', '\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A reason a review file cannot be reintegrated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeConflict {
    /// The entry is already in the live dictionary.
    AlreadyPresent { word: String },
    /// The entry appears more than once in the review file.
    DuplicateEntry { word: String },
    /// The entry names a category that is not part of the dictionary.
    InvalidCategory { word: String, category: String },
}

impl fmt::Display for MergeConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeConflict::AlreadyPresent { word } => write!(f, "{word} already in dictionary"),
            MergeConflict::DuplicateEntry { word } => write!(f, "{word} duplicate entry"),
            MergeConflict::InvalidCategory { word, category } => {
                write!(f, "{word} invalid category {category}")
            }
        }
    }
}

/// Every conflict found in a review file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConflicts(pub Vec<MergeConflict>);

impl fmt::Display for MergeConflicts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", lines.join("; "))
    }
}

/// What a successful reintegration added.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReintegrationSummary {
    pub words_added: usize,
    pub memberships_added: usize,
}

/// Select the entries that overlap, scanning the sorted word set once.
///
/// A wildcard is never selected alone: it is pulled out together with the
/// later wildcard extending its prefix, its own bare literal form, or the
/// plain word sharing its prefix that motivated the selection.
fn overlapping_entries(word_set: &BTreeSet<String>) -> BTreeSet<String> {
    let mut selected = BTreeSet::new();
    let mut current: Option<(&str, &str)> = None;

    for word in word_set {
        if is_wildcard(word) {
            let prefix = literal_prefix(word);
            match current {
                Some((star, last_prefix)) if prefix.starts_with(last_prefix) => {
                    selected.insert(star.to_string());
                    selected.insert(word.clone());
                }
                _ => current = Some((word.as_str(), prefix)),
            }
            if word_set.contains(prefix) {
                selected.insert(prefix.to_string());
                selected.insert(word.clone());
            }
        } else if let Some((star, prefix)) = current {
            if word.starts_with(prefix) {
                selected.insert(star.to_string());
                selected.insert(word.clone());
            }
        }
    }

    selected
}

struct ReviewLine {
    word: String,
    categories: Vec<String>,
}

fn parse_review_file(text: &str) -> Vec<ReviewLine> {
    text.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut fields = line.split('\t');
            let word = normalize_word(fields.next().unwrap_or_default());
            let categories = fields
                .filter_map(|field| field.split_whitespace().next())
                .map(str::to_string)
                .collect();
            ReviewLine { word, categories }
        })
        .collect()
}

impl Dictionary {
    /// Remove overlapping wildcard entries and return them for manual review.
    pub fn prepare_dedup(&mut self) -> DedupExtraction {
        let selected = overlapping_entries(self.word_set());

        let entries: Vec<DedupEntry> = selected
            .iter()
            .map(|word| {
                let categories = self
                    .store()
                    .categories_containing(word)
                    .into_iter()
                    .map(|id| {
                        let label = self.store().description(id).unwrap_or_default();
                        (id, label.to_string())
                    })
                    .collect();
                DedupEntry {
                    word: word.clone(),
                    categories,
                }
            })
            .collect();

        for word in &selected {
            self.store_mut().drop_word_all_categories(word);
        }
        self.restore_word_set();

        info!("Extracted {} overlapping entries for review", entries.len());
        DedupExtraction { entries }
    }

    /// Put curated review-file entries back into the dictionary.
    ///
    /// Nothing is changed when any conflict is found; all conflicts are
    /// reported together. On success the dictionary's own hierarchies are
    /// re-applied to it.
    pub fn reintegrate(&mut self, review_file: &str) -> Result<ReintegrationSummary> {
        let lines = parse_review_file(review_file);

        let mut conflicts = Vec::new();
        let mut seen = BTreeSet::new();
        let mut additions = Vec::new();
        for line in &lines {
            if self.word_set().contains(&line.word) {
                conflicts.push(MergeConflict::AlreadyPresent {
                    word: line.word.clone(),
                });
            }
            if !seen.insert(line.word.clone()) {
                conflicts.push(MergeConflict::DuplicateEntry {
                    word: line.word.clone(),
                });
            }
            for raw in &line.categories {
                match CategoryId::parse(raw) {
                    Ok(id) if self.store().contains_category(id) => {
                        additions.push((id, line.word.clone()));
                    }
                    _ => conflicts.push(MergeConflict::InvalidCategory {
                        word: line.word.clone(),
                        category: raw.clone(),
                    }),
                }
            }
            if line.categories.is_empty() {
                debug!("Dropping '{}', no categories left after review", line.word);
            }
        }

        if !conflicts.is_empty() {
            return Err(LiwcError::MergeConflict(MergeConflicts(conflicts)));
        }

        let memberships_added = additions.len();
        for (id, word) in additions {
            self.store_mut().add_word(id, word)?;
        }
        self.complete_from_self()?;

        let summary = ReintegrationSummary {
            words_added: seen.len(),
            memberships_added,
        };
        info!(
            "Reintegrated {} words ({} category memberships)",
            summary.words_added, summary.memberships_added
        );
        Ok(summary)
    }
}
