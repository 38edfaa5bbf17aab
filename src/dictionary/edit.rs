//! Edit scripts: line-oriented add/delete instructions.
//!
//! ```text
//! add	1 3	hopeful
//! del	2	maybe
//! del	*	foo
//! ```
//!
//! Each line is `verb`, `categories`, `word`, tab-separated. `categories` is a
//! whitespace-separated list of ids, or `*` for "every category currently
//! containing the word" (deletions only).

use std::fmt;

use log::info;
use serde::{Deserialize, Serialize};

use crate::dictionary::category::CategoryId;
use crate::dictionary::dictionary::Dictionary;
use crate::dictionary::ingest::normalize_word;
use crate::error::{LiwcError, Result};

/// Categories addressed by an edit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditTarget {
    /// Every category containing the word.
    All,
    /// The listed categories.
    Categories(Vec<CategoryId>),
}

/// A single parsed edit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditCommand {
    Add { categories: Vec<CategoryId>, word: String },
    Delete { target: EditTarget, word: String },
}

/// Why an edit-script line was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditIssue {
    UnknownVerb(String),
    MissingField,
    WildcardAdd,
    InvalidCategory(String),
    UnknownCategory(CategoryId),
}

impl fmt::Display for EditIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditIssue::UnknownVerb(verb) => write!(f, "unexpected function '{verb}'"),
            EditIssue::MissingField => write!(f, "expected verb, categories and word"),
            EditIssue::WildcardAdd => write!(f, "'*' is only valid for del"),
            EditIssue::InvalidCategory(raw) => write!(f, "invalid category '{raw}'"),
            EditIssue::UnknownCategory(id) => write!(f, "unknown category {id}"),
        }
    }
}

/// A rejected edit-script line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditCommandError {
    pub line_number: usize,
    pub line: String,
    pub issue: EditIssue,
}

impl fmt::Display for EditCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({})", self.line_number, self.issue, self.line)
    }
}

/// Counts of applied edits.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSummary {
    pub additions: usize,
    pub deletions: usize,
}

impl EditCommand {
    /// Parse one script line.
    pub fn parse(line: &str) -> std::result::Result<Self, EditIssue> {
        let fields: Vec<&str> = line.split('\t').collect();
        let verb = fields[0].trim();
        if verb != "add" && verb != "del" {
            return Err(EditIssue::UnknownVerb(verb.to_string()));
        }
        if fields.len() < 3 {
            return Err(EditIssue::MissingField);
        }
        let categories = fields[1].trim();
        let word = normalize_word(fields[2]);
        if categories.is_empty() || word.is_empty() {
            return Err(EditIssue::MissingField);
        }

        let target = if categories == "*" {
            EditTarget::All
        } else {
            let ids = categories
                .split_whitespace()
                .map(|raw| {
                    CategoryId::parse(raw).map_err(|_| EditIssue::InvalidCategory(raw.to_string()))
                })
                .collect::<std::result::Result<Vec<_>, _>>()?;
            EditTarget::Categories(ids)
        };

        match (verb, target) {
            ("add", EditTarget::All) => Err(EditIssue::WildcardAdd),
            ("add", EditTarget::Categories(categories)) => Ok(EditCommand::Add { categories, word }),
            (_, target) => Ok(EditCommand::Delete { target, word }),
        }
    }

    fn categories(&self) -> &[CategoryId] {
        match self {
            EditCommand::Add { categories, .. } => categories,
            EditCommand::Delete {
                target: EditTarget::Categories(categories),
                ..
            } => categories,
            EditCommand::Delete { .. } => &[],
        }
    }
}

impl Dictionary {
    /// Apply an edit script in line order.
    ///
    /// The whole script is validated first; when any line is invalid, every
    /// invalid line is reported and nothing is applied.
    pub fn apply_edit_script(&mut self, script: &str) -> Result<EditSummary> {
        let mut commands = Vec::new();
        let mut errors = Vec::new();

        for (index, raw) in script.lines().enumerate() {
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let error = |issue| EditCommandError {
                line_number: index + 1,
                line: line.to_string(),
                issue,
            };
            match EditCommand::parse(line) {
                Ok(command) => {
                    let unknown = command
                        .categories()
                        .iter()
                        .find(|id| !self.store().contains_category(**id));
                    match unknown {
                        Some(id) => errors.push(error(EditIssue::UnknownCategory(*id))),
                        None => commands.push(command),
                    }
                }
                Err(issue) => errors.push(error(issue)),
            }
        }

        if !errors.is_empty() {
            return Err(LiwcError::InvalidEditCommand(errors));
        }

        let mut summary = EditSummary::default();
        for command in commands {
            match command {
                EditCommand::Add { categories, word } => {
                    for id in categories {
                        self.store_mut().add_word(id, word.clone())?;
                        summary.additions += 1;
                    }
                }
                EditCommand::Delete {
                    target: EditTarget::All,
                    word,
                } => {
                    summary.deletions += self.store_mut().drop_word_all_categories(&word).len();
                }
                EditCommand::Delete {
                    target: EditTarget::Categories(categories),
                    word,
                } => {
                    for id in categories {
                        if self.store_mut().drop_word(id, &word)? {
                            summary.deletions += 1;
                        }
                    }
                }
            }
        }
        self.restore_word_set();

        info!(
            "Applied edit script: {} additions, {} deletions",
            summary.additions, summary.deletions
        );
        Ok(summary)
    }
}
