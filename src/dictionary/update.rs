//! Updating a dictionary from delimited change files.
//!
//! Two header shapes are recognized, matched field by field:
//!
//! ```text
//! orig;oldcats;newcats;trans;cat:12,13;mode:replace
//! cat;word;cat:12;mode:add
//! ```
//!
//! The first is a *translation file*: each row carries an original term, the
//! old and new categories of a translator, and then either a `#`-marker in the
//! fourth column followed by words, or the words themselves. The second is an
//! *addition file* of `category;word` rows with an optional `#add`/`#remove`
//! marker. Both name the categories they update (`cat:`) and a merge policy
//! (`mode:`).

use std::collections::BTreeMap;
use std::fmt;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::ChangeFileConfig;
use crate::dictionary::category::CategoryId;
use crate::dictionary::dictionary::Dictionary;
use crate::error::{LiwcError, Result};
use crate::util::delimited::{self, Row};

const ADD_MARKER: &str = "#add";
const REMOVE_MARKER: &str = "#remove";

/// Which header shape a change file has.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateKind {
    /// `orig;oldcats;newcats;trans;cat:..;mode:..`
    Translation,
    /// `cat;word;cat:..;mode:..`
    Addition,
}

/// Merge policy read from the `mode:` header field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
    /// Rows are merged into the current words.
    Merge,
    /// The named categories are emptied first.
    Replace,
    /// The named categories and their hierarchy parents are emptied first.
    ReplaceHierarchy,
}

impl UpdateMode {
    fn parse(raw: &str) -> Self {
        match raw.trim() {
            "replace" => UpdateMode::Replace,
            "replacehierarchy" => UpdateMode::ReplaceHierarchy,
            "" | "add" | "merge" => UpdateMode::Merge,
            other => {
                warn!("Unrecognized update mode '{other}', merging");
                UpdateMode::Merge
            }
        }
    }
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateMode::Merge => write!(f, "merge"),
            UpdateMode::Replace => write!(f, "replace"),
            UpdateMode::ReplaceHierarchy => write!(f, "replacehierarchy"),
        }
    }
}

/// The parsed first row of a change file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeFileHeader {
    pub kind: UpdateKind,
    pub categories: Vec<CategoryId>,
    pub mode: UpdateMode,
}

impl ChangeFileHeader {
    /// Parse a header row.
    pub fn parse(fields: &[String]) -> Result<Self> {
        let field = |index: usize| fields.get(index).map(|f| f.trim()).unwrap_or("");

        let (kind, cat_field, mode_field) = match field(0) {
            "orig" => {
                if field(1) != "oldcats"
                    || field(2) != "newcats"
                    || field(3) != "trans"
                    || !field(4).starts_with("cat:")
                    || !field(5).starts_with("mode:")
                {
                    return Err(LiwcError::schema_header("error in first row of translation file"));
                }
                (UpdateKind::Translation, field(4), field(5))
            }
            "cat" => {
                if field(1) != "word" || !field(2).starts_with("cat:") || !field(3).starts_with("mode:")
                {
                    return Err(LiwcError::schema_header("error in first row of addition file"));
                }
                (UpdateKind::Addition, field(2), field(3))
            }
            other => {
                return Err(LiwcError::schema_header(format!(
                    "first field must be 'orig' or 'cat', found '{other}'"
                )));
            }
        };

        let categories = cat_field["cat:".len()..]
            .split(',')
            .map(|raw| {
                CategoryId::parse(raw).map_err(|_| {
                    LiwcError::schema_header(format!("invalid category '{raw}' in header"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ChangeFileHeader {
            kind,
            categories,
            mode: UpdateMode::parse(&mode_field["mode:".len()..]),
        })
    }
}

/// A change file: header plus data rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeFile {
    pub name: String,
    pub header: ChangeFileHeader,
    pub rows: Vec<Row>,
}

impl ChangeFile {
    /// Parse change-file text with the default delimiter.
    pub fn parse<S: Into<String>>(name: S, text: &str) -> Result<Self> {
        Self::parse_with(name, text, &ChangeFileConfig::default())
    }

    /// Parse change-file text.
    pub fn parse_with<S: Into<String>>(
        name: S,
        text: &str,
        config: &ChangeFileConfig,
    ) -> Result<Self> {
        let mut rows = delimited::read_rows(text, config)?.into_iter();
        let header_row = rows
            .next()
            .ok_or_else(|| LiwcError::schema_header("change file is empty"))?;
        let header = ChangeFileHeader::parse(&header_row.fields)?;
        Ok(ChangeFile {
            name: name.into(),
            header,
            rows: rows.filter(|row| !row.is_blank()).collect(),
        })
    }
}

/// Why a change-file row cannot be applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeIssue {
    TooFewColumns { expected: usize, found: usize },
    InvalidCategory(String),
    UnknownCategory(CategoryId),
    UnknownMarker(String),
}

/// A rejected change-file row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeFileIssue {
    pub line_number: u64,
    pub issue: ChangeIssue,
}

impl fmt::Display for ChangeFileIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: ", self.line_number)?;
        match &self.issue {
            ChangeIssue::TooFewColumns { expected, found } => {
                write!(f, "expected at least {expected} columns, found {found}")
            }
            ChangeIssue::InvalidCategory(raw) => write!(f, "invalid category '{raw}'"),
            ChangeIssue::UnknownCategory(id) => write!(f, "unknown category {id}"),
            ChangeIssue::UnknownMarker(marker) => write!(f, "unknown marker '{marker}'"),
        }
    }
}

/// Tally of one update run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateReport {
    pub update_file: String,
    pub dictionary: String,
    pub kind: UpdateKind,
    pub mode: UpdateMode,
    pub categories: Vec<CategoryId>,
    /// Word-to-category additions performed.
    pub additions: usize,
    /// Word-from-category removals performed.
    pub removals: usize,
    /// Values rejected because they hold more than one word.
    pub split_words: usize,
    /// Rows per `#`-marker (`#add`, `#remove`, `#reject`, `#donebefore`, ...).
    pub markers: BTreeMap<String, usize>,
}

impl UpdateReport {
    fn new(file: &ChangeFile, dictionary: &Dictionary) -> Self {
        UpdateReport {
            update_file: file.name.clone(),
            dictionary: dictionary.name().to_string(),
            kind: file.header.kind,
            mode: file.header.mode.clone(),
            categories: file.header.categories.clone(),
            additions: 0,
            removals: 0,
            split_words: 0,
            markers: BTreeMap::new(),
        }
    }

    /// Rows tallied under a marker.
    pub fn marker_count(&self, marker: &str) -> usize {
        self.markers.get(marker).copied().unwrap_or(0)
    }
}

impl fmt::Display for UpdateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let categories: Vec<String> = self.categories.iter().map(|c| c.to_string()).collect();
        writeln!(f, "Report of dictionary update")?;
        writeln!(f, "updateFile {}", self.update_file)?;
        writeln!(f, "dictFile {}", self.dictionary)?;
        writeln!(f, "updatetype {:?}", self.kind)?;
        writeln!(f, "cats {}", categories.join(","))?;
        writeln!(f, "mode {}", self.mode)?;
        write!(
            f,
            "counts addition={} removes={} splitwords={}",
            self.additions, self.removals, self.split_words
        )?;
        for (marker, count) in &self.markers {
            write!(f, " {marker}={count}")?;
        }
        Ok(())
    }
}

/// Normalize a change-file value: a leading `'` is dropped and `^` stands for `'`.
fn normalize_value(raw: &str) -> String {
    let value = raw.strip_prefix('\'').unwrap_or(raw);
    value.replace('^', "'").trim().to_lowercase()
}

/// The single word held by `raw`, or None when it holds several.
fn single_word(raw: &str) -> Option<String> {
    let word = normalize_value(raw);
    (word.split_whitespace().count() == 1).then_some(word)
}

impl Dictionary {
    /// Apply a change file, using `model` for hierarchy-aware clearing.
    ///
    /// All rows are validated before anything is changed; problems are
    /// reported together as [`LiwcError::InvalidChangeFile`]. Pass a clone of
    /// the dictionary as `model` to use its own hierarchies.
    pub fn update_from_change_file(
        &mut self,
        file: &ChangeFile,
        model: &Dictionary,
    ) -> Result<UpdateReport> {
        self.validate_change_file(file)?;

        let header = &file.header;
        let hierarchies = model.hierarchies();
        match header.mode {
            UpdateMode::Merge => {}
            UpdateMode::Replace => {
                for &id in &header.categories {
                    self.empty_category_with(id, &hierarchies)?;
                }
            }
            UpdateMode::ReplaceHierarchy => {
                for &id in &header.categories {
                    self.empty_category_with(id, &hierarchies)?;
                    for hierarchy in hierarchies.iter().filter(|h| h.child == id) {
                        self.empty_category_with(hierarchy.parent, &hierarchies)?;
                    }
                }
            }
        }
        self.restore_word_set();

        let mut report = UpdateReport::new(file, self);
        for row in &file.rows {
            match header.kind {
                UpdateKind::Addition => self.apply_addition_row(row, &mut report)?,
                UpdateKind::Translation => {
                    self.apply_translation_row(row, &header.categories, &mut report)?
                }
            }
        }
        self.restore_word_set();

        info!("{report}");
        Ok(report)
    }

    fn validate_change_file(&self, file: &ChangeFile) -> Result<()> {
        let mut issues = Vec::new();
        for &id in &file.header.categories {
            if !self.store().contains_category(id) {
                issues.push(ChangeFileIssue {
                    line_number: 1,
                    issue: ChangeIssue::UnknownCategory(id),
                });
            }
        }

        let expected = match file.header.kind {
            UpdateKind::Addition => 2,
            UpdateKind::Translation => 4,
        };
        for row in &file.rows {
            let mut report = |issue| {
                issues.push(ChangeFileIssue {
                    line_number: row.line_number,
                    issue,
                })
            };
            if row.fields.len() < expected {
                report(ChangeIssue::TooFewColumns {
                    expected,
                    found: row.fields.len(),
                });
                continue;
            }
            if file.header.kind == UpdateKind::Addition {
                match CategoryId::parse(row.field(0)) {
                    Ok(id) if self.store().contains_category(id) => {}
                    Ok(id) => report(ChangeIssue::UnknownCategory(id)),
                    Err(_) => report(ChangeIssue::InvalidCategory(row.field(0).to_string())),
                }
                let marker = row.field(2).trim();
                if !marker.is_empty() && marker != ADD_MARKER && marker != REMOVE_MARKER {
                    report(ChangeIssue::UnknownMarker(marker.to_string()));
                }
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(LiwcError::InvalidChangeFile(issues))
        }
    }

    fn apply_addition_row(&mut self, row: &Row, report: &mut UpdateReport) -> Result<()> {
        let id = CategoryId::parse(row.field(0))?;
        let marker = row.field(2).trim();
        if !marker.is_empty() {
            *report.markers.entry(marker.to_string()).or_default() += 1;
        }

        let Some(word) = single_word(row.field(1)) else {
            report.split_words += 1;
            return Ok(());
        };
        if marker == REMOVE_MARKER {
            self.store_mut().drop_word(id, &word)?;
            report.removals += 1;
        } else {
            self.store_mut().add_word(id, word)?;
            report.additions += 1;
        }
        Ok(())
    }

    fn apply_translation_row(
        &mut self,
        row: &Row,
        categories: &[CategoryId],
        report: &mut UpdateReport,
    ) -> Result<()> {
        let marker = row.field(3).trim();
        let (words, remove) = if marker.contains('#') {
            *report.markers.entry(marker.to_string()).or_default() += 1;
            match marker {
                ADD_MARKER => (&row.fields[4..], false),
                REMOVE_MARKER => (&row.fields[4..], true),
                _ => return Ok(()),
            }
        } else {
            (&row.fields[3..], false)
        };

        for raw in words.iter().filter(|raw| !raw.trim().is_empty()) {
            let Some(word) = single_word(raw) else {
                report.split_words += 1;
                continue;
            };
            for &id in categories {
                if remove {
                    self.store_mut().drop_word(id, &word)?;
                    report.removals += 1;
                } else {
                    self.store_mut().add_word(id, word.clone())?;
                    report.additions += 1;
                }
            }
        }
        Ok(())
    }
}
