//! Reading and writing the two-section dictionary text format.
//!
//! ```text
//! %
//! 1	Pronoun
//! 2	Funct
//! %
//! i	1	2
//! we	1
//! happ*	3
//! ```
//!
//! The first section declares categories (`id`, label), the second lists one
//! entry per line followed by the ids of the categories it belongs to. Fields
//! are tab-separated; an entry itself may contain spaces (`kind of`).
//!
//! Reading never fails on content: lines the reader does not understand are
//! kept verbatim for audit and reported as [`IngestWarning`]s.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dictionary::category::CategoryId;
use crate::dictionary::store::CategoryStore;

/// Line separating the two sections.
pub const SECTION_MARKER: &str = "%";

/// Characters marking annotations the reader does not interpret.
const ANNOTATION_MARKERS: [char; 2] = ['(', '<'];

/// Why an input line was not ingested as-is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IngestIssue {
    /// The input does not start with a `%` line.
    MissingLeadingMarker,
    /// A declaration line whose first field is not a category id.
    MalformedDeclaration,
    /// A word line with `(` or `<` annotations.
    Annotated,
    /// A word line referencing text that is not a category id.
    InvalidCategory(String),
    /// A word line referencing an undeclared category.
    UndeclaredCategory(CategoryId),
    /// A word line without any category.
    NoCategories,
}

impl fmt::Display for IngestIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestIssue::MissingLeadingMarker => {
                write!(f, "not a dictionary file, missing leading '%'")
            }
            IngestIssue::MalformedDeclaration => write!(f, "malformed category declaration"),
            IngestIssue::Annotated => write!(f, "unhandled annotation"),
            IngestIssue::InvalidCategory(raw) => write!(f, "invalid category '{raw}'"),
            IngestIssue::UndeclaredCategory(id) => write!(f, "undeclared category {id}"),
            IngestIssue::NoCategories => write!(f, "entry without categories"),
        }
    }
}

/// A non-fatal problem found while reading a dictionary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestWarning {
    /// 1-based line number in the source.
    pub line_number: usize,
    /// The raw line.
    pub line: String,
    /// What was wrong with it.
    pub issue: IngestIssue,
}

impl fmt::Display for IngestWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({})", self.line_number, self.issue, self.line)
    }
}

/// Everything read from a dictionary source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IngestOutcome {
    /// Category declarations in file order.
    pub declarations: Vec<(CategoryId, String)>,
    /// Entries with their category ids in file order.
    pub entries: Vec<(String, Vec<CategoryId>)>,
    /// Word lines kept verbatim because they could not be interpreted.
    pub unhandled_lines: Vec<String>,
    /// Every recoverable problem, including those behind `unhandled_lines`.
    pub warnings: Vec<IngestWarning>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Declarations,
    Entries,
    Done,
}

/// Lowercase and trim a dictionary entry.
pub fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Parse dictionary text.
pub fn parse_dictionary(text: &str) -> IngestOutcome {
    let mut outcome = IngestOutcome::default();
    let mut declared = BTreeSet::new();
    let mut lines = text.lines().enumerate().peekable();

    let first_line = lines
        .peek()
        .map(|(index, line)| (*index, line.trim_end_matches('\r').to_string()));
    match first_line {
        None => return outcome,
        Some((_, first)) if first == SECTION_MARKER => {
            lines.next();
        }
        Some((index, first)) => {
            outcome.warnings.push(IngestWarning {
                line_number: index + 1,
                line: first,
                issue: IngestIssue::MissingLeadingMarker,
            });
        }
    }

    let mut section = Section::Declarations;
    for (index, raw) in lines {
        let line = raw.trim_end_matches('\r');
        if line == SECTION_MARKER {
            section = match section {
                Section::Declarations => Section::Entries,
                _ => Section::Done,
            };
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let warn = |outcome: &mut IngestOutcome, issue: IngestIssue| {
            outcome.warnings.push(IngestWarning {
                line_number: index + 1,
                line: line.to_string(),
                issue,
            });
        };

        match section {
            Section::Declarations => {
                let trimmed = line.trim();
                let (id_text, label) = match trimmed.find(char::is_whitespace) {
                    Some(split) => (&trimmed[..split], trimmed[split..].trim()),
                    None => (trimmed, ""),
                };
                match CategoryId::parse(id_text) {
                    Ok(id) => {
                        declared.insert(id);
                        outcome.declarations.push((id, label.to_string()));
                    }
                    Err(_) => warn(&mut outcome, IngestIssue::MalformedDeclaration),
                }
            }
            Section::Entries => {
                if line.contains(ANNOTATION_MARKERS) {
                    outcome.unhandled_lines.push(line.to_string());
                    warn(&mut outcome, IngestIssue::Annotated);
                    continue;
                }
                match parse_entry(line, &declared) {
                    Ok(entry) => outcome.entries.push(entry),
                    Err(issue) => {
                        outcome.unhandled_lines.push(line.to_string());
                        warn(&mut outcome, issue);
                    }
                }
            }
            Section::Done => {}
        }
    }

    outcome
}

fn parse_entry(
    line: &str,
    declared: &BTreeSet<CategoryId>,
) -> std::result::Result<(String, Vec<CategoryId>), IngestIssue> {
    let mut fields = line.split('\t');
    let word = normalize_word(fields.next().unwrap_or_default());

    let mut categories = Vec::new();
    for raw in fields.flat_map(str::split_whitespace) {
        let id = CategoryId::parse(raw)
            .map_err(|_| IngestIssue::InvalidCategory(raw.to_string()))?;
        if !declared.contains(&id) {
            return Err(IngestIssue::UndeclaredCategory(id));
        }
        categories.push(id);
    }

    if word.is_empty() || categories.is_empty() {
        return Err(IngestIssue::NoCategories);
    }
    Ok((word, categories))
}

/// Render a store in the dictionary text format.
///
/// Categories appear in numeric order; entries are sorted case-insensitively
/// and list their categories in numeric order.
pub fn render_dictionary(store: &CategoryStore) -> String {
    let mut out = String::new();
    out.push_str(SECTION_MARKER);
    out.push('\n');
    for (id, category) in store.iter() {
        out.push_str(&format!("{id}\t{}\n", category.label));
    }
    out.push_str(SECTION_MARKER);
    out.push('\n');

    let mut words: Vec<String> = store.all_words().into_iter().collect();
    words.sort_by_key(|w| w.to_lowercase());
    for word in words {
        out.push_str(&word);
        for id in store.categories_containing(&word) {
            out.push('\t');
            out.push_str(&id.to_string());
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "%\n1\tPronoun\n02\tFunct\n%\ni\t1\t2\nWe\t1\nkind of\t2\n";

    #[test]
    fn test_parse_sections() {
        let outcome = parse_dictionary(SAMPLE);

        assert_eq!(
            outcome.declarations,
            vec![
                (CategoryId::new(1), "Pronoun".to_string()),
                (CategoryId::new(2), "Funct".to_string())
            ]
        );
        assert_eq!(outcome.entries.len(), 3);
        assert_eq!(outcome.entries[1], ("we".to_string(), vec![CategoryId::new(1)]));
        assert_eq!(outcome.entries[2].0, "kind of");
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_annotated_lines_are_kept_for_audit() {
        let text = "%\n1\tVerb\n%\nlike\t1\n(02 like)\t1\nkind <of>\t1\n";
        let outcome = parse_dictionary(text);

        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(
            outcome.unhandled_lines,
            vec!["(02 like)\t1".to_string(), "kind <of>\t1".to_string()]
        );
        assert!(outcome.warnings.iter().all(|w| w.issue == IngestIssue::Annotated));
    }

    #[test]
    fn test_missing_marker_is_not_fatal() {
        let text = "1\tPronoun\n%\ni\t1\n";
        let outcome = parse_dictionary(text);

        assert_eq!(outcome.warnings[0].issue, IngestIssue::MissingLeadingMarker);
        assert_eq!(outcome.declarations.len(), 1);
        assert_eq!(outcome.entries.len(), 1);
    }

    #[test]
    fn test_bad_category_references() {
        let text = "%\n1\tPronoun\n%\ni\t1\nyou\t7\nthey\tx\nit\n";
        let outcome = parse_dictionary(text);

        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(outcome.unhandled_lines.len(), 3);
        let issues: Vec<_> = outcome.warnings.iter().map(|w| w.issue.clone()).collect();
        assert_eq!(
            issues,
            vec![
                IngestIssue::UndeclaredCategory(CategoryId::new(7)),
                IngestIssue::InvalidCategory("x".to_string()),
                IngestIssue::NoCategories,
            ]
        );
    }

    #[test]
    fn test_entries_stop_at_closing_marker() {
        let text = "%\n1\tA\n%\na\t1\n%\nb\t1\n";
        let outcome = parse_dictionary(text);
        assert_eq!(outcome.entries.len(), 1);
    }

    #[test]
    fn test_render_dictionary() {
        let mut store = CategoryStore::new();
        store.add_category(CategoryId::new(10), "Funct", BTreeSet::new());
        store.add_category(CategoryId::new(2), "Pronoun", BTreeSet::new());
        store.add_word(CategoryId::new(10), "i").unwrap();
        store.add_word(CategoryId::new(2), "i").unwrap();
        store.add_word(CategoryId::new(2), "we").unwrap();

        assert_eq!(
            render_dictionary(&store),
            "%\n2\tPronoun\n10\tFunct\n%\ni\t2\t10\nwe\t2\n"
        );
    }
}
