//! Old-to-new category mappings read from a matching file.
//!
//! A matching file is `;`-delimited. Its first row names the old and new
//! schema in the first and third column; every other row reads
//! `old;old label;new;new label`:
//!
//! ```text
//! LIWC2007;;LIWC2015;
//! 1;Funct;1;Function words
//! 12;Posemo;31;Posemo
//! ;;40;Netspeak
//! 22;Swear;;
//! ```
//!
//! An empty old id declares a new category without counterpart, an empty new
//! id retires an old category. Many rows may share ids on either side.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::config::ChangeFileConfig;
use crate::dictionary::{CategoryId, Dictionary};
use crate::error::{LiwcError, Result};
use crate::util::delimited;

/// Many-to-many correspondence between two category schemas.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchemaMatcher {
    name: String,
    old_schema: String,
    new_schema: String,
    /// Old category to its new counterparts; empty when retired.
    old_to_new: BTreeMap<CategoryId, Vec<CategoryId>>,
    /// New category to its old counterparts; empty when new.
    new_to_old: BTreeMap<CategoryId, Vec<CategoryId>>,
    new_labels: BTreeMap<CategoryId, String>,
}

impl SchemaMatcher {
    /// Parse matching-file text.
    pub fn parse<S: Into<String>>(name: S, text: &str) -> Result<Self> {
        Self::parse_with(name, text, &ChangeFileConfig::default())
    }

    /// Parse matching-file text with a custom delimiter.
    pub fn parse_with<S: Into<String>>(
        name: S,
        text: &str,
        config: &ChangeFileConfig,
    ) -> Result<Self> {
        let mut rows = delimited::read_rows(text, config)?.into_iter();
        let header = rows
            .next()
            .ok_or_else(|| LiwcError::schema_header("matching file is empty"))?;

        let mut matcher = SchemaMatcher {
            name: name.into(),
            old_schema: header.field(0).trim().to_string(),
            new_schema: header.field(2).trim().to_string(),
            ..Default::default()
        };

        for row in rows.filter(|row| !row.is_blank()) {
            let old = row.field(0).trim();
            let new = row.field(2).trim();
            match (old.is_empty(), new.is_empty()) {
                (true, true) => {
                    debug!("Skipping matching row {} without ids", row.line_number);
                }
                (true, false) => {
                    matcher.add_category(CategoryId::parse(new)?, row.field(3).trim());
                }
                (false, true) => {
                    matcher.old_to_new.entry(CategoryId::parse(old)?).or_default();
                }
                (false, false) => {
                    let (old, new) = (CategoryId::parse(old)?, CategoryId::parse(new)?);
                    matcher
                        .new_labels
                        .insert(new, row.field(3).trim().to_string());
                    matcher.old_to_new.entry(old).or_default().push(new);
                    matcher.new_to_old.entry(new).or_default().push(old);
                }
            }
        }

        info!(
            "Read matching file {}: {} old and {} new categories",
            matcher.name,
            matcher.old_to_new.len(),
            matcher.new_to_old.len()
        );
        Ok(matcher)
    }

    /// Read a matching file.
    pub fn load<P: AsRef<Path>>(path: P, config: &ChangeFileConfig) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Self::parse_with(path.display().to_string(), &text, config)
    }

    /// Register a new category without an old counterpart.
    pub fn add_category<S: Into<String>>(&mut self, id: CategoryId, label: S) {
        self.new_labels.insert(id, label.into());
        self.new_to_old.entry(id).or_default();
    }

    /// Source name of the matching file.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the old schema.
    pub fn old_schema(&self) -> &str {
        &self.old_schema
    }

    /// Name of the new schema.
    pub fn new_schema(&self) -> &str {
        &self.new_schema
    }

    /// New counterparts of an old category; empty when retired or unlisted.
    pub fn new_counterparts(&self, old: CategoryId) -> &[CategoryId] {
        self.old_to_new.get(&old).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Old counterparts of a new category; empty for new categories.
    pub fn old_counterparts(&self, new: CategoryId) -> &[CategoryId] {
        self.new_to_old.get(&new).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every new category with its label, in id order.
    pub fn new_categories(&self) -> impl Iterator<Item = (CategoryId, &str)> + '_ {
        self.new_to_old.keys().map(|&id| {
            let label = self.new_labels.get(&id).map(String::as_str).unwrap_or("");
            (id, label)
        })
    }

    /// Build a dictionary in the new schema from one in the old schema.
    ///
    /// Every new category is created, then each old category with at least one
    /// counterpart has all of its words copied into every counterpart.
    pub fn convert(&self, old: &Dictionary) -> Result<Dictionary> {
        let mut converted = Dictionary::new();
        for (id, label) in self.new_categories() {
            converted.add_category(id, label);
        }

        for (id, category) in old.store().iter() {
            let counterparts = self.new_counterparts(id);
            if counterparts.is_empty() {
                debug!("Category {id} ({}) has no counterpart", category.label);
                continue;
            }
            for &target in counterparts {
                converted.store_mut().union_words(target, &category.words)?;
            }
        }
        converted.restore_word_set();

        info!(
            "Converted {} from {} to {}: {} words in {} categories",
            old.name(),
            self.old_schema,
            self.new_schema,
            converted.word_set().len(),
            converted.store().len()
        );
        Ok(converted)
    }
}
