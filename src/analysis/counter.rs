//! Scoring texts against a dictionary.
//!
//! Every token is looked up through the dictionary's match engine and counted
//! once for each category label it fires. Per-label word frequencies are kept
//! alongside the totals, so the most frequent words of each category can be
//! tabulated afterwards.
//!
//! ```
//! use std::sync::Arc;
//!
//! use liwc_tools::analysis::{CategoryCounter, ContractionTokenizer};
//! use liwc_tools::dictionary::Dictionary;
//!
//! let dictionary = Dictionary::parse("%\n1\tPronoun\n2\tPosemo\n%\ni\t1\nhapp*\t2\n");
//! let counter = CategoryCounter::new(&dictionary, Arc::new(ContractionTokenizer::new().unwrap()));
//!
//! let report = counter.count_text("I am happy, I am.").unwrap();
//! assert_eq!(report.word_count, 5);
//! assert_eq!(report.category_count("Pronoun"), 2);
//! assert_eq!(report.category_count("Posemo"), 1);
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ahash::AHashMap;
use csv::WriterBuilder;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::analysis::tokenizer::Tokenizer;
use crate::config::ChangeFileConfig;
use crate::dictionary::{Dictionary, MatchEngine};
use crate::error::{LiwcError, Result};
use crate::util::read_rows;

/// Counts dictionary categories in texts.
pub struct CategoryCounter<'a> {
    dictionary: &'a Dictionary,
    tokenizer: Arc<dyn Tokenizer>,
}

impl<'a> CategoryCounter<'a> {
    /// Create a counter over a dictionary.
    pub fn new(dictionary: &'a Dictionary, tokenizer: Arc<dyn Tokenizer>) -> Self {
        CategoryCounter {
            dictionary,
            tokenizer,
        }
    }

    /// An empty report listing every category of the dictionary.
    pub fn empty_report(&self) -> CountReport {
        let mut report = CountReport::default();
        for (_, category) in self.dictionary.store().iter() {
            report.category_counts.insert(category.label.clone(), 0);
            report.category_words.entry(category.label.clone()).or_default();
        }
        report
    }

    /// Score a single text.
    pub fn count_text(&self, text: &str) -> Result<CountReport> {
        let mut frequencies: AHashMap<String, usize> = AHashMap::new();
        let mut word_count = 0;
        for token in self.tokenizer.tokenize(text)? {
            *frequencies.entry(token.normalized()).or_insert(0) += 1;
            word_count += 1;
        }

        let engine = MatchEngine::new(self.dictionary.store());
        let mut report = self.empty_report();
        report.word_count = word_count;

        for (word, count) in frequencies {
            let labels: BTreeSet<&str> = engine
                .categories_for_token(&word)
                .into_iter()
                .filter_map(|id| self.dictionary.store().description(id).ok())
                .collect();
            for label in labels {
                report.add(label, &word, count);
            }
        }

        debug!(
            "Counted {} words with {}",
            report.word_count,
            self.tokenizer.name()
        );
        Ok(report)
    }

    /// Score several texts into one report.
    pub fn count_texts<I, S>(&self, texts: I) -> Result<CountReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = self.empty_report();
        for text in texts {
            report.merge(&self.count_text(text.as_ref())?);
        }
        Ok(report)
    }
}

/// A word and how often it fired a category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordFrequency {
    pub word: String,
    pub count: usize,
    /// Share of the category's total, in 0..=1.
    pub relative: f64,
}

/// Category counts of one or more texts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountReport {
    /// Number of tokens (`WC`).
    pub word_count: usize,

    /// Hits per category label.
    pub category_counts: BTreeMap<String, usize>,

    /// Hits per word, per category label.
    pub category_words: BTreeMap<String, BTreeMap<String, usize>>,
}

impl CountReport {
    fn add(&mut self, label: &str, word: &str, count: usize) {
        *self.category_counts.entry(label.to_string()).or_default() += count;
        *self
            .category_words
            .entry(label.to_string())
            .or_default()
            .entry(word.to_string())
            .or_default() += count;
    }

    /// Hits of a category label.
    pub fn category_count(&self, label: &str) -> usize {
        self.category_counts.get(label).copied().unwrap_or(0)
    }

    /// Hits of a category label as a percentage of the word count.
    pub fn percentage(&self, label: &str) -> f64 {
        if self.word_count == 0 {
            return 0.0;
        }
        100.0 * self.category_count(label) as f64 / self.word_count as f64
    }

    /// Add another report into this one.
    pub fn merge(&mut self, other: &CountReport) {
        self.word_count += other.word_count;
        for (label, count) in &other.category_counts {
            *self.category_counts.entry(label.clone()).or_default() += count;
        }
        for (label, words) in &other.category_words {
            let target = self.category_words.entry(label.clone()).or_default();
            for (word, count) in words {
                *target.entry(word.clone()).or_default() += count;
            }
        }
    }

    /// Per label, the words whose share of the label's hits exceeds `threshold`.
    ///
    /// Words are listed alphabetically; labels without hits map to an empty list.
    pub fn frequent_words(&self, threshold: f64) -> BTreeMap<String, Vec<WordFrequency>> {
        self.category_words
            .iter()
            .map(|(label, words)| {
                let total: usize = words.values().sum();
                let frequent = words
                    .iter()
                    .filter_map(|(word, &count)| {
                        let relative = count as f64 / total as f64;
                        (relative > threshold).then(|| WordFrequency {
                            word: word.clone(),
                            count,
                            relative,
                        })
                    })
                    .collect();
                (label.clone(), frequent)
            })
            .collect()
    }
}

/// Row that sums the infrequent words of a category.
pub const REST_ROW: &str = "rest";

/// Word frequencies of one category, one value per file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryFrequencies {
    /// Raw frequencies of the kept words, plus [`REST_ROW`] when anything was folded.
    pub absolute: BTreeMap<String, Vec<f64>>,

    /// Share of the category's total in each file, kept words only.
    pub relative: BTreeMap<String, Vec<f64>>,
}

/// Per-category breakdown of a word-by-file frequency table.
///
/// The input is tab-separated: a header naming the files, then one row per
/// word with its frequency in each file. An optional corner cell before the
/// file names is ignored. Every word is assigned to the categories it matches,
/// wildcards included, so a word may show up under several labels.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencyTable {
    pub files: Vec<String>,
    pub categories: BTreeMap<String, CategoryFrequencies>,
}

impl FrequencyTable {
    /// Build the table from tab-separated text.
    ///
    /// Words whose share of their category stays below `rest_share` in every
    /// file are summed into [`REST_ROW`].
    pub fn from_word_table(dictionary: &Dictionary, text: &str, rest_share: f64) -> Result<Self> {
        let format = ChangeFileConfig {
            delimiter: '\t',
            quote: '"',
        };
        let mut rows = read_rows(text, &format)?.into_iter().filter(|row| !row.is_blank());
        let Some(header) = rows.next() else {
            return Err(LiwcError::analysis("frequency table is empty"));
        };

        let mut files = header.fields;
        let mut raw: BTreeMap<String, BTreeMap<String, Vec<f64>>> = dictionary
            .store()
            .iter()
            .map(|(_, category)| (category.label.clone(), BTreeMap::new()))
            .collect();

        let mut first = true;
        for row in rows {
            let word = row.field(0).trim().to_string();
            let values = row.fields[1..]
                .iter()
                .map(|value| parse_frequency(value, row.line_number))
                .collect::<Result<Vec<_>>>()?;
            if first && values.len() + 1 == files.len() {
                files.remove(0);
            }
            first = false;
            if values.len() != files.len() {
                return Err(LiwcError::analysis(format!(
                    "line {}: expected {} frequencies, found {}",
                    row.line_number,
                    files.len(),
                    values.len()
                )));
            }

            for id in dictionary.categories_for_token(&word) {
                let label = dictionary.store().description(id)?;
                raw.entry(label.to_string())
                    .or_default()
                    .insert(word.clone(), values.clone());
            }
        }

        let categories = raw
            .into_iter()
            .map(|(label, words)| (label, fold_rare_words(words, files.len(), rest_share)))
            .collect();
        Ok(FrequencyTable { files, categories })
    }

    /// Read a table file. Files that are not UTF-8 are read as Latin-1.
    pub fn load<P: AsRef<Path>>(dictionary: &Dictionary, path: P, rest_share: f64) -> Result<Self> {
        let bytes = fs::read(path)?;
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => err.into_bytes().iter().map(|&b| char::from(b)).collect(),
        };
        Self::from_word_table(dictionary, &text, rest_share)
    }

    /// Write `<label>.csv` and `<label>rel.csv` for every category into `dir`.
    ///
    /// Decimals are written with a comma.
    pub fn write_csv<P: AsRef<Path>>(
        &self,
        dir: P,
        config: &ChangeFileConfig,
    ) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let mut written = Vec::new();
        for (label, frequencies) in &self.categories {
            let stem = label.replace(['/', '\\'], "_");
            for (suffix, rows) in [("", &frequencies.absolute), ("rel", &frequencies.relative)] {
                let path = dir.join(format!("{stem}{suffix}.csv"));
                let mut writer = WriterBuilder::new()
                    .delimiter(config.delimiter as u8)
                    .quote(config.quote as u8)
                    .from_path(&path)?;
                let header = std::iter::once("word").chain(self.files.iter().map(String::as_str));
                writer.write_record(header)?;
                for (word, values) in rows {
                    let mut record = vec![word.clone()];
                    record.extend(values.iter().map(|v| v.to_string().replace('.', ",")));
                    writer.write_record(&record)?;
                }
                writer.flush()?;
                written.push(path);
            }
        }
        info!("Wrote {} frequency tables to {}", written.len(), dir.display());
        Ok(written)
    }
}

fn parse_frequency(value: &str, line_number: u64) -> Result<f64> {
    value.trim().replace(',', ".").parse().map_err(|_| {
        LiwcError::analysis(format!("line {line_number}: '{value}' is not a frequency"))
    })
}

fn fold_rare_words(
    words: BTreeMap<String, Vec<f64>>,
    file_count: usize,
    rest_share: f64,
) -> CategoryFrequencies {
    let mut sums = vec![0.0; file_count];
    for values in words.values() {
        for (sum, value) in sums.iter_mut().zip(values) {
            *sum += value;
        }
    }

    let mut frequencies = CategoryFrequencies::default();
    let mut rest = vec![0.0; file_count];
    for (word, values) in words {
        let shares: Vec<f64> = values
            .iter()
            .zip(&sums)
            .map(|(&value, &sum)| if sum > 0.0 { value / sum } else { 0.0 })
            .collect();
        if shares.iter().all(|&share| share < rest_share) {
            for (total, value) in rest.iter_mut().zip(&values) {
                *total += value;
            }
        } else {
            frequencies.relative.insert(word.clone(), shares);
            frequencies.absolute.insert(word, values);
        }
    }
    if rest.iter().any(|&value| value > 0.0) {
        frequencies.absolute.insert(REST_ROW.to_string(), rest);
    }
    frequencies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tokenizer::ContractionTokenizer;

    fn dictionary() -> Dictionary {
        Dictionary::parse(
            "%\n1\tPronoun\n2\tPosemo\n3\tNegate\n%\ni\t1\nwe\t1\nhapp*\t2\nhappy\t2\ndon't\t3\nnot\t3\n",
        )
    }

    fn counter(dictionary: &Dictionary) -> CategoryCounter<'_> {
        CategoryCounter::new(dictionary, Arc::new(ContractionTokenizer::new().unwrap()))
    }

    #[test]
    fn test_count_text() {
        let dictionary = dictionary();
        let report = counter(&dictionary)
            .count_text("We don't feel happy. I'm not happier!")
            .unwrap();

        assert_eq!(report.word_count, 7);
        assert_eq!(report.category_count("Pronoun"), 1);
        assert_eq!(report.category_count("Posemo"), 2);
        assert_eq!(report.category_count("Negate"), 2);
        assert_eq!(report.category_words["Posemo"]["happier"], 1);
        assert!((report.percentage("Posemo") - 200.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_categories_are_listed() {
        let dictionary = dictionary();
        let report = counter(&dictionary).count_text("").unwrap();

        assert_eq!(report.word_count, 0);
        assert_eq!(report.category_counts.len(), 3);
        assert_eq!(report.percentage("Pronoun"), 0.0);
    }

    #[test]
    fn test_merge_across_texts() {
        let dictionary = dictionary();
        let report = counter(&dictionary)
            .count_texts(["we we", "happy we"])
            .unwrap();

        assert_eq!(report.word_count, 4);
        assert_eq!(report.category_words["Pronoun"]["we"], 3);
        assert_eq!(report.category_count("Posemo"), 1);
    }

    #[test]
    fn test_frequent_words() {
        let mut report = CountReport::default();
        for _ in 0..98 {
            report.add("Posemo", "happy", 1);
        }
        report.add("Posemo", "glad", 2);
        report.add("Posemo", "joy", 1);

        let frequent = report.frequent_words(0.015);
        let words: Vec<&str> = frequent["Posemo"].iter().map(|f| f.word.as_str()).collect();

        // 1/101 falls below the threshold, 2/101 does not.
        assert_eq!(words, vec!["glad", "happy"]);
        assert_eq!(frequent["Posemo"][1].count, 98);
    }

    fn stylo_table() -> String {
        let mut table = String::from("\"a.txt\"\t\"b.txt\"\n");
        table.push_str("\"happy\"\t60\t10\n");
        table.push_str("\"happier\"\t39\t0\n");
        table.push_str("\"happiest\"\t1\t0\n");
        table.push_str("\"we\"\t5\t5\n");
        table.push_str("\"table\"\t7\t7\n");
        table
    }

    #[test]
    fn test_frequency_table_rest_row() {
        let dictionary = dictionary();
        let table = FrequencyTable::from_word_table(&dictionary, &stylo_table(), 0.02).unwrap();

        assert_eq!(table.files, vec!["a.txt", "b.txt"]);
        let posemo = &table.categories["Posemo"];
        // happiest is 1% of Posemo in a.txt and 0% in b.txt.
        assert_eq!(
            posemo.absolute.keys().collect::<Vec<_>>(),
            vec!["happier", "happy", "rest"]
        );
        assert_eq!(posemo.absolute[REST_ROW], vec![1.0, 0.0]);
        assert!(!posemo.relative.contains_key(REST_ROW));
        assert_eq!(posemo.relative["happy"], vec![0.6, 1.0]);
        assert_eq!(posemo.relative["happier"], vec![0.39, 0.0]);

        assert_eq!(table.categories["Pronoun"].relative["we"], vec![1.0, 1.0]);
        assert!(!table.categories["Pronoun"].absolute.contains_key(REST_ROW));
        assert!(table.categories["Negate"].absolute.is_empty());
    }

    #[test]
    fn test_frequency_table_corner_cell_and_errors() {
        let dictionary = dictionary();
        let table =
            FrequencyTable::from_word_table(&dictionary, "word\tx\nwe\t2\n", 0.02).unwrap();
        assert_eq!(table.files, vec!["x"]);
        assert_eq!(table.categories["Pronoun"].absolute["we"], vec![2.0]);

        for bad in ["x\ty\nwe\tmany\t1\n", "x\ty\nwe\t1\t2\t3\t4\n", ""] {
            assert!(FrequencyTable::from_word_table(&dictionary, bad, 0.02).is_err());
        }
    }

    #[test]
    fn test_frequency_table_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        let dictionary = dictionary();
        let table = FrequencyTable::from_word_table(&dictionary, &stylo_table(), 0.02).unwrap();

        let written = table
            .write_csv(dir.path().join("freq"), &ChangeFileConfig::default())
            .unwrap();
        assert_eq!(written.len(), 6);

        let posemo = fs::read_to_string(dir.path().join("freq/Posemo.csv")).unwrap();
        assert_eq!(
            posemo,
            "word;a.txt;b.txt\nhappier;39;0\nhappy;60;10\nrest;1;0\n"
        );
        let relative = fs::read_to_string(dir.path().join("freq/Posemorel.csv")).unwrap();
        assert!(relative.contains("happy;0,6;1\n"));
    }
}
