//! Configuration for dictionary tooling.
//!
//! Every section has a `Default` matching the file formats in circulation, so
//! a configuration file only needs the values it changes:
//!
//! ```
//! use liwc_tools::config::LiwcConfig;
//!
//! let config = LiwcConfig::from_json(r#"{ "report": { "min_relative_frequency": 0.05 } }"#).unwrap();
//! assert_eq!(config.report.min_relative_frequency, 0.05);
//! assert_eq!(config.change_file.delimiter, ';');
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LiwcError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiwcConfig {
    /// Tokenizer used when scoring texts.
    pub tokenizer: TokenizerConfig,

    /// Delimited files: change files and schema matching files.
    pub change_file: ChangeFileConfig,

    /// Frequency report thresholds.
    pub report: ReportConfig,
}

impl LiwcConfig {
    /// Parse a JSON configuration.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: LiwcConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if !self.change_file.delimiter.is_ascii() || !self.change_file.quote.is_ascii() {
            return Err(LiwcError::invalid_config(
                "change file delimiter and quote must be ASCII characters",
            ));
        }
        if !(0.0..=1.0).contains(&self.report.min_relative_frequency) {
            return Err(LiwcError::invalid_config(format!(
                "min_relative_frequency must be within 0..=1, got {}",
                self.report.min_relative_frequency
            )));
        }
        if !(0.0..=1.0).contains(&self.report.rest_share) {
            return Err(LiwcError::invalid_config(format!(
                "rest_share must be within 0..=1, got {}",
                self.report.rest_share
            )));
        }
        Ok(())
    }
}

/// Tokenizer settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Custom token pattern. If None, uses the contraction-aware default.
    pub pattern: Option<String>,
}

/// Settings for `;`-delimited change and matching files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeFileConfig {
    /// Field delimiter.
    pub delimiter: char,

    /// Quote character.
    pub quote: char,
}

impl Default for ChangeFileConfig {
    fn default() -> Self {
        Self {
            delimiter: ';',
            quote: '"',
        }
    }
}

/// Settings for per-category frequency tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Words at or below this share of their category's total are left out.
    pub min_relative_frequency: f64,

    /// In word-by-file tables, words under this share of their category in
    /// every file are summed into the `rest` row.
    pub rest_share: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            min_relative_frequency: 0.015,
            rest_share: 0.02,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LiwcConfig::default();
        assert_eq!(config.change_file.delimiter, ';');
        assert_eq!(config.change_file.quote, '"');
        assert_eq!(config.report.min_relative_frequency, 0.015);
        assert_eq!(config.report.rest_share, 0.02);
        assert!(config.tokenizer.pattern.is_none());
    }

    #[test]
    fn test_partial_json() {
        let config = LiwcConfig::from_json(r#"{ "change_file": { "delimiter": "," } }"#).unwrap();
        assert_eq!(config.change_file.delimiter, ',');
        assert_eq!(config.change_file.quote, '"');
    }

    #[test]
    fn test_validation() {
        assert!(LiwcConfig::from_json(r#"{ "report": { "min_relative_frequency": 2.0 } }"#).is_err());
        assert!(LiwcConfig::from_json(r#"{ "change_file": { "delimiter": "§" } }"#).is_err());
        assert!(LiwcConfig::from_json(r#"{ "report": { "rest_share": -0.1 } }"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("liwc.json");
        std::fs::write(&path, r#"{ "tokenizer": { "pattern": "\\w+" } }"#).unwrap();

        let config = LiwcConfig::load(&path).unwrap();
        assert_eq!(config.tokenizer.pattern.as_deref(), Some("\\w+"));
    }
}
