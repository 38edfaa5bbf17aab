//! Reading `;`-delimited, `"`-quoted tables.

use csv::ReaderBuilder;

use crate::config::ChangeFileConfig;
use crate::error::Result;

/// One record of a delimited file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    /// 1-based line number where the record starts.
    pub line_number: u64,
    /// Raw field values.
    pub fields: Vec<String>,
}

impl Row {
    /// Field at `index`, empty when the record is shorter.
    pub fn field(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }

    /// Whether every field is empty.
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|f| f.trim().is_empty())
    }
}

/// Read every record, header included. Records may have differing lengths.
pub fn read_rows(text: &str, config: &ChangeFileConfig) -> Result<Vec<Row>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(config.delimiter as u8)
        .quote(config.quote as u8)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line_number = record.position().map(|p| p.line()).unwrap_or(0);
        rows.push(Row {
            line_number,
            fields: record.iter().map(str::to_string).collect(),
        });
    }
    Ok(rows)
}
