//! Output formatting for CLI commands.

use std::collections::BTreeMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::analysis::{CountReport, WordFrequency};
use crate::cli::args::{LiwcArgs, OutputFormat};
use crate::error::Result;

/// Dictionary statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct DictionaryStats {
    pub name: String,
    pub categories: usize,
    pub words: usize,
    pub wildcard_entries: usize,
    pub unhandled_lines: usize,
    pub category_sizes: Option<BTreeMap<String, usize>>,
}

/// Categories firing for a token.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenMatch {
    pub token: String,
    pub categories: Vec<String>,
}

/// Result structure for token matching.
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchResults {
    pub matches: Vec<TokenMatch>,
}

/// A hierarchy relation with labels.
#[derive(Debug, Serialize, Deserialize)]
pub struct HierarchyEntry {
    pub child: String,
    pub parent: String,
}

/// Result structure for hierarchy inspection.
#[derive(Debug, Serialize, Deserialize)]
pub struct HierarchyResults {
    pub hierarchies: Vec<HierarchyEntry>,
    pub extra_hierarchical_words: Option<BTreeMap<String, Vec<String>>>,
}

/// Count results of one or more files.
#[derive(Debug, Serialize, Deserialize)]
pub struct CountResults {
    pub source: String,
    pub report: CountReport,
    pub frequent_words: Option<BTreeMap<String, Vec<WordFrequency>>>,
}

/// Per-category frequency tables written to a directory.
#[derive(Debug, Serialize, Deserialize)]
pub struct FrequencyTablesWritten {
    pub output: String,
    pub files: usize,
    pub tables: usize,
}

/// Result structure for commands that write a dictionary.
#[derive(Debug, Serialize, Deserialize)]
pub struct DictionaryWritten<T> {
    pub output: String,
    pub categories: usize,
    pub words: usize,
    pub details: T,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &LiwcArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output a report that renders itself for humans.
pub fn output_report<T: Serialize + Display>(result: &T, args: &LiwcArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            println!("{result}");
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &LiwcArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    print_human_value(&value, 0);
    Ok(())
}

fn print_human_value(value: &serde_json::Value, indent: usize) {
    let pad = "  ".repeat(indent);
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                match val {
                    serde_json::Value::Object(inner) if !inner.is_empty() => {
                        println!("{pad}{key}:");
                        print_human_value(val, indent + 1);
                    }
                    serde_json::Value::Array(items)
                        if items.iter().any(serde_json::Value::is_object) =>
                    {
                        println!("{pad}{key}:");
                        for item in items {
                            print_human_value(item, indent + 1);
                            println!();
                        }
                    }
                    serde_json::Value::Null => {}
                    _ => println!("{pad}{key}: {}", format_value(val)),
                }
            }
        }
        _ => println!("{pad}{}", format_value(value)),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &LiwcArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        serde_json::Value::Object(_) => "[object]".to_string(),
        serde_json::Value::Null => "null".to_string(),
    }
}
