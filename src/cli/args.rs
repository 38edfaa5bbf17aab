//! Command line argument parsing for the liwc CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// liwc - maintain and apply LIWC-style word-category dictionaries
#[derive(Parser, Debug, Clone)]
#[command(name = "liwc")]
#[command(about = "Maintain and apply LIWC-style word-category dictionaries")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct LiwcArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "LIWC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl LiwcArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show dictionary statistics
    Stats(StatsArgs),

    /// Compare two dictionaries
    Compare(CompareArgs),

    /// Show the categories matching tokens
    Match(MatchArgs),

    /// Count categories in text files
    Count(CountArgs),

    /// Split a word-by-file frequency table by category
    Freq(FreqArgs),

    /// Show inferred category hierarchies
    Hierarchy(HierarchyArgs),

    /// Write a dictionary with only some categories
    Subset(SubsetArgs),

    /// Replace wildcard entries by the corpus words they match
    Expand(ExpandArgs),

    /// Apply an edit script
    Edit(EditArgs),

    /// Apply a change file
    Update(UpdateArgs),

    /// Extract overlapping wildcard entries for review
    #[command(name = "dedup-prepare")]
    DedupPrepare(DedupPrepareArgs),

    /// Put reviewed entries back into a dictionary
    #[command(name = "dedup-reintegrate")]
    DedupReintegrate(DedupReintegrateArgs),

    /// Convert a dictionary to a new category schema
    Convert(ConvertArgs),

    /// Copy child words into parent categories
    Complete(CompleteArgs),
}

/// Arguments for dictionary statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Dictionary file
    #[arg(value_name = "DICTIONARY")]
    pub dictionary: PathBuf,

    /// Include per-category word counts
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for comparing dictionaries
#[derive(Parser, Debug, Clone)]
pub struct CompareArgs {
    /// Old dictionary file
    #[arg(value_name = "OLD")]
    pub old: PathBuf,

    /// New dictionary file
    #[arg(value_name = "NEW")]
    pub new: PathBuf,
}

/// Arguments for matching tokens
#[derive(Parser, Debug, Clone)]
pub struct MatchArgs {
    /// Dictionary file
    #[arg(value_name = "DICTIONARY")]
    pub dictionary: PathBuf,

    /// Tokens to look up
    #[arg(value_name = "TOKEN", required = true)]
    pub tokens: Vec<String>,
}

/// Arguments for counting categories
#[derive(Parser, Debug, Clone)]
pub struct CountArgs {
    /// Dictionary file
    #[arg(value_name = "DICTIONARY")]
    pub dictionary: PathBuf,

    /// Text files to score
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Report one result per file instead of a merged total
    #[arg(long)]
    pub per_file: bool,

    /// Include the most frequent words of each category
    #[arg(long)]
    pub frequent_words: bool,

    /// Minimum relative frequency for frequent words (overrides config)
    #[arg(long)]
    pub min_relative_frequency: Option<f64>,
}

/// Arguments for showing hierarchies
#[derive(Parser, Debug, Clone)]
pub struct HierarchyArgs {
    /// Dictionary file
    #[arg(value_name = "DICTIONARY")]
    pub dictionary: PathBuf,

    /// Include extra-hierarchical words of parent categories
    #[arg(long)]
    pub extra_words: bool,
}

/// Arguments for per-category frequency tables
#[derive(Parser, Debug, Clone)]
pub struct FreqArgs {
    /// Dictionary file
    #[arg(value_name = "DICTIONARY")]
    pub dictionary: PathBuf,

    /// Tab-separated table of word frequencies per file
    #[arg(value_name = "TABLE")]
    pub table: PathBuf,

    /// Directory receiving one CSV file per category (must not exist)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output: PathBuf,

    /// Share under which a word is summed into the rest row (overrides config)
    #[arg(long)]
    pub rest_share: Option<f64>,
}

/// Arguments for subsetting a dictionary
#[derive(Parser, Debug, Clone)]
pub struct SubsetArgs {
    /// Dictionary file
    #[arg(value_name = "DICTIONARY")]
    pub dictionary: PathBuf,

    /// Output dictionary file (must not exist)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Categories to keep (comma-separated)
    #[arg(short = 'C', long, value_delimiter = ',', required = true)]
    pub categories: Vec<String>,
}

/// Arguments for wildcard expansion
#[derive(Parser, Debug, Clone)]
pub struct ExpandArgs {
    /// Dictionary file
    #[arg(value_name = "DICTIONARY")]
    pub dictionary: PathBuf,

    /// Corpus file whose words replace the wildcards
    #[arg(value_name = "CORPUS")]
    pub corpus: PathBuf,

    /// Output dictionary file (must not exist)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,
}

/// Arguments for applying an edit script
#[derive(Parser, Debug, Clone)]
pub struct EditArgs {
    /// Dictionary file
    #[arg(value_name = "DICTIONARY")]
    pub dictionary: PathBuf,

    /// Edit script (tab-separated add/del lines)
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Output dictionary file (must not exist)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,
}

/// Arguments for applying a change file
#[derive(Parser, Debug, Clone)]
pub struct UpdateArgs {
    /// Dictionary file
    #[arg(value_name = "DICTIONARY")]
    pub dictionary: PathBuf,

    /// Change file (translation or addition file)
    #[arg(value_name = "CHANGE_FILE")]
    pub change_file: PathBuf,

    /// Output dictionary file (must not exist)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Model dictionary for hierarchies (default: the dictionary itself)
    #[arg(short, long)]
    pub model: Option<PathBuf>,
}

/// Arguments for extracting overlapping entries
#[derive(Parser, Debug, Clone)]
pub struct DedupPrepareArgs {
    /// Dictionary file
    #[arg(value_name = "DICTIONARY")]
    pub dictionary: PathBuf,

    /// Review file to write (must not exist)
    #[arg(value_name = "REVIEW_FILE")]
    pub review_file: PathBuf,

    /// Output dictionary without the extracted entries (must not exist)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,
}

/// Arguments for reintegrating reviewed entries
#[derive(Parser, Debug, Clone)]
pub struct DedupReintegrateArgs {
    /// Dictionary file written by dedup-prepare
    #[arg(value_name = "DICTIONARY")]
    pub dictionary: PathBuf,

    /// Curated review file
    #[arg(value_name = "REVIEW_FILE")]
    pub review_file: PathBuf,

    /// Output dictionary file (must not exist)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,
}

/// Arguments for schema conversion
#[derive(Parser, Debug, Clone)]
pub struct ConvertArgs {
    /// Dictionary in the old schema
    #[arg(value_name = "DICTIONARY")]
    pub dictionary: PathBuf,

    /// Matching file (old;old label;new;new label)
    #[arg(value_name = "MATCHING_FILE")]
    pub matching_file: PathBuf,

    /// Output dictionary file (must not exist)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Report how words moved between the old and converted dictionary
    #[arg(long)]
    pub audit: bool,
}

/// Arguments for hierarchy completion
#[derive(Parser, Debug, Clone)]
pub struct CompleteArgs {
    /// Dictionary file
    #[arg(value_name = "DICTIONARY")]
    pub dictionary: PathBuf,

    /// Output dictionary file (must not exist)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Model dictionary for hierarchies (default: the dictionary itself)
    #[arg(short, long)]
    pub model: Option<PathBuf>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
