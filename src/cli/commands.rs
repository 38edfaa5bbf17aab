//! Command implementations for the liwc CLI.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::{info, warn};
use serde::Serialize;

use crate::analysis::{CategoryCounter, ContractionTokenizer, FrequencyTable, Tokenizer};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::LiwcConfig;
use crate::dictionary::matcher::is_wildcard;
use crate::dictionary::update::ChangeFile;
use crate::dictionary::{CategoryId, Dictionary};
use crate::error::{LiwcError, Result};
use crate::schema::SchemaMatcher;

/// Execute a CLI command.
pub fn execute_command(args: LiwcArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => LiwcConfig::load(path)?,
        None => LiwcConfig::default(),
    };

    match &args.command {
        Command::Stats(stats_args) => show_stats(stats_args, &args),
        Command::Compare(compare_args) => compare_dictionaries(compare_args, &args),
        Command::Match(match_args) => match_tokens(match_args, &args),
        Command::Count(count_args) => count_files(count_args, &config, &args),
        Command::Freq(freq_args) => split_frequency_table(freq_args, &config, &args),
        Command::Hierarchy(hierarchy_args) => show_hierarchies(hierarchy_args, &args),
        Command::Subset(subset_args) => subset_dictionary(subset_args, &args),
        Command::Expand(expand_args) => expand_wildcards(expand_args, &config, &args),
        Command::Edit(edit_args) => apply_edit_script(edit_args, &args),
        Command::Update(update_args) => apply_change_file(update_args, &config, &args),
        Command::DedupPrepare(dedup_args) => dedup_prepare(dedup_args, &args),
        Command::DedupReintegrate(dedup_args) => dedup_reintegrate(dedup_args, &args),
        Command::Convert(convert_args) => convert_dictionary(convert_args, &config, &args),
        Command::Complete(complete_args) => complete_dictionary(complete_args, &args),
    }
}

/// Save a dictionary and report what was written.
fn write_dictionary<T: Serialize>(
    dictionary: &Dictionary,
    output: &Path,
    message: &str,
    details: T,
    cli_args: &LiwcArgs,
) -> Result<()> {
    dictionary.save(output)?;
    output_result(
        message,
        &DictionaryWritten {
            output: output.display().to_string(),
            categories: dictionary.store().len(),
            words: dictionary.word_set().len(),
            details,
        },
        cli_args,
    )
}

fn load_model(model: Option<&Path>, dictionary: &Dictionary) -> Result<Dictionary> {
    match model {
        Some(path) => Dictionary::load(path),
        None => Ok(dictionary.clone()),
    }
}

fn labelled(dictionary: &Dictionary, id: CategoryId) -> String {
    match dictionary.store().description(id) {
        Ok(label) => format!("{id} ({label})"),
        Err(_) => id.to_string(),
    }
}

/// Show dictionary statistics.
fn show_stats(args: &StatsArgs, cli_args: &LiwcArgs) -> Result<()> {
    let dictionary = Dictionary::load(&args.dictionary)?;

    let category_sizes = args.detailed.then(|| {
        dictionary
            .store()
            .iter()
            .map(|(id, category)| (labelled(&dictionary, id), category.len()))
            .collect()
    });

    output_result(
        "Dictionary statistics",
        &DictionaryStats {
            name: dictionary.name().to_string(),
            categories: dictionary.store().len(),
            words: dictionary.word_set().len(),
            wildcard_entries: dictionary.word_set().iter().filter(|w| is_wildcard(w)).count(),
            unhandled_lines: dictionary.unhandled_lines().len(),
            category_sizes,
        },
        cli_args,
    )
}

/// Compare two dictionaries.
fn compare_dictionaries(args: &CompareArgs, cli_args: &LiwcArgs) -> Result<()> {
    let old = Dictionary::load(&args.old)?;
    let new = Dictionary::load(&args.new)?;

    output_report(&old.compare(&new), cli_args)
}

/// Show the categories matching each token.
fn match_tokens(args: &MatchArgs, cli_args: &LiwcArgs) -> Result<()> {
    let dictionary = Dictionary::load(&args.dictionary)?;

    let matches = args
        .tokens
        .iter()
        .map(|token| TokenMatch {
            token: token.clone(),
            categories: dictionary
                .categories_for_token(token)
                .into_iter()
                .map(|id| labelled(&dictionary, id))
                .collect(),
        })
        .collect();

    output_result("Token matches", &MatchResults { matches }, cli_args)
}

/// Count dictionary categories in text files.
fn count_files(args: &CountArgs, config: &LiwcConfig, cli_args: &LiwcArgs) -> Result<()> {
    let dictionary = Dictionary::load(&args.dictionary)?;
    let tokenizer: Arc<dyn Tokenizer> =
        Arc::new(ContractionTokenizer::from_config(&config.tokenizer)?);
    let counter = CategoryCounter::new(&dictionary, tokenizer);
    let threshold = args
        .min_relative_frequency
        .unwrap_or(config.report.min_relative_frequency);

    let mut results = Vec::new();
    let mut total = counter.empty_report();
    for file in &args.files {
        info!("Counting {}", file.display());
        let text = String::from_utf8_lossy(&fs::read(file)?).into_owned();
        let report = counter.count_text(&text)?;
        if args.per_file {
            results.push(CountResults {
                source: file.display().to_string(),
                frequent_words: args
                    .frequent_words
                    .then(|| report.frequent_words(threshold)),
                report,
            });
        } else {
            total.merge(&report);
        }
    }

    if !args.per_file {
        results.push(CountResults {
            source: format!("{} files", args.files.len()),
            frequent_words: args.frequent_words.then(|| total.frequent_words(threshold)),
            report: total,
        });
    }

    for result in &results {
        output_result("Category counts", result, cli_args)?;
    }
    Ok(())
}

/// Split a word-by-file frequency table into per-category CSV files.
fn split_frequency_table(args: &FreqArgs, config: &LiwcConfig, cli_args: &LiwcArgs) -> Result<()> {
    if args.output.exists() {
        return Err(LiwcError::invalid_operation(format!(
            "{} already exists",
            args.output.display()
        )));
    }
    let dictionary = Dictionary::load(&args.dictionary)?;
    let rest_share = args.rest_share.unwrap_or(config.report.rest_share);

    let table = FrequencyTable::load(&dictionary, &args.table, rest_share)?;
    let written = table.write_csv(&args.output, &config.change_file)?;

    output_result(
        "Frequency tables written",
        &FrequencyTablesWritten {
            output: args.output.display().to_string(),
            files: table.files.len(),
            tables: written.len(),
        },
        cli_args,
    )
}

/// Show inferred hierarchies.
fn show_hierarchies(args: &HierarchyArgs, cli_args: &LiwcArgs) -> Result<()> {
    let dictionary = Dictionary::load(&args.dictionary)?;

    let hierarchies = dictionary
        .hierarchies()
        .into_iter()
        .map(|h| HierarchyEntry {
            child: labelled(&dictionary, h.child),
            parent: labelled(&dictionary, h.parent),
        })
        .collect();

    let extra_hierarchical_words = args.extra_words.then(|| {
        dictionary
            .extra_hierarchical_words()
            .into_iter()
            .map(|(id, words)| (labelled(&dictionary, id), words.into_iter().collect()))
            .collect::<BTreeMap<_, _>>()
    });

    output_result(
        "Category hierarchies",
        &HierarchyResults {
            hierarchies,
            extra_hierarchical_words,
        },
        cli_args,
    )
}

/// Write a dictionary with only some categories.
fn subset_dictionary(args: &SubsetArgs, cli_args: &LiwcArgs) -> Result<()> {
    let dictionary = Dictionary::load(&args.dictionary)?;
    let ids = args
        .categories
        .iter()
        .map(|raw| CategoryId::parse(raw))
        .collect::<Result<Vec<_>>>()?;

    let subset = dictionary.subset(&ids)?;
    write_dictionary(&subset, &args.output, "Subset written", (), cli_args)
}

/// Replace wildcards by the words of a corpus.
fn expand_wildcards(args: &ExpandArgs, config: &LiwcConfig, cli_args: &LiwcArgs) -> Result<()> {
    let mut dictionary = Dictionary::load(&args.dictionary)?;
    let tokenizer = ContractionTokenizer::from_config(&config.tokenizer)?;

    let corpus = String::from_utf8_lossy(&fs::read(&args.corpus)?).into_owned();
    let words: Vec<String> = tokenizer
        .tokenize(&corpus)?
        .map(|token| token.normalized())
        .collect();

    let expanded = dictionary.expand_wildcards(words);
    write_dictionary(
        &dictionary,
        &args.output,
        "Wildcards expanded",
        BTreeMap::from([("wildcards_expanded", expanded)]),
        cli_args,
    )
}

/// Apply an edit script.
fn apply_edit_script(args: &EditArgs, cli_args: &LiwcArgs) -> Result<()> {
    let mut dictionary = Dictionary::load(&args.dictionary)?;
    let script = fs::read_to_string(&args.script)?;

    let summary = dictionary.apply_edit_script(&script)?;
    write_dictionary(&dictionary, &args.output, "Edit script applied", summary, cli_args)
}

/// Apply a change file.
fn apply_change_file(args: &UpdateArgs, config: &LiwcConfig, cli_args: &LiwcArgs) -> Result<()> {
    let mut dictionary = Dictionary::load(&args.dictionary)?;
    let model = load_model(args.model.as_deref(), &dictionary)?;
    let text = fs::read_to_string(&args.change_file)?;
    let change_file = ChangeFile::parse_with(
        args.change_file.display().to_string(),
        &text,
        &config.change_file,
    )?;

    let report = dictionary.update_from_change_file(&change_file, &model)?;
    dictionary.save(&args.output)?;
    output_report(&report, cli_args)
}

/// Extract overlapping entries for review.
fn dedup_prepare(args: &DedupPrepareArgs, cli_args: &LiwcArgs) -> Result<()> {
    if args.review_file.exists() {
        return Err(LiwcError::invalid_operation(format!(
            "{} already exists",
            args.review_file.display()
        )));
    }
    let mut dictionary = Dictionary::load(&args.dictionary)?;

    let extraction = dictionary.prepare_dedup();
    if extraction.entries.is_empty() {
        warn!("No overlapping entries in {}", dictionary.name());
    }
    fs::write(&args.review_file, extraction.render())?;
    write_dictionary(
        &dictionary,
        &args.output,
        "Overlapping entries extracted",
        BTreeMap::from([("extracted_entries", extraction.entries.len())]),
        cli_args,
    )
}

/// Reintegrate reviewed entries.
fn dedup_reintegrate(args: &DedupReintegrateArgs, cli_args: &LiwcArgs) -> Result<()> {
    let mut dictionary = Dictionary::load(&args.dictionary)?;
    let review = fs::read_to_string(&args.review_file)?;

    let summary = dictionary.reintegrate(&review)?;
    write_dictionary(&dictionary, &args.output, "Entries reintegrated", summary, cli_args)
}

/// Convert a dictionary to a new schema.
fn convert_dictionary(args: &ConvertArgs, config: &LiwcConfig, cli_args: &LiwcArgs) -> Result<()> {
    let old = Dictionary::load(&args.dictionary)?;
    let matcher = SchemaMatcher::load(&args.matching_file, &config.change_file)?;

    let mut converted = matcher.convert(&old)?;
    converted.save(&args.output)?;
    converted.set_name(args.output.display().to_string());

    if args.audit {
        output_result("Migration audit", &matcher.audit(&old, &converted), cli_args)
    } else {
        output_result(
            "Dictionary converted",
            &DictionaryWritten {
                output: args.output.display().to_string(),
                categories: converted.store().len(),
                words: converted.word_set().len(),
                details: BTreeMap::from([
                    ("old_schema", matcher.old_schema()),
                    ("new_schema", matcher.new_schema()),
                ]),
            },
            cli_args,
        )
    }
}

/// Copy child words into their parents.
fn complete_dictionary(args: &CompleteArgs, cli_args: &LiwcArgs) -> Result<()> {
    let mut dictionary = Dictionary::load(&args.dictionary)?;
    let model = load_model(args.model.as_deref(), &dictionary)?;

    dictionary.complete(&model)?;
    write_dictionary(
        &dictionary,
        &args.output,
        "Dictionary completed",
        BTreeMap::from([("hierarchies", model.hierarchies().len())]),
        cli_args,
    )
}
