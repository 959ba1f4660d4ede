//! Command-line catalog validation.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde::Serialize;
use tomeo_i18n::i18n::placeholders::placeholder_indices;
use tomeo_i18n::i18n::{Catalog, CatalogStats, Translation, load_catalog_file};

/// Translation whose `%N` markers differ from its source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderMismatch {
    /// Context of the message.
    pub context: String,
    /// Source text.
    pub source: String,
    /// Offending translation (one plural form for numerus messages).
    pub translation: String,
    /// Markers in the source but not the translation.
    pub missing: Vec<u8>,
    /// Markers in the translation but not the source.
    pub extra: Vec<u8>,
}

/// Result of checking one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Checked file.
    pub path: PathBuf,
    /// Declared locale, when the file loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Message counts, when the file loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<CatalogStats>,
    /// Placeholder mismatches.
    pub mismatches: Vec<PlaceholderMismatch>,
    /// Load error, when the file failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What: Compare the placeholder markers of every translated message.
///
/// Inputs:
/// - `catalog`: Loaded catalog.
///
/// Output:
/// - One entry per translation (or plural form) whose markers differ from
///   its source text; empty forms are skipped.
pub fn placeholder_mismatches(catalog: &Catalog) -> Vec<PlaceholderMismatch> {
    let mut found = Vec::new();
    for (context, entry) in catalog.messages() {
        let expected = placeholder_indices(entry.source());
        let forms: Vec<&str> = match entry.translation() {
            Translation::Single(text) => vec![text.as_str()],
            Translation::Plural(forms) => forms.iter().map(String::as_str).collect(),
        };
        for text in forms.into_iter().filter(|t| !t.is_empty()) {
            let actual = placeholder_indices(text);
            if actual == expected {
                continue;
            }
            found.push(PlaceholderMismatch {
                context: context.to_string(),
                source: entry.source().to_string(),
                translation: text.to_string(),
                missing: difference(&expected, &actual),
                extra: difference(&actual, &expected),
            });
        }
    }
    found
}

/// Markers in `a` that are not in `b`.
fn difference(a: &BTreeSet<u8>, b: &BTreeSet<u8>) -> Vec<u8> {
    a.difference(b).copied().collect()
}

/// What: Load one file and build its report.
///
/// Inputs:
/// - `path`: Catalog file.
///
/// Output:
/// - Report with statistics, or with `error` set when loading failed.
pub fn check_file(path: &Path) -> FileReport {
    match load_catalog_file(path) {
        Ok(catalog) => FileReport {
            path: path.to_path_buf(),
            locale: Some(catalog.locale().to_string()),
            stats: Some(catalog.stats()),
            mismatches: placeholder_mismatches(&catalog),
            error: None,
        },
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Catalog check failed");
            FileReport {
                path: path.to_path_buf(),
                locale: None,
                stats: None,
                mismatches: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    }
}

/// Print one report in human-readable form.
fn print_report(report: &FileReport) {
    if let Some(err) = &report.error {
        println!("{}: FAILED: {err}", report.path.display());
        return;
    }
    let locale = report.locale.as_deref().unwrap_or("?");
    let stats = report.stats.unwrap_or_default();
    println!(
        "{} [{locale}]: {} contexts, {} messages, {} translated, {} unfinished, {} empty",
        report.path.display(),
        stats.contexts,
        stats.messages,
        stats.translated,
        stats.unfinished,
        stats.empty
    );
    for m in &report.mismatches {
        println!(
            "  placeholder mismatch in {}: {:?} -> {:?} (missing {:?}, extra {:?})",
            m.context, m.source, m.translation, m.missing, m.extra
        );
    }
}

/// What: Check catalog files and print their reports.
///
/// Inputs:
/// - `files`: Catalog files to check.
/// - `json`: Print a JSON array instead of text.
///
/// Output:
/// - `true` when every file loaded and the report was printed.
///
/// Details:
/// - Placeholder mismatches are reported but do not fail the check.
pub fn check_files(files: &[PathBuf], json: bool) -> bool {
    let reports: Vec<FileReport> = files.iter().map(|p| check_file(p)).collect();
    if json {
        match serde_json::to_string_pretty(&reports) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("failed to encode report: {e}");
                return false;
            }
        }
    } else {
        reports.iter().for_each(print_report);
    }
    reports.iter().all(|r| r.error.is_none())
}

/// Run `check`; exit code 1 if any file failed to load.
pub fn handle_check(files: &[PathBuf], json: bool) -> ExitCode {
    tracing::info!(count = files.len(), "Catalog check requested from CLI");
    if check_files(files, json) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
