//! Command-line language listing.

use std::process::ExitCode;

use tokio::sync::mpsc;
use tomeo_i18n::i18n::{Language, spawn_catalog_worker};

use crate::args::{Args, utils};

/// Availability of one offered language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// Source language; shown without a catalog.
    Source,
    /// Catalog loaded with this many messages.
    Catalog(usize),
    /// Catalog missing or broken.
    Missing(String),
}

/// What: Print every offered language and whether its catalog loads.
///
/// Inputs:
/// - `args`: Global command-line arguments.
///
/// Output:
/// - `ExitCode::SUCCESS`; missing catalogs are listed, not treated as errors.
///
/// Details:
/// - Catalogs load concurrently on the background catalog worker.
pub async fn handle_languages(args: &Args) -> ExitCode {
    for (language, availability) in collect_availability(args).await {
        let status = match availability {
            Availability::Source => "source language".to_string(),
            Availability::Catalog(n) => format!("catalog found ({n} messages)"),
            Availability::Missing(reason) => format!("missing: {reason}"),
        };
        println!(
            "{:<6} {:<8} {status}",
            language.code(),
            language.display_name()
        );
    }
    ExitCode::SUCCESS
}

/// What: Load the catalog of every offered language on the worker.
///
/// Inputs:
/// - `args`: Global command-line arguments.
///
/// Output:
/// - Languages in settings-dialog order with their availability.
pub async fn collect_availability(args: &Args) -> Vec<(Language, Availability)> {
    let manager = utils::build_manager(args);
    let source = manager.resolver().source_locale().clone();
    let (req_tx, req_rx) = mpsc::unbounded_channel();
    let (res_tx, mut res_rx) = mpsc::unbounded_channel();
    let worker = spawn_catalog_worker(manager.loader().clone(), req_rx, res_tx);

    let mut pending = Vec::new();
    for language in Language::ALL {
        let tag = language.locale_tag();
        if !tag.same_language(&source) && req_tx.send(tag).is_ok() {
            pending.push(language);
        }
    }
    drop(req_tx);

    let mut rows: Vec<(Language, Availability)> = Language::ALL
        .iter()
        .filter(|lang| !pending.contains(lang))
        .map(|lang| (*lang, Availability::Source))
        .collect();
    while let Some(loaded) = res_rx.recv().await {
        let Some(language) = Language::from_locale(&loaded.locale) else {
            continue;
        };
        let availability = match loaded.result {
            Ok(catalog) => Availability::Catalog(catalog.len()),
            Err(e) => Availability::Missing(e.to_string()),
        };
        rows.push((language, availability));
    }
    if let Err(e) = worker.await {
        tracing::warn!(error = %e, "Catalog worker failed");
    }
    rows.sort_by_key(|(lang, _)| Language::ALL.iter().position(|l| l == lang));
    rows
}
