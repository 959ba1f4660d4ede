//! Command-line message translation.

use std::fmt::Display;
use std::process::ExitCode;

use crate::args::{Args, utils};

/// One `translate` invocation.
#[derive(Debug)]
pub struct TranslateRequest<'a> {
    /// Locale to translate into.
    pub locale: &'a str,
    /// Message context.
    pub context: &'a str,
    /// Disambiguation comment.
    pub disambiguation: Option<&'a str>,
    /// Plural count.
    pub count: Option<i64>,
    /// Positional arguments.
    pub params: &'a [String],
    /// Source text.
    pub source: &'a str,
}

/// What: Translate one message and print it.
///
/// Inputs:
/// - `args`: Global command-line arguments (catalog directories, config).
/// - `request`: Message key, locale and parameters.
///
/// Output:
/// - `ExitCode::SUCCESS` after printing the text, failure if the locale is
///   invalid or has no catalog.
///
/// Details:
/// - Missing translations print the source text, as the player would show it.
pub fn handle_translate(args: &Args, request: &TranslateRequest<'_>) -> ExitCode {
    tracing::info!(
        locale = %request.locale,
        context = %request.context,
        source = %request.source,
        "Translate requested from CLI"
    );
    let mut manager = utils::build_manager(args);
    if !utils::activate(&mut manager, request.locale) {
        return ExitCode::FAILURE;
    }
    let params: Vec<&dyn Display> = request.params.iter().map(|p| p as &dyn Display).collect();
    let text = manager.translator().translate_with(
        request.context,
        request.source,
        request.disambiguation,
        request.count,
        &params,
    );
    println!("{text}");
    ExitCode::SUCCESS
}
