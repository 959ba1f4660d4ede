//! Command-line relative time labels.

use std::process::ExitCode;

use chrono::{DateTime, Utc};
use tomeo_i18n::i18n::relative_time::format_elapsed_in;

use crate::args::{Args, utils};

/// What: Parse an RFC 3339 timestamp and measure the seconds until `now`.
///
/// Inputs:
/// - `since`: Event time, e.g. `2024-05-01T12:00:00Z`.
/// - `now`: Reference time.
///
/// Output:
/// - Elapsed seconds (negative for future events).
///
/// # Errors
/// - `chrono::ParseError` when `since` is not RFC 3339.
pub fn seconds_since(since: &str, now: DateTime<Utc>) -> Result<i64, chrono::ParseError> {
    let event = DateTime::parse_from_rfc3339(since)?.with_timezone(&Utc);
    Ok(now.signed_duration_since(event).num_seconds())
}

/// What: Print a localized "time ago" label.
///
/// Inputs:
/// - `args`: Global command-line arguments.
/// - `locale`: Locale to render in.
/// - `context`: Context holding the relative time messages.
/// - `since`: Optional RFC 3339 event time.
/// - `seconds`: Optional elapsed seconds (used when `since` is absent).
///
/// Output:
/// - Process exit code.
pub fn handle_ago(
    args: &Args,
    locale: &str,
    context: &str,
    since: Option<&str>,
    seconds: Option<i64>,
) -> ExitCode {
    let elapsed = match (since, seconds) {
        (Some(raw), _) => match seconds_since(raw, Utc::now()) {
            Ok(secs) => secs,
            Err(e) => {
                eprintln!("invalid --since '{raw}': {e}");
                tracing::error!(error = %e, "Invalid --since timestamp");
                return ExitCode::FAILURE;
            }
        },
        (None, Some(secs)) => secs,
        (None, None) => 0,
    };
    tracing::info!(locale = %locale, elapsed, "Relative time requested from CLI");

    let mut manager = utils::build_manager(args);
    if !utils::activate(&mut manager, locale) {
        return ExitCode::FAILURE;
    }
    println!("{}", format_elapsed_in(&manager.translator(), elapsed, context));
    ExitCode::SUCCESS
}
