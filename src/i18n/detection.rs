//! System locale detection utilities.

use std::env;

use crate::i18n::locale::LocaleTag;

/// Environment variables consulted, highest priority first.
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// What: Detect system locale from environment variables.
///
/// Inputs:
/// - None (reads from environment)
///
/// Output:
/// - `Some(LocaleTag)` (e.g. `de_DE` from `de_DE.UTF-8`) or `None`
///
/// Details:
/// - Checks `LC_ALL`, `LC_MESSAGES` and `LANG` in order
/// - Values that name no language (`C`, `POSIX`, empty) are skipped so a
///   lower-priority variable can still apply
pub fn detect_system_locale() -> Option<LocaleTag> {
    LOCALE_VARS.iter().find_map(|var_name| {
        env::var(var_name)
            .ok()
            .and_then(|raw| parse_locale_string(&raw))
    })
}

/// What: Parse one environment value into a locale tag.
///
/// Inputs:
/// - `locale_str`: Value such as `"de_DE.UTF-8"`, `"en_US.utf8"` or `"C"`
///
/// Output:
/// - Normalized tag, or `None` when the value names no language
fn parse_locale_string(locale_str: &str) -> Option<LocaleTag> {
    match LocaleTag::parse(locale_str) {
        Ok(tag) => Some(tag),
        Err(err) => {
            if !locale_str.trim().is_empty() {
                tracing::debug!("Ignoring system locale '{}': {}", locale_str, err);
            }
            None
        }
    }
}
