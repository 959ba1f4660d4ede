//! Runtime localization for Tomeo.
//!
//! This module loads Qt Linguist catalogs, picks a locale with fallbacks,
//! translates UI strings and retranslates live widgets when the user switches
//! language.
//!
//! # Overview
//!
//! The i18n system supports:
//! - **Catalog Loading**: Parses `.ts` files (`translations/tomeo_{locale}.ts`) into per-context message tables
//! - **Locale Resolution**: Picks the starting locale (saved preference -> system -> default)
//! - **Fallback Chain**: Walks configured links and the language-only tag (e.g., `es_MX` -> `es_ES` -> `es`)
//! - **Translation Lookup**: `Translator::tr()`, `translate()` and `translate_plural()` with `%1`..`%99` and `%n` markers
//! - **Live Switching**: `LanguageManager::set_locale()` swaps catalogs and refreshes every subscribed widget
//! - **Relative Time**: Localized "5m ago" style labels for post cards
//!
//! # Catalog Files
//!
//! Catalogs are Qt Linguist XML. Messages are grouped by context (usually the
//! widget class) and looked up by their English source text:
//!
//! ```xml
//! <TS version="2.1" language="es_ES">
//! <context>
//!     <name>PlaybackControls</name>
//!     <message>
//!         <source>Play</source>
//!         <translation>Reproducir</translation>
//!     </message>
//! </context>
//! </TS>
//! ```
//!
//! # Configuration
//!
//! The engine is configured via `config/i18n.yml`:
//! - `default_locale`: Locale used when nothing else is usable (usually `en`)
//! - `source_locale`: Language of the source strings
//! - `catalog_prefix`: File name prefix of catalog files
//! - `search_paths`: Directories searched for catalogs
//! - `fallbacks`: Map of locale codes to their fallback locales
//!
//! # Usage
//!
//! ```rust,no_run
//! use tomeo_i18n::i18n::{I18nConfig, Language, LanguageManager};
//!
//! let mut manager = LanguageManager::new(&I18nConfig::discover());
//! manager.restore();
//! manager.subscribe_fn(|tr| {
//!     println!("{}", tr.tr("PlaybackControls", "Play"));
//!     Ok(())
//! });
//! if let Err(err) = manager.set_language(Language::Chinese) {
//!     eprintln!("{err}");
//! }
//! ```
//!
//! # Error Handling
//!
//! - Missing catalogs fall through the fallback chain down to source text
//! - A failed switch keeps the previous locale active
//! - Invalid saved preferences trigger warnings and fall back to system/default
//! - Missing translations return the source text and log debug messages
//! - All errors are logged but do not crash the application

mod broadcaster;
mod catalog;
mod config;
mod detection;
mod error;
mod language;
mod loader;
mod locale;
mod manager;
pub mod placeholders;
mod plural;
mod preferences;
pub mod relative_time;
mod resolver;
mod translations;
mod worker;

pub use broadcaster::{
    BroadcastReport, ObserverFailure, RefreshResult, Retranslate, RetranslationBroadcaster,
    SubscriptionId,
};
pub use catalog::{
    Catalog, CatalogStats, CatalogStore, Context, MessageEntry, MessageKey, Translation,
};
pub use config::I18nConfig;
pub use detection::detect_system_locale;
pub use error::{LoadError, SwitchError};
pub use language::Language;
pub use loader::{CatalogLoader, catalog_file_name, load_catalog_file, parse_catalog};
pub use locale::{LocaleTag, TagError};
pub use manager::LanguageManager;
pub use placeholders::{PlaceholderDiagnostics, substitute};
pub use plural::PluralRule;
pub use preferences::{LanguagePreference, PreferenceError, PreferenceStore};
pub use relative_time::{format_elapsed, format_since};
pub use resolver::{
    FallbackChain, LocaleResolver, Selection, build_fallback_chain, select, select_with_fallbacks,
};
pub use translations::Translator;
pub use worker::{CatalogLoadResult, spawn_catalog_worker};

use std::path::PathBuf;

/// Installed data directory.
const INSTALL_DIR: &str = "/usr/share/tomeo";

/// What: Find a config file in development and installed locations.
///
/// Inputs:
/// - `relative_path`: Relative path from config directory (e.g., "i18n.yml")
///
/// Output:
/// - `Some(PathBuf)` pointing to the first existing file found, or `None` if not found
///
/// Details:
/// - Tries locations in order:
///   1. Development location: `CARGO_MANIFEST_DIR/config/{relative_path}`
///   2. Installed location: `/usr/share/tomeo/config/{relative_path}`
#[must_use]
pub fn find_config_file(relative_path: &str) -> Option<PathBuf> {
    let dev_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("config")
        .join(relative_path);
    if dev_path.exists() {
        return Some(dev_path);
    }

    let installed_path = PathBuf::from(INSTALL_DIR).join("config").join(relative_path);
    if installed_path.exists() {
        return Some(installed_path);
    }

    None
}

/// What: List the directories searched for catalog files.
///
/// Inputs:
/// - `config`: Engine configuration holding `search_paths`
///
/// Output:
/// - Candidate directories in search order, without duplicates
///
/// Details:
/// - `CARGO_MANIFEST_DIR/translations` comes first when running from source
/// - Absolute `search_paths` are used as-is; relative ones are tried next
///   to the executable, then against the working directory
/// - Directories are not required to exist; the loader skips missing ones
#[must_use]
pub fn find_catalog_dirs(config: &I18nConfig) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    let mut push = |dir: PathBuf| {
        if !dirs.contains(&dir) {
            dirs.push(dir);
        }
    };

    let dev_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("translations");
    if dev_path.is_dir() {
        push(dev_path);
    }

    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(std::path::Path::to_path_buf));
    let cwd = std::env::current_dir().ok();
    for path in &config.search_paths {
        if path.is_absolute() {
            push(path.clone());
            continue;
        }
        if let Some(base) = &exe_dir {
            push(base.join(path));
        }
        if let Some(base) = &cwd {
            push(base.join(path));
        }
    }
    tracing::debug!("Catalog search directories: {:?}", dirs);
    dirs
}
