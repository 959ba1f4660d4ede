//! Shared utilities for argument processing.

use tomeo_i18n::i18n::{CatalogLoader, I18nConfig, LanguageManager, LocaleResolver, LocaleTag};

use crate::args::Args;

/// What: Determine the log level based on command-line arguments.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
///
/// Output:
/// - Log level string (trace, debug, info, warn, error).
///
/// Details:
/// - Verbose flag overrides `--log-level`.
pub fn determine_log_level(args: &Args) -> String {
    if args.verbose {
        "debug".to_string()
    } else {
        args.log_level.clone()
    }
}

/// What: Load engine configuration for the CLI.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
///
/// Output:
/// - `--config` file when given, otherwise the discovered `i18n.yml`.
pub fn load_config(args: &Args) -> I18nConfig {
    args.config
        .as_deref()
        .map_or_else(I18nConfig::discover, I18nConfig::load)
}

/// What: Build the catalog loader for the CLI.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
/// - `config`: Engine configuration.
///
/// Output:
/// - Loader searching `--catalog-dir` directories when given, otherwise the
///   configured search paths.
pub fn build_loader(args: &Args, config: &I18nConfig) -> CatalogLoader {
    if args.catalog_dirs.is_empty() {
        CatalogLoader::from_config(config)
    } else {
        CatalogLoader::new(args.catalog_dirs.clone(), config.catalog_prefix.clone())
    }
}

/// Language manager wired from command-line arguments; no preference file.
pub fn build_manager(args: &Args) -> LanguageManager {
    let config = load_config(args);
    LanguageManager::with_parts(build_loader(args, &config), LocaleResolver::new(&config))
}

/// What: Parse a locale given on the command line.
///
/// Inputs:
/// - `raw`: Locale text (e.g., `zh_CN`, `es-es`).
///
/// Output:
/// - Parsed tag, or `None` after printing the error.
pub fn parse_locale(raw: &str) -> Option<LocaleTag> {
    match LocaleTag::parse(raw) {
        Ok(tag) => Some(tag),
        Err(e) => {
            eprintln!("{e}");
            tracing::error!(error = %e, "Invalid locale on command line");
            None
        }
    }
}

/// What: Activate a locale on a CLI manager.
///
/// Inputs:
/// - `manager`: Manager to switch.
/// - `raw`: Locale text from the command line.
///
/// Output:
/// - `true` when the locale (or its fallback) is active.
pub fn activate(manager: &mut LanguageManager, raw: &str) -> bool {
    let Some(locale) = parse_locale(raw) else {
        return false;
    };
    match manager.set_locale(&locale) {
        Ok(_) => true,
        Err(e) => {
            eprintln!("{e}");
            tracing::error!(error = %e, "Locale switch failed");
            false
        }
    }
}
