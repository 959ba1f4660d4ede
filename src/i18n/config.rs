//! Engine configuration read from `config/i18n.yml`.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::i18n::locale::LocaleTag;

/// Locale used when nothing else names one.
const DEFAULT_LOCALE: &str = "en";
/// Catalog file prefix shipped with Tomeo.
const DEFAULT_PREFIX: &str = "tomeo";

/// Parsed `i18n.yml`. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Locale used when neither preference nor system locale is usable.
    pub default_locale: String,
    /// Language of the source strings; it has no catalog.
    pub source_locale: String,
    /// Catalog files are named `{catalog_prefix}_{locale}.ts`.
    pub catalog_prefix: String,
    /// Directories searched for catalogs, in order.
    pub search_paths: Vec<PathBuf>,
    /// Explicit fallback links (`es_MX: es_ES`).
    pub fallbacks: BTreeMap<String, String>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: DEFAULT_LOCALE.to_string(),
            source_locale: DEFAULT_LOCALE.to_string(),
            catalog_prefix: DEFAULT_PREFIX.to_string(),
            search_paths: vec![PathBuf::from("translations"), PathBuf::from("../translations")],
            fallbacks: BTreeMap::new(),
        }
    }
}

impl I18nConfig {
    /// What: Parse configuration from YAML text.
    ///
    /// Inputs:
    /// - `yaml`: Contents of `i18n.yml`
    ///
    /// Output:
    /// - Parsed configuration
    ///
    /// # Errors
    /// - Returns the `serde_norway` error when the YAML is invalid or a key
    ///   has the wrong type
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_norway::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_norway::from_str(yaml)
    }

    /// What: Load configuration from a file, never failing.
    ///
    /// Inputs:
    /// - `path`: Path to `i18n.yml`
    ///
    /// Output:
    /// - Parsed configuration, or defaults when the file is missing or invalid
    ///
    /// Details:
    /// - Read and parse failures are logged as warnings
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                tracing::warn!("Failed to read {}: {}; using defaults", path.display(), err);
                return Self::default();
            }
        };
        match Self::from_yaml(&contents) {
            Ok(config) => {
                tracing::debug!(
                    "Loaded i18n config from {} ({} fallback links)",
                    path.display(),
                    config.fallbacks.len()
                );
                config
            }
            Err(err) => {
                tracing::warn!("Failed to parse {}: {}; using defaults", path.display(), err);
                Self::default()
            }
        }
    }

    /// Configuration from the first `i18n.yml` found by
    /// [`find_config_file`](crate::i18n::find_config_file), or defaults.
    #[must_use]
    pub fn discover() -> Self {
        crate::i18n::find_config_file("i18n.yml").map_or_else(
            || {
                tracing::debug!("No i18n.yml found; using built-in defaults");
                Self::default()
            },
            |path| Self::load(&path),
        )
    }

    /// Configured default locale; `en` if the value is not a tag.
    #[must_use]
    pub fn default_locale_tag(&self) -> LocaleTag {
        parse_or_default(&self.default_locale, "default_locale")
    }

    /// Configured source locale; `en` if the value is not a tag.
    #[must_use]
    pub fn source_locale_tag(&self) -> LocaleTag {
        parse_or_default(&self.source_locale, "source_locale")
    }

    /// What: Parse the fallback links into tags.
    ///
    /// Output:
    /// - Map from locale to its next fallback
    ///
    /// Details:
    /// - Links whose key or value is not a locale tag are skipped with a
    ///   warning
    #[must_use]
    pub fn fallback_map(&self) -> HashMap<LocaleTag, LocaleTag> {
        let mut map = HashMap::with_capacity(self.fallbacks.len());
        for (from, to) in &self.fallbacks {
            match (LocaleTag::parse(from), LocaleTag::parse(to)) {
                (Ok(from_tag), Ok(to_tag)) => {
                    map.insert(from_tag, to_tag);
                }
                _ => tracing::warn!("Ignoring invalid fallback link '{}' -> '{}'", from, to),
            }
        }
        map
    }
}

/// Parse a configured tag, falling back to `en`.
fn parse_or_default(raw: &str, key: &str) -> LocaleTag {
    LocaleTag::parse(raw).unwrap_or_else(|err| {
        tracing::warn!("Invalid {} in i18n.yml: {}; using '{}'", key, err, DEFAULT_LOCALE);
        LocaleTag::english()
    })
}
