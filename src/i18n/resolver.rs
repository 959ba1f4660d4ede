//! Locale resolution with fallback chain support.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::i18n::catalog::{Catalog, CatalogStore};
use crate::i18n::config::I18nConfig;
use crate::i18n::detection::detect_system_locale;
use crate::i18n::locale::LocaleTag;

/// Longest run of configured fallback links followed from one locale.
const MAX_FALLBACK_STEPS: usize = 10;

/// Ordered locales consulted for a request, most specific first.
///
/// The source locale always ends the chain implicitly: when no link has a
/// translation the source text is shown as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackChain {
    /// Locales that may have a catalog.
    links: Vec<LocaleTag>,
    /// Language of the source strings.
    source: LocaleTag,
}

impl FallbackChain {
    /// Locales with possible catalogs, in lookup order.
    #[must_use]
    pub fn links(&self) -> &[LocaleTag] {
        &self.links
    }

    /// Source locale terminating the chain.
    #[must_use]
    pub const fn source(&self) -> &LocaleTag {
        &self.source
    }

    /// Whether the chain only consists of the source locale.
    #[must_use]
    pub fn is_source_only(&self) -> bool {
        self.links.is_empty()
    }
}

/// What: Follow configured links from one locale and append them.
///
/// Inputs:
/// - `start`: First locale of the run
/// - `fallbacks`: Configured links
/// - `source`: Source locale
/// - `links`: Chain being built
///
/// Output:
/// - `false` when a source-language link ended the chain
///
/// Details:
/// - Stops on a cycle or after `MAX_FALLBACK_STEPS` links and warns
/// - Locales already in `links` are not added twice
fn follow_links(
    start: &LocaleTag,
    fallbacks: &HashMap<LocaleTag, LocaleTag>,
    source: &LocaleTag,
    links: &mut Vec<LocaleTag>,
) -> bool {
    let mut visited = HashSet::new();
    let mut current = start.clone();
    loop {
        if current.same_language(source) {
            tracing::debug!(
                "Locale '{}' is in the source language; chain ends at source text",
                current
            );
            return false;
        }
        if !visited.insert(current.clone()) {
            tracing::warn!(
                "Detected cycle in fallback chain for locale '{}' at '{}'",
                start,
                current
            );
            return true;
        }
        if !links.contains(&current) {
            links.push(current.clone());
        }
        let Some(next) = fallbacks.get(&current) else {
            return true;
        };
        if visited.len() > MAX_FALLBACK_STEPS {
            tracing::warn!(
                "Fallback chain too long ({} steps) for locale '{}'; stopping at '{}'",
                visited.len(),
                start,
                current
            );
            return true;
        }
        tracing::debug!("Locale '{}' has fallback: {}", current, next);
        current = next.clone();
    }
}

/// What: Build the fallback chain for a requested locale.
///
/// Inputs:
/// - `requested`: Locale asked for
/// - `fallbacks`: Configured links (`es_MX -> es_ES`)
/// - `source`: Source locale
///
/// Output:
/// - Chain: exact tag, its configured fallbacks, the language-only tag, its
///   configured fallbacks; duplicates removed
///
/// Details:
/// - A link in the source language ends the chain, since that language has
///   no catalog
#[must_use]
pub fn build_fallback_chain(
    requested: &LocaleTag,
    fallbacks: &HashMap<LocaleTag, LocaleTag>,
    source: &LocaleTag,
) -> FallbackChain {
    let mut links = Vec::new();
    if follow_links(requested, fallbacks, source, &mut links) && !requested.is_language_only() {
        follow_links(&requested.language_tag(), fallbacks, source, &mut links);
    }
    FallbackChain {
        links,
        source: source.clone(),
    }
}

/// Catalogs chosen for a request.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Locale asked for.
    pub requested: LocaleTag,
    /// Chain the catalogs were picked from.
    pub chain: FallbackChain,
    /// Available catalogs, in chain order.
    pub catalogs: Vec<Arc<Catalog>>,
    /// Chain links without a loaded catalog.
    pub unavailable: Vec<LocaleTag>,
}

impl Selection {
    /// Most specific available catalog.
    #[must_use]
    pub fn active(&self) -> Option<&Arc<Catalog>> {
        self.catalogs.first()
    }

    /// Whether lookups will fall through to source text.
    #[must_use]
    pub fn is_source_only(&self) -> bool {
        self.catalogs.is_empty()
    }
}

/// What: Select catalogs for a locale using only the language-prefix rule.
///
/// Inputs:
/// - `requested`: Locale asked for
/// - `store`: Loaded catalogs
/// - `source`: Source locale
///
/// Output:
/// - Selection; never fails, may be empty
#[must_use]
pub fn select(requested: &LocaleTag, store: &CatalogStore, source: &LocaleTag) -> Selection {
    select_with_fallbacks(requested, &HashMap::new(), store, source)
}

/// What: Select catalogs for a locale.
///
/// Inputs:
/// - `requested`: Locale asked for
/// - `fallbacks`: Configured links
/// - `store`: Loaded catalogs
/// - `source`: Source locale
///
/// Output:
/// - Selection whose first catalog is the active one
///
/// Details:
/// - Links without a catalog are logged at debug level and skipped
#[must_use]
pub fn select_with_fallbacks(
    requested: &LocaleTag,
    fallbacks: &HashMap<LocaleTag, LocaleTag>,
    store: &CatalogStore,
    source: &LocaleTag,
) -> Selection {
    let chain = build_fallback_chain(requested, fallbacks, source);
    let mut catalogs = Vec::new();
    let mut unavailable = Vec::new();
    for link in chain.links() {
        if let Some(catalog) = store.get(link.as_str()) {
            catalogs.push(Arc::clone(catalog));
        } else {
            tracing::debug!("Locale '{}' unavailable; skipping in chain", link);
            unavailable.push(link.clone());
        }
    }
    if catalogs.is_empty() && !chain.is_source_only() {
        tracing::debug!(
            "No catalog available for locale '{}'; using source text",
            requested
        );
    }
    Selection {
        requested: requested.clone(),
        chain,
        catalogs,
        unavailable,
    }
}

/// Locale resolver that caches configuration.
#[derive(Debug, Clone)]
pub struct LocaleResolver {
    /// Configured fallback links.
    fallbacks: HashMap<LocaleTag, LocaleTag>,
    /// Locale used when nothing else applies.
    default_locale: LocaleTag,
    /// Language of the source strings.
    source_locale: LocaleTag,
}

impl LocaleResolver {
    /// What: Create a resolver from engine configuration.
    ///
    /// Inputs:
    /// - `config`: Parsed `i18n.yml`
    ///
    /// Output:
    /// - `LocaleResolver` instance
    #[must_use]
    pub fn new(config: &I18nConfig) -> Self {
        Self::from_parts(
            config.fallback_map(),
            config.default_locale_tag(),
            config.source_locale_tag(),
        )
    }

    /// Resolver from already parsed parts.
    #[must_use]
    pub const fn from_parts(
        fallbacks: HashMap<LocaleTag, LocaleTag>,
        default_locale: LocaleTag,
        source_locale: LocaleTag,
    ) -> Self {
        Self {
            fallbacks,
            default_locale,
            source_locale,
        }
    }

    /// Default locale.
    #[must_use]
    pub const fn default_locale(&self) -> &LocaleTag {
        &self.default_locale
    }

    /// Source locale.
    #[must_use]
    pub const fn source_locale(&self) -> &LocaleTag {
        &self.source_locale
    }

    /// Configured fallback links.
    #[must_use]
    pub const fn fallbacks(&self) -> &HashMap<LocaleTag, LocaleTag> {
        &self.fallbacks
    }

    /// Fallback chain for a locale.
    #[must_use]
    pub fn chain(&self, requested: &LocaleTag) -> FallbackChain {
        build_fallback_chain(requested, &self.fallbacks, &self.source_locale)
    }

    /// Select catalogs for a locale from a store.
    #[must_use]
    pub fn select(&self, requested: &LocaleTag, store: &CatalogStore) -> Selection {
        select_with_fallbacks(requested, &self.fallbacks, store, &self.source_locale)
    }

    /// What: Pick the locale to start with.
    ///
    /// Inputs:
    /// - `preference`: Saved preference (empty or `None` means auto-detect)
    ///
    /// Output:
    /// - Preference, else system locale, else the configured default
    #[must_use]
    pub fn initial_locale(&self, preference: Option<&str>) -> LocaleTag {
        self.initial_locale_with(preference, detect_system_locale())
    }

    /// What: Pick the locale to start with, given the detected system locale.
    ///
    /// Inputs:
    /// - `preference`: Saved preference
    /// - `system`: Detected system locale
    ///
    /// Output:
    /// - Resolved starting locale
    ///
    /// Details:
    /// - An unparseable preference is logged and ignored
    #[must_use]
    pub fn initial_locale_with(
        &self,
        preference: Option<&str>,
        system: Option<LocaleTag>,
    ) -> LocaleTag {
        if let Some(raw) = preference.map(str::trim).filter(|raw| !raw.is_empty()) {
            match LocaleTag::parse(raw) {
                Ok(tag) => return tag,
                Err(err) => tracing::warn!(
                    "Invalid locale preference '{}': {}. Using system locale or default.",
                    raw,
                    err
                ),
            }
        }
        system.unwrap_or_else(|| {
            tracing::debug!(
                "System locale detection failed, using default: {}",
                self.default_locale
            );
            self.default_locale.clone()
        })
    }
}
