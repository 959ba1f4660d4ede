//! In-memory catalogs and the store that holds them.
//!
//! A [`Catalog`] is built once by the loader (or by hand in tests) and then
//! shared behind `Arc`; nothing mutates it afterwards. A locale switch
//! replaces which catalogs are consulted, never their contents.

use std::collections::HashMap;
use std::sync::Arc;

use crate::i18n::error::LoadError;
use crate::i18n::locale::LocaleTag;
use crate::i18n::plural::PluralRule;

/// Translated text of one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// A single template; empty means "not translated yet".
    Single(String),
    /// Plural form templates, indexed by the catalog's [`PluralRule`].
    Plural(Vec<String>),
}

impl Translation {
    /// Whether no usable text is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(text) => text.is_empty(),
            Self::Plural(forms) => forms.iter().all(String::is_empty),
        }
    }

    /// What: Select the template for a plural form index.
    ///
    /// Inputs:
    /// - `index`: Plural form index (ignored for single templates)
    ///
    /// Output:
    /// - `Some(template)` when the selected text is non-empty, `None` otherwise
    ///
    /// Details:
    /// - An index past the last form selects the last form
    #[must_use]
    pub fn form(&self, index: usize) -> Option<&str> {
        let text = match self {
            Self::Single(text) => text.as_str(),
            Self::Plural(forms) => forms
                .get(index)
                .or_else(|| forms.last())
                .map(String::as_str)?,
        };
        (!text.is_empty()).then_some(text)
    }
}

/// Key of a message within one context.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageKey {
    /// Source text (the lookup key used by UI code).
    pub source: String,
    /// Optional disambiguation comment separating identical source texts.
    pub disambiguation: Option<String>,
}

/// One translated message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntry {
    key: MessageKey,
    translation: Translation,
    unfinished: bool,
}

impl MessageEntry {
    /// Simple message with a single translation template.
    #[must_use]
    pub fn new(source: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            key: MessageKey {
                source: source.into(),
                disambiguation: None,
            },
            translation: Translation::Single(translation.into()),
            unfinished: false,
        }
    }

    /// Numerus message with one template per plural form.
    #[must_use]
    pub fn plural(source: impl Into<String>, forms: Vec<String>) -> Self {
        Self {
            key: MessageKey {
                source: source.into(),
                disambiguation: None,
            },
            translation: Translation::Plural(forms),
            unfinished: false,
        }
    }

    /// Attach a disambiguation comment.
    #[must_use]
    pub fn with_disambiguation(mut self, disambiguation: impl Into<String>) -> Self {
        self.key.disambiguation = Some(disambiguation.into());
        self
    }

    /// Mark the translation as unfinished (`type="unfinished"`).
    #[must_use]
    pub const fn unfinished(mut self, unfinished: bool) -> Self {
        self.unfinished = unfinished;
        self
    }

    /// Message key.
    #[must_use]
    pub const fn key(&self) -> &MessageKey {
        &self.key
    }

    /// Source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.key.source
    }

    /// Disambiguation comment.
    #[must_use]
    pub fn disambiguation(&self) -> Option<&str> {
        self.key.disambiguation.as_deref()
    }

    /// Translation payload.
    #[must_use]
    pub const fn translation(&self) -> &Translation {
        &self.translation
    }

    /// Whether the translator flagged this entry as unfinished.
    #[must_use]
    pub const fn is_unfinished(&self) -> bool {
        self.unfinished
    }
}

/// Named group of messages, usually one UI component.
#[derive(Debug, Clone, Default)]
pub struct Context {
    name: String,
    messages: Vec<MessageEntry>,
    by_source: HashMap<String, Vec<usize>>,
}

impl Context {
    /// Empty context.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Context name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Messages in document order.
    #[must_use]
    pub fn messages(&self) -> &[MessageEntry] {
        &self.messages
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the context holds no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// What: Find a message by source text and disambiguation.
    ///
    /// Inputs:
    /// - `source`: Source text
    /// - `disambiguation`: Disambiguation comment, `None` for plain messages
    ///
    /// Output:
    /// - Matching entry if present
    ///
    /// Details:
    /// - Hash lookup on the source text without allocating, then a linear
    ///   scan over the (usually single) entries sharing it
    #[must_use]
    pub fn get(&self, source: &str, disambiguation: Option<&str>) -> Option<&MessageEntry> {
        self.by_source
            .get(source)?
            .iter()
            .map(|&idx| &self.messages[idx])
            .find(|entry| entry.disambiguation() == disambiguation)
    }

    /// Add an entry; hands it back if its key is already present.
    fn insert(&mut self, entry: MessageEntry) -> Result<(), MessageEntry> {
        if self
            .get(entry.source(), entry.disambiguation())
            .is_some()
        {
            return Err(entry);
        }
        let idx = self.messages.len();
        self.by_source
            .entry(entry.source().to_string())
            .or_default()
            .push(idx);
        self.messages.push(entry);
        Ok(())
    }
}

/// Counts used by `tomeo-i18n check` and load logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CatalogStats {
    /// Number of contexts.
    pub contexts: usize,
    /// Number of messages.
    pub messages: usize,
    /// Messages with usable text.
    pub translated: usize,
    /// Messages flagged unfinished.
    pub unfinished: usize,
    /// Messages without any text.
    pub empty: usize,
}

/// All translations for one locale.
#[derive(Debug, Clone)]
pub struct Catalog {
    locale: LocaleTag,
    source_locale: Option<LocaleTag>,
    version: Option<String>,
    plural_rule: PluralRule,
    contexts: Vec<Context>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    /// Empty catalog for a locale; the plural rule follows the locale.
    #[must_use]
    pub fn new(locale: LocaleTag) -> Self {
        Self {
            plural_rule: PluralRule::for_locale(&locale),
            locale,
            source_locale: None,
            version: None,
            contexts: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Record the declared source language.
    #[must_use]
    pub fn with_source_locale(mut self, source_locale: Option<LocaleTag>) -> Self {
        self.source_locale = source_locale;
        self
    }

    /// Record the declared format version.
    #[must_use]
    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    /// Locale this catalog translates into.
    #[must_use]
    pub const fn locale(&self) -> &LocaleTag {
        &self.locale
    }

    /// Source language declared by the file, if any.
    #[must_use]
    pub const fn source_locale(&self) -> Option<&LocaleTag> {
        self.source_locale.as_ref()
    }

    /// Format version declared by the file, if any.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Plural rule used for numerus messages.
    #[must_use]
    pub const fn plural_rule(&self) -> PluralRule {
        self.plural_rule
    }

    /// Register a context even if it ends up holding no messages.
    pub fn ensure_context(&mut self, name: &str) -> &mut Context {
        let idx = if let Some(&idx) = self.by_name.get(name) {
            idx
        } else {
            self.contexts.push(Context::new(name));
            let idx = self.contexts.len() - 1;
            self.by_name.insert(name.to_string(), idx);
            idx
        };
        &mut self.contexts[idx]
    }

    /// What: Add a message to a context.
    ///
    /// Inputs:
    /// - `context`: Context name (created if missing)
    /// - `entry`: Message to add
    ///
    /// Output:
    /// - `Ok(())`, or `LoadError::DuplicateMessage` when the key exists
    ///
    /// # Errors
    /// - Returns `LoadError::DuplicateMessage` if the context already holds a
    ///   message with the same source text and disambiguation
    pub fn insert(&mut self, context: &str, entry: MessageEntry) -> Result<(), LoadError> {
        self.ensure_context(context)
            .insert(entry)
            .map_err(|rejected| LoadError::DuplicateMessage {
                context: context.to_string(),
                source_text: rejected.key.source,
                disambiguation: rejected.key.disambiguation,
            })
    }

    /// Context by name.
    #[must_use]
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.by_name.get(name).map(|&idx| &self.contexts[idx])
    }

    /// Contexts in document order.
    pub fn contexts(&self) -> impl Iterator<Item = &Context> {
        self.contexts.iter()
    }

    /// Every message with its context name, in document order.
    pub fn messages(&self) -> impl Iterator<Item = (&str, &MessageEntry)> {
        self.contexts
            .iter()
            .flat_map(|ctx| ctx.messages.iter().map(move |msg| (ctx.name(), msg)))
    }

    /// Look up a message entry.
    #[must_use]
    pub fn message(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
    ) -> Option<&MessageEntry> {
        self.context(context)?.get(source, disambiguation)
    }

    /// What: Resolve the non-empty template for a message.
    ///
    /// Inputs:
    /// - `context`, `source`, `disambiguation`: Message key
    /// - `count`: Plural count, used only for numerus entries
    ///
    /// Output:
    /// - `Some(template)` if this catalog has usable text, `None` otherwise
    ///
    /// Details:
    /// - Numerus entries without a count use form 0
    #[must_use]
    pub fn template(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
        count: Option<i64>,
    ) -> Option<&str> {
        let entry = self.message(context, source, disambiguation)?;
        let index = count.map_or(0, |n| self.plural_rule.form_index(n));
        entry.translation.form(index)
    }

    /// Total number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts.iter().map(Context::len).sum()
    }

    /// Whether the catalog holds no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contexts.iter().all(Context::is_empty)
    }

    /// Translation statistics.
    #[must_use]
    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats {
            contexts: self.contexts.len(),
            ..CatalogStats::default()
        };
        for (_, entry) in self.messages() {
            stats.messages += 1;
            if entry.translation.is_empty() {
                stats.empty += 1;
            } else {
                stats.translated += 1;
            }
            if entry.unfinished {
                stats.unfinished += 1;
            }
        }
        stats
    }
}

/// Loaded catalogs keyed by locale; one catalog per tag.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    catalogs: HashMap<LocaleTag, Arc<Catalog>>,
}

impl CatalogStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// What: Add a catalog, replacing any catalog with the same locale.
    ///
    /// Inputs:
    /// - `catalog`: Freshly loaded catalog
    ///
    /// Output:
    /// - The replaced catalog, if one was present (reload)
    pub fn insert(&mut self, catalog: Catalog) -> Option<Arc<Catalog>> {
        self.insert_shared(Arc::new(catalog))
    }

    /// Add an already shared catalog.
    pub fn insert_shared(&mut self, catalog: Arc<Catalog>) -> Option<Arc<Catalog>> {
        let previous = self.catalogs.insert(catalog.locale().clone(), catalog);
        if let Some(prev) = &previous {
            tracing::debug!("Replaced catalog for locale '{}'", prev.locale());
        }
        previous
    }

    /// Catalog for a locale.
    #[must_use]
    pub fn get(&self, locale: &str) -> Option<&Arc<Catalog>> {
        self.catalogs.get(locale)
    }

    /// Whether a catalog for the locale is loaded.
    #[must_use]
    pub fn contains(&self, locale: &str) -> bool {
        self.catalogs.contains_key(locale)
    }

    /// Evict a catalog. Translators already holding it keep their copy.
    pub fn remove(&mut self, locale: &str) -> Option<Arc<Catalog>> {
        self.catalogs.remove(locale)
    }

    /// Evict every catalog.
    pub fn clear(&mut self) {
        self.catalogs.clear();
    }

    /// Loaded locales, sorted.
    #[must_use]
    pub fn locales(&self) -> Vec<&LocaleTag> {
        let mut tags: Vec<&LocaleTag> = self.catalogs.keys().collect();
        tags.sort_unstable();
        tags
    }

    /// Number of loaded catalogs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    /// Whether no catalogs are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }
}
