//! Translation lookup over an immutable catalog snapshot.

use std::fmt::Display;
use std::sync::Arc;

use crate::i18n::catalog::Catalog;
use crate::i18n::locale::LocaleTag;
use crate::i18n::placeholders::{PlaceholderDiagnostics, substitute};
use crate::i18n::resolver::Selection;

/// Lookup snapshot for one active locale.
///
/// Cheap to clone; the catalogs are shared. A locale switch builds a new
/// `Translator` instead of editing this one, so a render pass that holds a
/// reference always sees one consistent locale.
#[derive(Debug, Clone)]
pub struct Translator {
    /// Locale that was requested.
    locale: LocaleTag,
    /// Catalogs in chain order, most specific first.
    catalogs: Vec<Arc<Catalog>>,
    /// Shared sink for placeholder warnings.
    diagnostics: Arc<PlaceholderDiagnostics>,
}

impl Translator {
    /// What: Translator that renders source text only.
    ///
    /// Inputs:
    /// - `locale`: Locale reported by [`Translator::locale`] (usually the
    ///   source locale)
    ///
    /// Output:
    /// - Translator with no catalogs and its own diagnostics sink
    #[must_use]
    pub fn source_only(locale: LocaleTag) -> Self {
        Self::new(locale, Vec::new(), Arc::new(PlaceholderDiagnostics::new()))
    }

    /// Translator over explicit catalogs (most specific first).
    #[must_use]
    pub const fn new(
        locale: LocaleTag,
        catalogs: Vec<Arc<Catalog>>,
        diagnostics: Arc<PlaceholderDiagnostics>,
    ) -> Self {
        Self {
            locale,
            catalogs,
            diagnostics,
        }
    }

    /// Translator for a resolver selection.
    #[must_use]
    pub fn from_selection(selection: &Selection, diagnostics: Arc<PlaceholderDiagnostics>) -> Self {
        Self::new(
            selection.requested.clone(),
            selection.catalogs.clone(),
            diagnostics,
        )
    }

    /// Requested locale.
    #[must_use]
    pub const fn locale(&self) -> &LocaleTag {
        &self.locale
    }

    /// Catalogs consulted, in order.
    #[must_use]
    pub fn catalogs(&self) -> &[Arc<Catalog>] {
        &self.catalogs
    }

    /// Most specific catalog, if any.
    #[must_use]
    pub fn active_catalog(&self) -> Option<&Arc<Catalog>> {
        self.catalogs.first()
    }

    /// Locales of the consulted catalogs.
    #[must_use]
    pub fn chain_locales(&self) -> Vec<&LocaleTag> {
        self.catalogs.iter().map(|c| c.locale()).collect()
    }

    /// Whether every lookup returns source text.
    #[must_use]
    pub fn is_source_only(&self) -> bool {
        self.catalogs.is_empty()
    }

    /// Shared placeholder diagnostics sink.
    #[must_use]
    pub const fn diagnostics(&self) -> &Arc<PlaceholderDiagnostics> {
        &self.diagnostics
    }

    /// What: Find the template for a message without substituting.
    ///
    /// Inputs:
    /// - `context`, `source`, `disambiguation`: Message key
    /// - `count`: Plural count for numerus messages
    ///
    /// Output:
    /// - First non-empty template along the chain, or `None`
    #[must_use]
    pub fn lookup(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
        count: Option<i64>,
    ) -> Option<&str> {
        self.catalogs
            .iter()
            .find_map(|catalog| catalog.template(context, source, disambiguation, count))
    }

    /// Translate a message without parameters.
    #[must_use]
    pub fn tr(&self, context: &str, source: &str) -> String {
        self.translate_with(context, source, None, None, &[])
    }

    /// Translate a message and fill `%1`, `%2`, ... from `params`.
    #[must_use]
    pub fn translate(&self, context: &str, source: &str, params: &[&dyn Display]) -> String {
        self.translate_with(context, source, None, None, params)
    }

    /// Translate a numerus message; `%n` becomes `count`.
    #[must_use]
    pub fn translate_plural(
        &self,
        context: &str,
        source: &str,
        count: i64,
        params: &[&dyn Display],
    ) -> String {
        self.translate_with(context, source, None, Some(count), params)
    }

    /// What: Resolve a message to display text.
    ///
    /// Inputs:
    /// - `context`: Context name (lookups are scoped to it)
    /// - `source`: Source text
    /// - `disambiguation`: Disambiguation comment, if any
    /// - `count`: Plural count, if any
    /// - `params`: Positional arguments for `%1`..`%99`
    ///
    /// Output:
    /// - Display string; the source text (substituted) when no catalog in
    ///   the chain has a non-empty translation
    ///
    /// Details:
    /// - Unresolved placeholders stay literal and are reported once per
    ///   template through the diagnostics sink
    #[must_use]
    pub fn translate_with(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
        count: Option<i64>,
        params: &[&dyn Display],
    ) -> String {
        let template = self
            .lookup(context, source, disambiguation, count)
            .unwrap_or_else(|| {
                if !self.catalogs.is_empty() {
                    tracing::debug!(
                        "No translation for '{}' in context '{}' ({}); using source text",
                        source,
                        context,
                        self.locale
                    );
                }
                source
            });
        let rendered = substitute(template, params, count);
        if !rendered.unresolved.is_empty() {
            self.diagnostics.report(template, &rendered.unresolved);
        }
        rendered.text
    }
}
