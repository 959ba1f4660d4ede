//! Application-level owner of the active locale.
//!
//! `LanguageManager` ties the loader, store, resolver, lookup snapshot and
//! broadcaster together. The host creates one at start-up and passes it to
//! whatever needs it; several managers can live side by side.

use std::fmt::Display;
use std::sync::Arc;

use crate::i18n::broadcaster::{
    BroadcastReport, RefreshResult, Retranslate, RetranslationBroadcaster, SubscriptionId,
};
use crate::i18n::catalog::{Catalog, CatalogStore};
use crate::i18n::config::I18nConfig;
use crate::i18n::error::{LoadError, SwitchError};
use crate::i18n::language::Language;
use crate::i18n::loader::CatalogLoader;
use crate::i18n::locale::LocaleTag;
use crate::i18n::placeholders::PlaceholderDiagnostics;
use crate::i18n::preferences::PreferenceStore;
use crate::i18n::resolver::LocaleResolver;
use crate::i18n::translations::Translator;
use crate::i18n::worker::CatalogLoadResult;

/// Owns the active locale and everything needed to switch it.
#[derive(Debug)]
pub struct LanguageManager {
    /// Finds and caches catalog files.
    loader: CatalogLoader,
    /// Catalogs available for selection.
    store: CatalogStore,
    /// Fallback configuration.
    resolver: LocaleResolver,
    /// Current lookup snapshot.
    active: Arc<Translator>,
    /// Observers refreshed on every switch.
    broadcaster: RetranslationBroadcaster,
    /// Placeholder warnings shared by every snapshot.
    diagnostics: Arc<PlaceholderDiagnostics>,
    /// Where the user's choice is saved, if anywhere.
    preferences: Option<PreferenceStore>,
}

impl LanguageManager {
    /// What: Create a manager from engine configuration.
    ///
    /// Inputs:
    /// - `config`: Parsed `i18n.yml`
    ///
    /// Output:
    /// - Manager showing source text until a locale is set
    #[must_use]
    pub fn new(config: &I18nConfig) -> Self {
        Self::with_parts(CatalogLoader::from_config(config), LocaleResolver::new(config))
    }

    /// Manager from an explicit loader and resolver.
    #[must_use]
    pub fn with_parts(loader: CatalogLoader, resolver: LocaleResolver) -> Self {
        let diagnostics = Arc::new(PlaceholderDiagnostics::new());
        let active = Arc::new(Translator::new(
            resolver.source_locale().clone(),
            Vec::new(),
            Arc::clone(&diagnostics),
        ));
        Self {
            loader,
            store: CatalogStore::new(),
            resolver,
            active,
            broadcaster: RetranslationBroadcaster::new(),
            diagnostics,
            preferences: None,
        }
    }

    /// Save successful switches to `store`.
    #[must_use]
    pub fn with_preferences(mut self, store: PreferenceStore) -> Self {
        self.preferences = Some(store);
        self
    }

    /// What: Activate the starting locale.
    ///
    /// Output:
    /// - Locale that ended up active
    ///
    /// Details:
    /// - Tries the saved preference, then the system locale, then the
    ///   configured default (see [`LocaleResolver::initial_locale`])
    /// - If that locale has no catalog the default is tried; if that fails
    ///   too, source text stays active
    /// - Does not rewrite the preference file
    pub fn restore(&mut self) -> LocaleTag {
        let saved = self.preferences.as_ref().and_then(PreferenceStore::load);
        let initial = self
            .resolver
            .initial_locale(saved.as_ref().map(LocaleTag::as_str));
        if let Err(err) = self.switch(&initial, false) {
            tracing::warn!("{}; trying default locale", err);
            let fallback = self.resolver.default_locale().clone();
            if fallback != initial
                && let Err(err) = self.switch(&fallback, false)
            {
                tracing::warn!("{}; showing source text", err);
            }
        }
        self.locale().clone()
    }

    /// Active locale.
    #[must_use]
    pub fn locale(&self) -> &LocaleTag {
        self.active.locale()
    }

    /// Offered language matching the active locale, if any.
    #[must_use]
    pub fn language(&self) -> Option<Language> {
        Language::from_locale(self.locale())
    }

    /// Current lookup snapshot; stays valid across later switches.
    #[must_use]
    pub fn translator(&self) -> Arc<Translator> {
        Arc::clone(&self.active)
    }

    /// Loaded catalogs.
    #[must_use]
    pub const fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// Catalog file loader.
    #[must_use]
    pub const fn loader(&self) -> &CatalogLoader {
        &self.loader
    }

    /// Fallback configuration.
    #[must_use]
    pub const fn resolver(&self) -> &LocaleResolver {
        &self.resolver
    }

    /// Shared placeholder diagnostics.
    #[must_use]
    pub const fn diagnostics(&self) -> &Arc<PlaceholderDiagnostics> {
        &self.diagnostics
    }

    /// What: Add a catalog loaded elsewhere (tests, background worker).
    ///
    /// Inputs:
    /// - `catalog`: Catalog to add; replaces one with the same locale
    ///
    /// Output:
    /// - The replaced catalog, if any
    ///
    /// Details:
    /// - The active snapshot is not touched; call [`LanguageManager::refresh`]
    ///   or switch locale to start using it
    pub fn install(&mut self, catalog: Catalog) -> Option<Arc<Catalog>> {
        self.store.insert(catalog)
    }

    /// What: Install the outcome of a background load.
    ///
    /// Inputs:
    /// - `loaded`: Result received from the catalog worker
    ///
    /// Output:
    /// - `true` when a catalog was installed
    pub fn apply_load_result(&mut self, loaded: CatalogLoadResult) -> bool {
        match loaded.result {
            Ok(catalog) => {
                tracing::debug!("Installing background-loaded catalog '{}'", loaded.locale);
                self.install(catalog);
                true
            }
            Err(err) => {
                if err.is_not_found() {
                    tracing::debug!("{}", err);
                } else {
                    tracing::warn!("Background load of '{}' failed: {}", loaded.locale, err);
                }
                false
            }
        }
    }

    /// Switch to an offered language.
    ///
    /// # Errors
    /// - See [`LanguageManager::set_locale`]
    pub fn set_language(&mut self, language: Language) -> Result<BroadcastReport, SwitchError> {
        self.set_locale(&language.locale_tag())
    }

    /// What: Switch the active locale without restarting.
    ///
    /// Inputs:
    /// - `locale`: Locale to activate
    ///
    /// Output:
    /// - Report of the retranslation pass (empty when nothing changed)
    ///
    /// # Errors
    /// - `SwitchError::LocaleUnavailable` when the locale is not the source
    ///   language and no catalog in its chain can be loaded; the previous
    ///   locale stays active
    ///
    /// Details:
    /// - Setting the active locale again is a no-op
    /// - Missing chain catalogs are loaded on the spot
    /// - On success the preference is saved and every observer refreshed
    ///   before returning
    pub fn set_locale(&mut self, locale: &LocaleTag) -> Result<BroadcastReport, SwitchError> {
        if locale == self.locale() {
            tracing::debug!("Locale '{}' already active", locale);
            return Ok(BroadcastReport::default());
        }
        self.switch(locale, true)
    }

    /// What: Rebuild the active snapshot from the store and retranslate.
    ///
    /// Output:
    /// - Report of the retranslation pass
    ///
    /// Details:
    /// - Picks up catalogs installed since the last switch; nothing is read
    ///   from disk
    pub fn refresh(&mut self) -> BroadcastReport {
        let locale = self.locale().clone();
        let selection = self.resolver.select(&locale, &self.store);
        let translator = Arc::new(Translator::from_selection(
            &selection,
            Arc::clone(&self.diagnostics),
        ));
        self.active = Arc::clone(&translator);
        self.broadcaster.on_locale_changed(&translator)
    }

    /// What: Reread the active chain's catalogs from disk.
    ///
    /// Output:
    /// - Report of the retranslation pass
    ///
    /// # Errors
    /// - `SwitchError::LocaleUnavailable` if the files disappeared; the
    ///   previous catalogs stay in use
    pub fn reload(&mut self) -> Result<BroadcastReport, SwitchError> {
        let locale = self.locale().clone();
        let chain = self.resolver.chain(&locale);
        let mut previous = Vec::new();
        for link in chain.links() {
            self.loader.invalidate(link);
            if let Some(catalog) = self.store.remove(link.as_str()) {
                previous.push(catalog);
            }
        }
        let outcome = self.switch(&locale, false);
        if outcome.is_err() {
            for catalog in previous {
                self.store.insert_shared(catalog);
            }
        }
        outcome
    }

    /// Whether a language can be activated (source language or a catalog
    /// exists somewhere in its chain).
    #[must_use]
    pub fn is_available(&self, language: Language) -> bool {
        let tag = language.locale_tag();
        if tag.same_language(self.resolver.source_locale()) {
            return true;
        }
        self.resolver
            .chain(&tag)
            .links()
            .iter()
            .any(|link| self.store.contains(link.as_str()) || self.loader.locate(link).is_some())
    }

    /// Register an observer.
    pub fn subscribe(&mut self, observer: Box<dyn Retranslate>) -> SubscriptionId {
        self.broadcaster.subscribe(observer)
    }

    /// Register a closure observer.
    pub fn subscribe_fn<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&Translator) -> RefreshResult + 'static,
    {
        self.broadcaster.subscribe_fn(observer)
    }

    /// Remove an observer; `false` for unknown handles.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.broadcaster.unsubscribe(id)
    }

    /// Translate with the active snapshot.
    #[must_use]
    pub fn tr(&self, context: &str, source: &str) -> String {
        self.active.tr(context, source)
    }

    /// Translate with parameters using the active snapshot.
    #[must_use]
    pub fn translate(&self, context: &str, source: &str, params: &[&dyn Display]) -> String {
        self.active.translate(context, source, params)
    }

    /// Load missing chain catalogs, swap the snapshot and broadcast.
    fn switch(&mut self, locale: &LocaleTag, persist: bool) -> Result<BroadcastReport, SwitchError> {
        let chain = self.resolver.chain(locale);
        let mut last_error: Option<LoadError> = None;
        for link in chain.links() {
            if self.store.contains(link.as_str()) {
                continue;
            }
            match self.loader.load(link) {
                Ok(catalog) => {
                    self.store.insert_shared(catalog);
                }
                Err(err) if err.is_not_found() => {}
                Err(err) => last_error = Some(err),
            }
        }

        let selection = self.resolver.select(locale, &self.store);
        if selection.is_source_only() && !locale.same_language(self.resolver.source_locale()) {
            tracing::warn!(
                "Cannot switch to locale '{}': no catalog available; keeping '{}'",
                locale,
                self.locale()
            );
            return Err(SwitchError::LocaleUnavailable {
                locale: locale.clone(),
                last_error,
            });
        }

        let translator = Arc::new(Translator::from_selection(
            &selection,
            Arc::clone(&self.diagnostics),
        ));
        let previous = std::mem::replace(&mut self.active, Arc::clone(&translator));
        tracing::info!(
            "Switched locale '{}' -> '{}' (catalogs: {:?})",
            previous.locale(),
            locale,
            translator
                .chain_locales()
                .iter()
                .map(|tag| tag.as_str())
                .collect::<Vec<_>>()
        );

        if persist
            && let Some(prefs) = &self.preferences
            && let Err(err) = prefs.save(Some(locale))
        {
            tracing::warn!("Failed to save language preference: {}", err);
        }

        Ok(self.broadcaster.on_locale_changed(&translator))
    }
}
