//! Languages offered in Tomeo's settings dialog.

use std::fmt;

use crate::i18n::locale::LocaleTag;

/// A language the host lets users pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// English; the source language, shown without a catalog.
    English,
    /// Simplified Chinese.
    Chinese,
    /// Spanish (Spain).
    Spanish,
}

impl Language {
    /// Every language in settings-dialog order.
    pub const ALL: [Self; 3] = [Self::English, Self::Chinese, Self::Spanish];

    /// Locale code (`en`, `zh_CN`, `es_ES`).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Chinese => "zh_CN",
            Self::Spanish => "es_ES",
        }
    }

    /// Name shown in the language list, in the language itself.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Chinese => "中文",
            Self::Spanish => "Español",
        }
    }

    /// Parsed locale tag for [`Language::code`].
    #[must_use]
    pub fn locale_tag(self) -> LocaleTag {
        match LocaleTag::parse(self.code()) {
            Ok(tag) => tag,
            Err(_) => LocaleTag::english(),
        }
    }

    /// What: Map a locale to the offered language with the same language
    /// subtag.
    ///
    /// Inputs:
    /// - `locale`: Any locale (`zh_TW`, `es_MX`, `en_GB`)
    ///
    /// Output:
    /// - Matching language, or `None` when the host does not offer it
    #[must_use]
    pub fn from_locale(locale: &LocaleTag) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.locale_tag().same_language(locale))
    }

    /// Display names of every language, in order.
    #[must_use]
    pub fn available_display_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|lang| lang.display_name()).collect()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
