//! Plural form selection for numerus messages.
//!
//! Linguist stores numerus translations as an ordered list of
//! `<numerusform>` entries; the rule for the catalog's language picks the
//! index for a given count. Index order follows the gettext/Qt tables.

use crate::i18n::locale::LocaleTag;

/// Plural rule family of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralRule {
    /// One form for every count (Chinese, Japanese, Korean, ...).
    Single,
    /// `1` is singular, everything else plural (English, Spanish, German, ...).
    OneOther,
    /// `0` and `1` are singular (French, Brazilian Portuguese).
    French,
    /// Russian/Ukrainian style three forms keyed on the last digits.
    EastSlavic,
    /// Polish three forms.
    Polish,
    /// Czech/Slovak three forms.
    Czech,
}

impl PluralRule {
    /// What: Pick the rule for a language subtag.
    ///
    /// Inputs:
    /// - `language`: Lowercase language subtag (e.g. `"zh"`, `"es"`)
    ///
    /// Output:
    /// - Matching rule; unknown languages use `OneOther`
    #[must_use]
    pub fn for_language(language: &str) -> Self {
        match language {
            "zh" | "ja" | "ko" | "vi" | "th" | "id" | "ms" | "tr" | "fa" | "ka" => Self::Single,
            "fr" => Self::French,
            "ru" | "uk" | "be" | "sr" | "hr" | "bs" => Self::EastSlavic,
            "pl" => Self::Polish,
            "cs" | "sk" => Self::Czech,
            _ => Self::OneOther,
        }
    }

    /// Rule for a full locale; Brazilian Portuguese differs from `pt`.
    #[must_use]
    pub fn for_locale(locale: &LocaleTag) -> Self {
        if locale.as_str() == "pt_BR" {
            return Self::French;
        }
        Self::for_language(locale.language())
    }

    /// Number of plural forms a catalog in this language should carry.
    #[must_use]
    pub const fn form_count(self) -> usize {
        match self {
            Self::Single => 1,
            Self::OneOther | Self::French => 2,
            Self::EastSlavic | Self::Polish | Self::Czech => 3,
        }
    }

    /// What: Form index for a count.
    ///
    /// Inputs:
    /// - `count`: Quantity being described; negative values use their magnitude
    ///
    /// Output:
    /// - Index into the message's `<numerusform>` list
    #[must_use]
    pub const fn form_index(self, count: i64) -> usize {
        let n = count.unsigned_abs();
        let n10 = n % 10;
        let n100 = n % 100;
        match self {
            Self::Single => 0,
            Self::OneOther => {
                if n == 1 {
                    0
                } else {
                    1
                }
            }
            Self::French => {
                if n <= 1 {
                    0
                } else {
                    1
                }
            }
            Self::EastSlavic => {
                if n10 == 1 && n100 != 11 {
                    0
                } else if n10 >= 2 && n10 <= 4 && (n100 < 10 || n100 >= 20) {
                    1
                } else {
                    2
                }
            }
            Self::Polish => {
                if n == 1 {
                    0
                } else if n10 >= 2 && n10 <= 4 && (n100 < 12 || n100 > 14) {
                    1
                } else {
                    2
                }
            }
            Self::Czech => {
                if n == 1 {
                    0
                } else if n >= 2 && n <= 4 {
                    1
                } else {
                    2
                }
            }
        }
    }
}
