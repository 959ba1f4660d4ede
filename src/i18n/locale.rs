//! Locale tags in the Qt Linguist form (`es_ES`, `zh_CN`, `zh_Hans_CN`).

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Longest tag accepted before normalization.
const MAX_TAG_LEN: usize = 20;

/// Errors produced when a locale tag cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    /// The input was empty or whitespace only.
    #[error("locale tag is empty")]
    Empty,
    /// The input does not look like `language[_Script][_REGION]`.
    #[error(
        "invalid locale tag '{0}': expected language[_Script][_REGION] (e.g. 'es_ES', 'zh_CN')"
    )]
    Invalid(String),
}

/// Normalized locale tag.
///
/// Canonical form is `lang[_Script][_REGION]`: language lowercase, script
/// title-cased, region uppercase. Parsing accepts `-` or `_` separators and
/// drops encoding (`.UTF-8`) and modifier (`@euro`) suffixes, so values read
/// from `LANG` can be used directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocaleTag(String);

impl LocaleTag {
    /// What: Parse and normalize a locale tag.
    ///
    /// Inputs:
    /// - `raw`: Tag such as `"es_ES"`, `"zh-CN"`, `"de_DE.UTF-8"` or `"en"`
    ///
    /// Output:
    /// - Normalized `LocaleTag`, or `TagError` when the input is not a tag
    ///
    /// # Errors
    /// - `TagError::Empty` for empty input
    /// - `TagError::Invalid` for bad characters, empty segments, unknown
    ///   segment shapes, more than three segments or overlong input
    ///
    /// Details:
    /// - Language must be 2-3 ASCII letters; script 4 letters; region 2
    ///   letters or 3 digits
    /// - `"C"` and `"POSIX"` are rejected (they name no language)
    pub fn parse(raw: &str) -> Result<Self, TagError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TagError::Empty);
        }
        let invalid = || TagError::Invalid(trimmed.to_string());

        let base = trimmed.split(['.', '@']).next().unwrap_or_default();
        if base.is_empty() || base.len() > MAX_TAG_LEN {
            return Err(invalid());
        }

        let parts: Vec<&str> = base.split(['_', '-']).collect();
        if parts.len() > 3
            || parts
                .iter()
                .any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_alphanumeric()))
        {
            return Err(invalid());
        }

        let language = parts[0];
        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(invalid());
        }

        let mut normalized = language.to_ascii_lowercase();
        let mut seen_region = false;
        for (position, part) in parts.iter().enumerate().skip(1) {
            normalized.push('_');
            let alphabetic = part.chars().all(|c| c.is_ascii_alphabetic());
            match part.len() {
                // A script must come straight after the language.
                4 if alphabetic && position == 1 => {
                    let mut chars = part.chars();
                    if let Some(first) = chars.next() {
                        normalized.push(first.to_ascii_uppercase());
                        normalized.push_str(&chars.as_str().to_ascii_lowercase());
                    }
                }
                2 if alphabetic && !seen_region => {
                    normalized.push_str(&part.to_ascii_uppercase());
                    seen_region = true;
                }
                3 if part.chars().all(|c| c.is_ascii_digit()) && !seen_region => {
                    normalized.push_str(part);
                    seen_region = true;
                }
                _ => return Err(invalid()),
            }
        }

        Ok(Self(normalized))
    }

    /// `en`, the language Tomeo's source strings are written in.
    pub(crate) fn english() -> Self {
        Self("en".to_string())
    }

    /// Normalized tag text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Language subtag (`"zh"` for `zh_CN`).
    #[must_use]
    pub fn language(&self) -> &str {
        self.0.split('_').next().unwrap_or(&self.0)
    }

    /// Language-only tag (`zh_CN` -> `zh`).
    #[must_use]
    pub fn language_tag(&self) -> Self {
        Self(self.language().to_string())
    }

    /// Whether this tag carries no script or region.
    #[must_use]
    pub fn is_language_only(&self) -> bool {
        !self.0.contains('_')
    }

    /// Whether both tags name the same language.
    #[must_use]
    pub fn same_language(&self, other: &Self) -> bool {
        self.language() == other.language()
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LocaleTag {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for LocaleTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for LocaleTag {
    fn borrow(&self) -> &str {
        &self.0
    }
}
