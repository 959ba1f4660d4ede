//! Error types for catalog loading and locale switching.
//!
//! Every error here is recoverable: the host logs it and keeps running with
//! whatever catalogs it already has, worst case showing source text.

use std::path::PathBuf;

use crate::i18n::locale::LocaleTag;

/// Failure to turn a serialized catalog into a [`Catalog`](crate::i18n::Catalog).
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The document is not well-formed XML or not a Linguist catalog.
    #[error("malformed catalog at byte {position}: {reason}")]
    Malformed {
        /// Byte offset in the document where the problem was detected.
        position: u64,
        /// Human readable description.
        reason: String,
    },
    /// The root element has no (or an empty) `language` attribute.
    #[error("catalog does not declare a locale tag (missing or empty `language` attribute)")]
    MissingLocaleTag,
    /// The same (source, disambiguation) pair appears twice in one context.
    #[error("duplicate message in context '{context}': {source_text:?}")]
    DuplicateMessage {
        /// Context holding both copies.
        context: String,
        /// Source text of the repeated message.
        source_text: String,
        /// Disambiguation comment of the repeated message, if any.
        disambiguation: Option<String>,
    },
    /// The catalog file could not be read.
    #[error("failed to read catalog {}: {source}", .path.display())]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file found for a locale declares a different locale.
    #[error(
        "catalog {} declares locale '{found}' but '{expected}' was requested",
        .path.display()
    )]
    LocaleMismatch {
        /// File that was loaded.
        path: PathBuf,
        /// Locale the file was loaded for.
        expected: LocaleTag,
        /// Locale declared inside the file.
        found: LocaleTag,
    },
    /// No catalog file exists for the locale in any search directory.
    #[error(
        "no catalog file for locale '{locale}' (searched {count} directories)",
        count = .searched.len()
    )]
    NotFound {
        /// Locale that was requested.
        locale: LocaleTag,
        /// Directories that were searched.
        searched: Vec<PathBuf>,
    },
}

impl LoadError {
    /// Shorthand for [`LoadError::Malformed`].
    pub(crate) fn malformed(position: u64, reason: impl Into<String>) -> Self {
        Self::Malformed {
            position,
            reason: reason.into(),
        }
    }

    /// Whether the error only means "this locale has no catalog".
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Failure to switch the active locale. The previous locale stays active.
#[derive(Debug, thiserror::Error)]
pub enum SwitchError {
    /// No catalog anywhere in the locale's fallback chain could be loaded.
    #[error("locale '{locale}' is unavailable: no catalog in its fallback chain could be loaded")]
    LocaleUnavailable {
        /// Locale that was requested.
        locale: LocaleTag,
        /// Last load failure other than "file not found", if any.
        #[source]
        last_error: Option<LoadError>,
    },
}
