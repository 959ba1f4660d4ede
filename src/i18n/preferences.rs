//! Persisted language choice (`language.toml`).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::i18n::locale::LocaleTag;

/// On-disk shape of the preference file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePreference {
    /// Chosen locale; absent means "follow the system".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

/// Failure to save the preference file.
#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    /// The file or its directory could not be written.
    #[error("failed to write language preference {}: {source}", .path.display())]
    Io {
        /// File being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The preference could not be encoded.
    #[error("failed to encode language preference: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Reads and writes the language preference file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceStore {
    /// Preference file path.
    path: PathBuf,
}

impl PreferenceStore {
    /// Store backed by an explicit file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `$HOME/.config/tomeo/language.toml`.
    #[must_use]
    pub fn default_location() -> Self {
        Self::new(crate::paths::config_dir().join("language.toml"))
    }

    /// Preference file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// What: Read the saved locale.
    ///
    /// Output:
    /// - Saved tag, or `None` when there is no usable preference
    ///
    /// Details:
    /// - A missing file is silent; unreadable, corrupt or invalid values are
    ///   logged as warnings and treated as "no preference"
    #[must_use]
    pub fn load(&self) -> Option<LocaleTag> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(
                    "Failed to read language preference {}: {}",
                    self.path.display(),
                    err
                );
                return None;
            }
        };
        let pref: LanguagePreference = match toml::from_str(&contents) {
            Ok(pref) => pref,
            Err(err) => {
                tracing::warn!(
                    "Ignoring corrupt language preference {}: {}",
                    self.path.display(),
                    err
                );
                return None;
            }
        };
        let raw = pref.locale?;
        match LocaleTag::parse(&raw) {
            Ok(tag) => Some(tag),
            Err(err) => {
                tracing::warn!("Ignoring saved locale '{}': {}", raw, err);
                None
            }
        }
    }

    /// What: Save (or clear) the preferred locale.
    ///
    /// Inputs:
    /// - `locale`: Locale to save; `None` clears the choice
    ///
    /// # Errors
    /// - `PreferenceError::Io` when the directory or file cannot be written
    /// - `PreferenceError::Serialize` if encoding fails
    pub fn save(&self, locale: Option<&LocaleTag>) -> Result<(), PreferenceError> {
        let pref = LanguagePreference {
            locale: locale.map(ToString::to_string),
        };
        let body = toml::to_string(&pref)?;
        let io_err = |source| PreferenceError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&self.path, body).map_err(io_err)?;
        tracing::debug!(
            "Saved language preference {:?} to {}",
            pref.locale,
            self.path.display()
        );
        Ok(())
    }
}
