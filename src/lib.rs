//! Library entry for Tomeo's localization engine.
//!
//! Exposes catalog loading, locale resolution, live retranslation and
//! relative time formatting for the player UI and integration tests.

pub mod i18n;
pub mod paths;
