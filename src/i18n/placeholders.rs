//! Positional placeholder substitution (`%1`, `%L2`, `%n`).
//!
//! Markers are replaced independently of where they sit in the template, so
//! `hace %1h` and `%1小时前` both work with the same argument list. Anything
//! that cannot be resolved is left in the output verbatim.

use std::collections::{BTreeSet, HashSet};
use std::fmt::{Display, Write as _};
use std::sync::Mutex;

/// Result of substituting one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substituted {
    /// Rendered text.
    pub text: String,
    /// Markers left literal because no argument matched them.
    pub unresolved: Vec<String>,
}

/// What: Replace placeholders in a template.
///
/// Inputs:
/// - `template`: Translation (or source) template
/// - `params`: Positional arguments; `%N` takes `params[N-1]`
/// - `count`: Plural count substituted for `%n`, if any
///
/// Output:
/// - `Substituted` with the rendered text and any unresolved markers
///
/// Details:
/// - Up to two digits are read after `%` (`%1` .. `%99`)
/// - `%L1` is treated like `%1`; `%Ln` like `%n`
/// - `%0`, indices past the end of `params`, and `%n` without a count stay
///   literal and are reported in `unresolved`
/// - A `%` not followed by a marker is copied as-is
#[must_use]
pub fn substitute(template: &str, params: &[&dyn Display], count: Option<i64>) -> Substituted {
    if !template.contains('%') {
        return Substituted {
            text: template.to_string(),
            unresolved: Vec::new(),
        };
    }

    let bytes = template.as_bytes();
    let mut text = String::with_capacity(template.len() + 16);
    let mut unresolved = Vec::new();
    let mut copied_to = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        let mut j = i + 1;
        if bytes.get(j) == Some(&b'L') {
            j += 1;
        }

        if bytes.get(j) == Some(&b'n') {
            let end = j + 1;
            if let Some(n) = count {
                text.push_str(&template[copied_to..i]);
                let _ = write!(text, "{n}");
                copied_to = end;
            } else {
                unresolved.push(template[i..end].to_string());
            }
            i = end;
            continue;
        }

        let digits_start = j;
        while j < bytes.len() && j - digits_start < 2 && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j == digits_start {
            i += 1;
            continue;
        }

        let arg = template[digits_start..j]
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| params.get(idx));
        if let Some(arg) = arg {
            text.push_str(&template[copied_to..i]);
            let _ = write!(text, "{arg}");
            copied_to = j;
        } else {
            unresolved.push(template[i..j].to_string());
        }
        i = j;
    }

    text.push_str(&template[copied_to..]);
    Substituted { text, unresolved }
}

/// What: Collect the positional indices used by a template.
///
/// Inputs:
/// - `template`: Template text
///
/// Output:
/// - Sorted set of indices (`%1` and `%L1` both yield `1`); `%n` is ignored
///
/// Details:
/// - Used to compare a translation's markers against its source text
#[must_use]
pub fn placeholder_indices(template: &str) -> BTreeSet<u8> {
    let bytes = template.as_bytes();
    let mut found = BTreeSet::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        let mut j = i + 1;
        if bytes.get(j) == Some(&b'L') {
            j += 1;
        }
        let start = j;
        while j < bytes.len() && j - start < 2 && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > start
            && let Ok(n) = template[start..j].parse::<u8>()
            && n > 0
        {
            found.insert(n);
        }
        i = j.max(i + 1);
    }
    found
}

/// A template with markers that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedPlaceholder {
    /// Offending template.
    pub template: String,
    /// Markers left literal.
    pub markers: Vec<String>,
}

/// Shared sink for placeholder warnings.
///
/// Each distinct template is reported once for the life of the sink, so a
/// bad catalog entry rendered on every paint logs a single warning.
#[derive(Debug, Default)]
pub struct PlaceholderDiagnostics {
    reported: Mutex<HashSet<String>>,
}

impl PlaceholderDiagnostics {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// What: Report unresolved markers for a template.
    ///
    /// Inputs:
    /// - `template`: Template that was rendered
    /// - `markers`: Markers left literal
    ///
    /// Output:
    /// - `Some(UnresolvedPlaceholder)` the first time a template is reported,
    ///   `None` for repeats
    pub fn report(&self, template: &str, markers: &[String]) -> Option<UnresolvedPlaceholder> {
        let mut reported = match self.reported.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if !reported.insert(template.to_string()) {
            return None;
        }
        tracing::warn!(
            template = %template,
            markers = ?markers,
            "Unresolved placeholder in translation template; leaving marker as-is"
        );
        Some(UnresolvedPlaceholder {
            template: template.to_string(),
            markers: markers.to_vec(),
        })
    }

    /// Number of distinct templates reported so far.
    #[must_use]
    pub fn reported_count(&self) -> usize {
        match self.reported.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Whether a template has been reported.
    #[must_use]
    pub fn was_reported(&self, template: &str) -> bool {
        match self.reported.lock() {
            Ok(guard) => guard.contains(template),
            Err(poisoned) => poisoned.into_inner().contains(template),
        }
    }
}
