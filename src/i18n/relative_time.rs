//! "Time ago" labels for feed items (`5m ago`, `hace 5m`, `5分钟前`).

use chrono::{DateTime, Utc};

use crate::i18n::translations::Translator;

/// Context holding the relative time messages.
pub const VIDEO_POST_CARD: &str = "VideoPostCard";

/// Seconds per minute.
const MINUTE: u64 = 60;
/// Seconds per hour.
const HOUR: u64 = 60 * MINUTE;
/// Seconds per day.
const DAY: u64 = 24 * HOUR;

/// Magnitude of an elapsed duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ElapsedBucket {
    /// Under a minute.
    Seconds,
    /// Under an hour.
    Minutes,
    /// Under a day.
    Hours,
    /// A day or more.
    Days,
}

impl ElapsedBucket {
    /// Source text used as the lookup key.
    #[must_use]
    pub const fn source_template(self) -> &'static str {
        match self {
            Self::Seconds => "%1s ago",
            Self::Minutes => "%1m ago",
            Self::Hours => "%1h ago",
            Self::Days => "%1d ago",
        }
    }

    /// Length of one unit in seconds.
    #[must_use]
    pub const fn unit_seconds(self) -> u64 {
        match self {
            Self::Seconds => 1,
            Self::Minutes => MINUTE,
            Self::Hours => HOUR,
            Self::Days => DAY,
        }
    }
}

/// Bucket and whole-unit value of an elapsed duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed {
    /// Chosen magnitude.
    pub bucket: ElapsedBucket,
    /// Whole units, rounded down.
    pub value: u64,
}

/// What: Pick the bucket for an elapsed duration.
///
/// Inputs:
/// - `seconds`: `now - event` in seconds; negative values clamp to 0
///
/// Output:
/// - Bucket and floored value (`3599` -> 59 minutes)
#[must_use]
pub fn bucket_elapsed(seconds: i64) -> Elapsed {
    let secs = u64::try_from(seconds).unwrap_or(0);
    let bucket = if secs < MINUTE {
        ElapsedBucket::Seconds
    } else if secs < HOUR {
        ElapsedBucket::Minutes
    } else if secs < DAY {
        ElapsedBucket::Hours
    } else {
        ElapsedBucket::Days
    };
    Elapsed {
        bucket,
        value: secs / bucket.unit_seconds(),
    }
}

/// Render an elapsed duration in the `VideoPostCard` context.
#[must_use]
pub fn format_elapsed(translator: &Translator, seconds: i64) -> String {
    format_elapsed_in(translator, seconds, VIDEO_POST_CARD)
}

/// What: Render an elapsed duration through the lookup service.
///
/// Inputs:
/// - `translator`: Active lookup snapshot
/// - `seconds`: `now - event` in seconds
/// - `context`: Context holding the `%1s ago` family of messages
///
/// Output:
/// - Localized label; `0s ago` style for zero or negative input
#[must_use]
pub fn format_elapsed_in(translator: &Translator, seconds: i64, context: &str) -> String {
    let elapsed = bucket_elapsed(seconds);
    translator.translate(context, elapsed.bucket.source_template(), &[&elapsed.value])
}

/// What: Render the time since an event.
///
/// Inputs:
/// - `translator`: Active lookup snapshot
/// - `event`: When the event happened
/// - `now`: Current time
///
/// Output:
/// - Localized label; events in the future render as `0s ago`
#[must_use]
pub fn format_since(translator: &Translator, event: DateTime<Utc>, now: DateTime<Utc>) -> String {
    format_elapsed(translator, now.signed_duration_since(event).num_seconds())
}
