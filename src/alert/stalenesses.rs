/// Reading age: staleness checks and "time since last reading" text.
///
/// Telemetry normally arrives every 15 minutes. A station whose latest value
/// is much older than that is flagged on its page so readers don't mistake
/// an old level for the current one.
///
/// # Clock injection
/// All functions accept a `now: DateTime<Utc>` parameter rather than calling
/// `Utc::now()` internally, which keeps them deterministic in tests.

use chrono::{DateTime, Utc};

/// Default age after which a station's latest reading is flagged.
pub const DEFAULT_STALE_AFTER_MINUTES: u64 = 60;

// ---------------------------------------------------------------------------
// Staleness check
// ---------------------------------------------------------------------------

/// Returns `true` if `reading_time` is older than `max_age_minutes`
/// relative to `now`.
///
/// Staleness is strictly greater than the threshold:
///   age > max_age_minutes  →  stale
///   age == max_age_minutes →  not stale
///
/// Readings timestamped in the future are never stale.
pub fn is_stale_at(reading_time: DateTime<Utc>, max_age_minutes: u64, now: DateTime<Utc>) -> bool {
    let age_minutes = (now - reading_time).num_minutes();
    age_minutes > 0 && age_minutes as u64 > max_age_minutes
}

// ---------------------------------------------------------------------------
// Elapsed time text
// ---------------------------------------------------------------------------

/// Human-readable age of a reading, e.g. `15 minutes ago`.
///
/// Under a minute reads `just now`; up to a day reads in whole minutes or
/// hours; anything older reads `more than 1 day ago`.
pub fn format_elapsed_at(reading_time: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - reading_time).num_minutes().max(0);
    let hours = minutes / 60;
    match (minutes, hours) {
        (0, _) => "just now".to_string(),
        (1, _) => "1 minute ago".to_string(),
        (m, 0) => format!("{} minutes ago", m),
        (_, 1) => "1 hour ago".to_string(),
        (_, h) if h < 24 => format!("{} hours ago", h),
        _ => "more than 1 day ago".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
