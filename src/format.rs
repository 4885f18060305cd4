//! Display formatting shared by the view models.
//!
//! Levels are always shown to two decimal places. Times are shown in UK
//! local time (GMT, or BST between the last Sundays of March and October)
//! in the `10:15am` / `19 October 2026` style used across the site.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};
use rust_decimal::prelude::*;

/// Formats a level to exactly two decimal places.
///
/// Rounds on the exact value of the float with halves going away from
/// zero, so `2.125` becomes `2.13` (not the half-to-even `2.12`) while
/// `1.005`, stored just below the half, stays `1.00`.
pub fn to_fixed_2(value: f64) -> String {
    match Decimal::from_f64_retain(value) {
        Some(exact) => {
            let rounded = exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            format!("{:.2}", rounded)
        }
        // NaN, infinities and values beyond the decimal range
        None => format!("{:.2}", value),
    }
}

/// Converts a UTC instant to UK wall-clock time.
pub fn uk_local(dt: DateTime<Utc>) -> NaiveDateTime {
    let naive = dt.naive_utc();
    if is_british_summer_time(naive) {
        naive + Duration::hours(1)
    } else {
        naive
    }
}

/// BST runs from 01:00 UTC on the last Sunday in March to 01:00 UTC on the
/// last Sunday in October.
fn is_british_summer_time(utc: NaiveDateTime) -> bool {
    let year = utc.year();
    let one_am = NaiveTime::from_hms_opt(1, 0, 0);
    let start = last_sunday(year, 3).zip(one_am).map(|(d, t)| d.and_time(t));
    let end = last_sunday(year, 10).zip(one_am).map(|(d, t)| d.and_time(t));
    match (start, end) {
        (Some(start), Some(end)) => utc >= start && utc < end,
        _ => false,
    }
}

fn last_sunday(year: i32, month: u32) -> Option<NaiveDate> {
    let mut day = NaiveDate::from_ymd_opt(year, month + 1, 1)?.pred_opt()?;
    while day.weekday() != Weekday::Sun {
        day = day.pred_opt()?;
    }
    Some(day)
}

/// `10:15am`
pub fn format_time(dt: DateTime<Utc>) -> String {
    uk_local(dt).format("%-I:%M%P").to_string()
}

/// `19 October 2026`
pub fn format_date(dt: DateTime<Utc>) -> String {
    uk_local(dt).format("%-d %B %Y").to_string()
}

/// `10:15am on 19 October 2026`
pub fn format_time_on_date(dt: DateTime<Utc>) -> String {
    format!("{} on {}", format_time(dt), format_date(dt))
}

/// Escapes text for inclusion in HTML fragments built by the view models.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Form-encodes query parameters, e.g. `q=St+Ives&severity=2`.
pub fn query_string(params: &[(&str, &str)]) -> String {
    reqwest::Url::parse_with_params("http://localhost/", params)
        .ok()
        .and_then(|url| url.query().map(str::to_string))
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
