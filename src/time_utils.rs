// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time parsing, formatting and zone arithmetic.
//!
//! Routine times are wall-clock strings in a fixed reference zone. Turning
//! one into an absolute instant needs the zone's UTC offset *at* that
//! instant, which in turn depends on the instant (DST). [`wall_time_to_instant`]
//! resolves this with two offset lookups; inside the skipped or repeated hour
//! of a transition the result is whichever side the second lookup lands on.

use chrono::{
    DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Offset, SecondsFormat,
    TimeZone, Utc,
};

/// Format a UTC timestamp as ISO-8601 with millisecond precision and a `Z` suffix.
pub fn format_iso_millis(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current instant formatted with [`format_iso_millis`].
pub fn now_iso() -> String {
    format_iso_millis(Utc::now())
}

/// Parse a datetime string into an instant.
///
/// Accepts RFC 3339, zone-less `YYYY-MM-DDTHH:MM[:SS[.fff]]` (read as UTC)
/// and date-only `YYYY-MM-DD` (UTC midnight).
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Milliseconds since the Unix epoch, used as the sorted-store score.
pub fn epoch_millis(date: DateTime<Utc>) -> i64 {
    date.timestamp_millis()
}

/// Parse a strict `HH:MM` wall-clock string.
pub fn parse_time_local(raw: &str) -> Option<NaiveTime> {
    if raw.len() != 5 || raw.as_bytes()[2] != b':' {
        return None;
    }
    NaiveTime::parse_from_str(raw, "%H:%M").ok()
}

/// Format a calendar date as `YYYY-MM-DD`.
pub fn format_ymd(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Answers "what is the UTC offset of the reference zone at this instant".
pub trait OffsetOracle: Send + Sync {
    /// Offset east of UTC, in minutes.
    fn offset_minutes_at(&self, instant: DateTime<Utc>) -> i32;
}

impl OffsetOracle for chrono_tz::Tz {
    fn offset_minutes_at(&self, instant: DateTime<Utc>) -> i32 {
        self.offset_from_utc_datetime(&instant.naive_utc())
            .fix()
            .local_minus_utc()
            / 60
    }
}

/// The local calendar date in the oracle's zone at `now`.
pub fn local_date_at(oracle: &dyn OffsetOracle, now: DateTime<Utc>) -> NaiveDate {
    let offset = Duration::minutes(oracle.offset_minutes_at(now) as i64);
    (now.naive_utc() + offset).date()
}

/// Monday of the ISO week containing `date`.
pub fn week_monday(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Convert a wall-clock time on a local date to an absolute instant.
pub fn wall_time_to_instant(
    oracle: &dyn OffsetOracle,
    date: NaiveDate,
    time: NaiveTime,
) -> DateTime<Utc> {
    let wall = date.and_time(time).and_utc();

    // First guess treats the wall time as UTC; the offset is then looked up
    // again at the corrected instant.
    let first = oracle.offset_minutes_at(wall);
    let refined = wall - Duration::minutes(first as i64);
    let second = oracle.offset_minutes_at(refined);

    wall - Duration::minutes(second as i64)
}
