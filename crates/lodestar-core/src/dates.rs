//! Calendar-day boundary helpers.
//!
//! The application's notion of "day" is the caller's local calendar date as
//! an ISO `yyyy-MM-dd` key, never a UTC day boundary or a duration in hours.
//! All streak arithmetic goes through these date-only functions so handlers
//! stay free of wall-clock reads.

use crate::error::{LodestarError, Result};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};

pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Render a date as its ISO `yyyy-MM-dd` day key.
pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Parse an ISO `yyyy-MM-dd` day key.
pub fn parse_day_key(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DAY_KEY_FORMAT)
        .map_err(|_| LodestarError::InvalidDayKey(s.to_string()))
}

/// Whole calendar days from `earlier` to `today`. Negative when `today`
/// precedes `earlier`. Operates on date-only values, so two instants a
/// minute apart across midnight are one day apart.
pub fn days_between(today: NaiveDate, earlier: NaiveDate) -> i64 {
    (today - earlier).num_days()
}

/// The caller's local calendar date for a UTC instant, given a timezone
/// offset in minutes east of UTC (JavaScript's `getTimezoneOffset()`
/// negated). Offsets outside ±24h fall back to the UTC date.
pub fn local_date(utc: DateTime<Utc>, offset_minutes: i32) -> NaiveDate {
    match FixedOffset::east_opt(offset_minutes * 60) {
        Some(offset) => utc.with_timezone(&offset).date_naive(),
        None => utc.date_naive(),
    }
}

/// The Monday on or before `date` — the canonical week key for pulses.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let days_from_monday = date.weekday().num_days_from_monday() as i64;
    date - chrono::Duration::days(days_from_monday)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn d(s: &str) -> NaiveDate {
        parse_day_key(s).unwrap()
    }

    #[test]
    fn day_key_round_trip() {
        let date = d("2024-01-10");
        assert_eq!(day_key(date), "2024-01-10");
        assert_eq!(parse_day_key(&day_key(date)).unwrap(), date);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_day_key("not-a-date").is_err());
        assert!(parse_day_key("2024-13-40").is_err());
        assert!(parse_day_key("01/10/2024").is_err());
    }

    #[test]
    fn days_between_consecutive() {
        assert_eq!(days_between(d("2024-01-11"), d("2024-01-10")), 1);
    }

    #[test]
    fn days_between_same_day() {
        assert_eq!(days_between(d("2024-01-10"), d("2024-01-10")), 0);
    }

    #[test]
    fn days_between_negative_for_out_of_order() {
        assert_eq!(days_between(d("2024-01-09"), d("2024-01-10")), -1);
    }

    #[test]
    fn days_between_across_month_boundary() {
        assert_eq!(days_between(d("2024-02-01"), d("2024-01-31")), 1);
    }

    #[test]
    fn days_between_across_leap_day() {
        assert_eq!(days_between(d("2024-03-01"), d("2024-02-28")), 2);
    }

    #[test]
    fn local_date_just_before_midnight_west_of_utc() {
        // 2024-01-11 02:30 UTC is still 2024-01-10 in UTC-5.
        let utc = Utc.with_ymd_and_hms(2024, 1, 11, 2, 30, 0).unwrap();
        assert_eq!(local_date(utc, -300), d("2024-01-10"));
    }

    #[test]
    fn local_date_just_after_midnight_east_of_utc() {
        // 2024-01-10 23:30 UTC is already 2024-01-11 in UTC+2.
        let utc = Utc.with_ymd_and_hms(2024, 1, 10, 23, 30, 0).unwrap();
        assert_eq!(local_date(utc, 120), d("2024-01-11"));
    }

    #[test]
    fn local_date_zero_offset_matches_utc() {
        let utc = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        assert_eq!(local_date(utc, 0), d("2024-01-10"));
    }

    #[test]
    fn local_date_absurd_offset_falls_back_to_utc() {
        let utc = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        assert_eq!(local_date(utc, 100_000), d("2024-01-10"));
    }

    #[test]
    fn week_start_is_monday() {
        // 2024-01-10 is a Wednesday; the week starts on Monday 2024-01-08.
        assert_eq!(week_start(d("2024-01-10")), d("2024-01-08"));
        assert_eq!(week_start(d("2024-01-08")), d("2024-01-08"));
        assert_eq!(week_start(d("2024-01-14")), d("2024-01-08"));
    }
}
