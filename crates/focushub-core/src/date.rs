//! Calendar helpers shared by habits, planner and stats.
//!
//! All date keys use the `YYYY-MM-DD` form and weeks start on Monday.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};

/// Canonical day-key format.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Format a date as its canonical `YYYY-MM-DD` key.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parse a canonical day key. Returns `None` for anything else.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT).ok()
}

/// Monday of the week containing `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_monday());
    date - Days::new(back)
}

/// The seven days of the week starting at `start`.
pub fn week_dates(start: NaiveDate) -> [NaiveDate; 7] {
    std::array::from_fn(|i| start + Days::new(i as u64))
}

/// The `n` most recent days ending at `today`, oldest first.
pub fn last_n_dates(today: NaiveDate, n: usize) -> Vec<NaiveDate> {
    (0..n)
        .rev()
        .map(|back| today - Days::new(back as u64))
        .collect()
}

/// Epoch milliseconds for a timestamp, clamped at zero for pre-epoch values.
pub fn epoch_ms(at: DateTime<Utc>) -> u64 {
    at.timestamp_millis().max(0) as u64
}
