//! Reporting windows
//!
//! A `PeriodWindow` is a pair of calendar dates. Both bounds are inclusive:
//! a record dated exactly on `end` belongs to the window.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LedgerLensError, LedgerLensResult};

/// A concrete date range produced for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodWindow {
    /// Create a window, rejecting `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> LedgerLensResult<Self> {
        if start > end {
            return Err(LedgerLensError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A window covering a single day
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Check if a date falls within this window
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// `end - start` in whole days (0 for a single-day window)
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// The comparison window immediately before this one, of equal span,
    /// with no gap and no overlap
    ///
    /// Fails when that window would start before the earliest representable date.
    pub fn previous(&self) -> LedgerLensResult<Self> {
        let out_of_range = || {
            LedgerLensError::Validation(format!(
                "No comparison window precedes {} within the supported date range",
                self
            ))
        };
        let end = self
            .start
            .checked_sub_signed(Duration::days(1))
            .ok_or_else(out_of_range)?;
        let start = end
            .checked_sub_signed(self.end - self.start)
            .ok_or_else(out_of_range)?;
        Ok(Self { start, end })
    }

    /// Check whether two windows share at least one day
    pub fn overlaps(&self, other: &PeriodWindow) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Parse a range string: "2025-01-01..2025-01-31"
    pub fn parse(s: &str) -> LedgerLensResult<Self> {
        let s = s.trim();
        let (start, end) = s
            .split_once("..")
            .ok_or_else(|| LedgerLensError::Validation(format!("Invalid range format: {}", s)))?;
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        Self::new(start, end)
    }
}

/// Parse an ISO date (YYYY-MM-DD)
pub fn parse_date(s: &str) -> LedgerLensResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        LedgerLensError::Validation(format!("Invalid date format: {}. Use YYYY-MM-DD", s.trim()))
    })
}

impl fmt::Display for PeriodWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_rejects_inverted_range() {
        let err = PeriodWindow::new(date(2025, 2, 1), date(2025, 1, 1)).unwrap_err();
        assert!(matches!(err, LedgerLensError::InvalidRange { .. }));
        assert!(PeriodWindow::new(date(2025, 1, 1), date(2025, 1, 1)).is_ok());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let window = PeriodWindow::new(date(2025, 1, 1), date(2025, 1, 31)).unwrap();
        assert!(window.contains(date(2025, 1, 1)));
        assert!(window.contains(date(2025, 1, 31)));
        assert!(!window.contains(date(2025, 2, 1)));
        assert!(!window.contains(date(2024, 12, 31)));
    }

    #[test]
    fn test_previous_window_is_adjacent() {
        let window = PeriodWindow::new(date(2025, 3, 1), date(2025, 3, 31)).unwrap();
        let prev = window.previous().unwrap();
        assert_eq!(prev.end, date(2025, 2, 28));
        assert_eq!(prev.start, date(2025, 1, 29));
        assert_eq!(prev.span_days(), window.span_days());
        assert!(!prev.overlaps(&window));
    }

    #[test]
    fn test_previous_of_single_day() {
        let prev = PeriodWindow::day(date(2025, 1, 1)).previous().unwrap();
        assert_eq!(prev, PeriodWindow::day(date(2024, 12, 31)));
    }

    #[test]
    fn test_previous_before_earliest_date_is_an_error() {
        let first_day = PeriodWindow::day(NaiveDate::MIN);
        assert!(first_day.previous().unwrap_err().is_validation());

        let near_start = NaiveDate::MIN + Duration::days(10);
        let window = PeriodWindow::new(near_start, near_start + Duration::days(30)).unwrap();
        assert!(window.previous().is_err());

        let second_day = PeriodWindow::day(NaiveDate::MIN + Duration::days(1));
        assert_eq!(second_day.previous().unwrap(), PeriodWindow::day(NaiveDate::MIN));
    }

    #[test]
    fn test_parse_and_display() {
        let window = PeriodWindow::parse("2025-01-01..2025-01-15").unwrap();
        assert_eq!(window.to_string(), "2025-01-01..2025-01-15");
        assert!(PeriodWindow::parse("2025-01-15..2025-01-01").is_err());
        assert!(PeriodWindow::parse("2025-01").is_err());
    }
}
