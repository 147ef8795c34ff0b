//! Period resolver
//!
//! Turns a named range ("this-month", "last-quarter", a custom pair of
//! dates) into a concrete `PeriodWindow`, always anchored to a caller-supplied
//! `today` so the result is reproducible.

use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;
use std::str::FromStr;

use crate::error::{LedgerLensError, LedgerLensResult};
use crate::models::PeriodWindow;

/// Range names understood by the resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedRange {
    Today,
    LastWeek,
    ThisMonth,
    LastMonth,
    Last3Months,
    Last6Months,
    LastYear,
    Quarter,
    YearToDate,
    Custom,
}

impl NamedRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::LastWeek => "last-week",
            Self::ThisMonth => "this-month",
            Self::LastMonth => "last-month",
            Self::Last3Months => "last-3-months",
            Self::Last6Months => "last-6-months",
            Self::LastYear => "last-year",
            Self::Quarter => "quarter",
            Self::YearToDate => "ytd",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for NamedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NamedRange {
    type Err = LedgerLensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        match normalized.as_str() {
            "today" => Ok(Self::Today),
            "last-week" => Ok(Self::LastWeek),
            "this-month" | "month" => Ok(Self::ThisMonth),
            "last-month" => Ok(Self::LastMonth),
            "last-3-months" => Ok(Self::Last3Months),
            "last-6-months" => Ok(Self::Last6Months),
            "last-year" => Ok(Self::LastYear),
            "quarter" | "this-quarter" => Ok(Self::Quarter),
            "ytd" | "year" => Ok(Self::YearToDate),
            "custom" => Ok(Self::Custom),
            _ => Err(LedgerLensError::UnknownPeriod(s.trim().to_string())),
        }
    }
}

/// Stateless resolver for reporting windows
pub struct PeriodResolver;

impl PeriodResolver {
    /// Resolve a range name against `today`
    ///
    /// Besides the `NamedRange` names, a month name with a year
    /// ("March 2025", "mar 2025"), "YYYY-MM" and "YYYY-Qn" resolve to that
    /// calendar month or quarter, and an explicit "YYYY-MM-DD..YYYY-MM-DD"
    /// range is taken verbatim.
    pub fn resolve(
        name: &str,
        today: NaiveDate,
        custom: Option<(NaiveDate, NaiveDate)>,
    ) -> LedgerLensResult<PeriodWindow> {
        let lowered = name.trim().to_lowercase();

        if lowered.contains("..") {
            return PeriodWindow::parse(&lowered);
        }
        if let Some(window) = Self::parse_month_name(&lowered) {
            return Ok(window);
        }
        if let Some(window) = Self::parse_year_month(&lowered) {
            return Ok(window);
        }

        let range: NamedRange = name.parse()?;
        let window = Self::resolve_named(range, today, custom)?;
        tracing::debug!(range = %range, %today, %window, "resolved period");
        Ok(window)
    }

    /// Resolve an already-parsed range
    pub fn resolve_named(
        range: NamedRange,
        today: NaiveDate,
        custom: Option<(NaiveDate, NaiveDate)>,
    ) -> LedgerLensResult<PeriodWindow> {
        let months_back =
            |n: i32| shift_months(today, -n).ok_or_else(|| out_of_range(range, today));

        let window = match range {
            NamedRange::Today => PeriodWindow::day(today),
            NamedRange::LastWeek => {
                let start = today
                    .checked_sub_signed(Duration::days(7))
                    .ok_or_else(|| out_of_range(range, today))?;
                span(start, today)
            }
            NamedRange::ThisMonth => span(first_of_month(today), last_of_month(today)),
            NamedRange::LastMonth => {
                let anchor = months_back(1)?;
                span(first_of_month(anchor), last_of_month(anchor))
            }
            NamedRange::Last3Months => span(months_back(3)?, today),
            NamedRange::Last6Months => span(months_back(6)?, today),
            NamedRange::LastYear => span(months_back(12)?, today),
            NamedRange::Quarter => span(first_of_quarter(today), last_of_quarter(today)),
            NamedRange::YearToDate => span(first_of_year(today.year()), today),
            NamedRange::Custom => {
                let (start, end) = custom.ok_or_else(|| {
                    LedgerLensError::Validation(
                        "A custom period needs both a start and an end date".into(),
                    )
                })?;
                PeriodWindow::new(start, end)?
            }
        };
        Ok(window)
    }

    /// The comparison window for `window`: same span, ending the day before it starts
    pub fn previous(window: &PeriodWindow) -> LedgerLensResult<PeriodWindow> {
        window.previous()
    }

    /// A full calendar year
    pub fn calendar_year(year: i32) -> PeriodWindow {
        span(first_of_year(year), last_of_year(year))
    }

    /// Calendar quarter `quarter` (1-4) of `year`
    pub fn calendar_quarter(year: i32, quarter: u32) -> LedgerLensResult<PeriodWindow> {
        if !(1..=4).contains(&quarter) {
            return Err(LedgerLensError::Validation(format!(
                "Quarter must be 1-4, got {}",
                quarter
            )));
        }
        let first = NaiveDate::from_ymd_opt(year, (quarter - 1) * 3 + 1, 1)
            .ok_or_else(|| LedgerLensError::Validation(format!("Invalid year: {}", year)))?;
        Ok(span(first, last_of_quarter(first)))
    }

    /// Parse month names like "January 2025" or "jan 2025"
    fn parse_month_name(s: &str) -> Option<PeriodWindow> {
        let months = [
            ("january", 1),
            ("jan", 1),
            ("february", 2),
            ("feb", 2),
            ("march", 3),
            ("mar", 3),
            ("april", 4),
            ("apr", 4),
            ("may", 5),
            ("june", 6),
            ("jun", 6),
            ("july", 7),
            ("jul", 7),
            ("august", 8),
            ("aug", 8),
            ("september", 9),
            ("sept", 9),
            ("sep", 9),
            ("october", 10),
            ("oct", 10),
            ("november", 11),
            ("nov", 11),
            ("december", 12),
            ("dec", 12),
        ];

        for (name, month) in months {
            if let Some(rest) = s.strip_prefix(name) {
                // A year is required so the window never depends on the clock
                let year: i32 = rest.trim().parse().ok()?;
                let first = NaiveDate::from_ymd_opt(year, month, 1)?;
                return Some(span(first, last_of_month(first)));
            }
        }

        None
    }

    /// Parse "2025-03" as a calendar month and "2025-q1" as a calendar quarter
    fn parse_year_month(s: &str) -> Option<PeriodWindow> {
        let (year, rest) = s.split_once('-')?;
        if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let year: i32 = year.parse().ok()?;

        if let Some(quarter) = rest.strip_prefix('q') {
            return Self::calendar_quarter(year, quarter.parse().ok()?).ok();
        }
        if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let first = NaiveDate::from_ymd_opt(year, rest.parse().ok()?, 1)?;
        Some(span(first, last_of_month(first)))
    }
}

fn out_of_range(range: NamedRange, today: NaiveDate) -> LedgerLensError {
    LedgerLensError::Validation(format!(
        "'{}' from {} falls outside the supported date range",
        range, today
    ))
}

// Bounds computed here are ordered by construction.
fn span(start: NaiveDate, end: NaiveDate) -> PeriodWindow {
    PeriodWindow { start, end }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(days_in_month(date.year(), date.month()))
        .unwrap_or(date)
}

pub fn first_of_quarter(date: NaiveDate) -> NaiveDate {
    let month = (date.month0() / 3) * 3 + 1;
    NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date)
}

pub fn last_of_quarter(date: NaiveDate) -> NaiveDate {
    let month = (date.month0() / 3) * 3 + 3;
    NaiveDate::from_ymd_opt(date.year(), month, days_in_month(date.year(), month)).unwrap_or(date)
}

pub fn first_of_year(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN)
}

pub fn last_of_year(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Shift by whole months, clamping the day to the target month's length
///
/// `None` when the result falls outside the dates chrono can represent.
pub fn shift_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let index = date
        .year()
        .checked_mul(12)?
        .checked_add(date.month0() as i32)?
        .checked_add(months)?;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if NaiveDate::from_ymd_opt(year, 2, 29).is_some() => 29,
        2 => 28,
        _ => 31,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn resolve(name: &str, today: NaiveDate) -> PeriodWindow {
        PeriodResolver::resolve(name, today, None).unwrap()
    }

    #[test]
    fn test_today_and_last_week() {
        let today = date(2025, 5, 14);
        assert_eq!(resolve("today", today), PeriodWindow::day(today));
        assert_eq!(
            resolve("last-week", today),
            PeriodWindow::new(date(2025, 5, 7), today).unwrap()
        );
    }

    #[test]
    fn test_month_ranges() {
        let today = date(2024, 3, 31);
        assert_eq!(
            resolve("this-month", today),
            PeriodWindow::new(date(2024, 3, 1), date(2024, 3, 31)).unwrap()
        );
        // Leap-year February
        assert_eq!(
            resolve("last-month", today),
            PeriodWindow::new(date(2024, 2, 1), date(2024, 2, 29)).unwrap()
        );
        assert_eq!(
            resolve("last-3-months", today),
            PeriodWindow::new(date(2023, 12, 31), today).unwrap()
        );
        assert_eq!(
            resolve("last-6-months", today),
            PeriodWindow::new(date(2023, 9, 30), today).unwrap()
        );
    }

    #[test]
    fn test_last_month_across_year_boundary() {
        assert_eq!(
            resolve("last-month", date(2025, 1, 15)),
            PeriodWindow::new(date(2024, 12, 1), date(2024, 12, 31)).unwrap()
        );
    }

    #[test]
    fn test_year_ranges() {
        let today = date(2024, 2, 29);
        assert_eq!(
            resolve("last-year", today),
            PeriodWindow::new(date(2023, 2, 28), today).unwrap()
        );
        assert_eq!(
            resolve("ytd", today),
            PeriodWindow::new(date(2024, 1, 1), today).unwrap()
        );
        assert_eq!(resolve("year", today), resolve("ytd", today));
    }

    #[test]
    fn test_quarter() {
        assert_eq!(
            resolve("quarter", date(2025, 8, 20)),
            PeriodWindow::new(date(2025, 7, 1), date(2025, 9, 30)).unwrap()
        );
        assert_eq!(
            resolve("quarter", date(2025, 12, 31)),
            PeriodWindow::new(date(2025, 10, 1), date(2025, 12, 31)).unwrap()
        );
    }

    #[test]
    fn test_custom() {
        let today = date(2025, 1, 1);
        let window =
            PeriodResolver::resolve("custom", today, Some((date(2024, 6, 1), date(2024, 6, 30))))
                .unwrap();
        assert_eq!(window.start, date(2024, 6, 1));

        let err =
            PeriodResolver::resolve("custom", today, Some((date(2024, 6, 30), date(2024, 6, 1))))
                .unwrap_err();
        assert!(matches!(err, LedgerLensError::InvalidRange { .. }));

        let err = PeriodResolver::resolve("custom", today, None).unwrap_err();
        assert!(matches!(err, LedgerLensError::Validation(_)));
    }

    #[test]
    fn test_explicit_range_and_month_names() {
        let today = date(2025, 1, 1);
        assert_eq!(
            resolve("2024-02-01..2024-02-10", today),
            PeriodWindow::new(date(2024, 2, 1), date(2024, 2, 10)).unwrap()
        );
        assert_eq!(
            resolve("February 2023", today),
            PeriodWindow::new(date(2023, 2, 1), date(2023, 2, 28)).unwrap()
        );
        assert_eq!(
            resolve("sept 2024", today),
            PeriodWindow::new(date(2024, 9, 1), date(2024, 9, 30)).unwrap()
        );
    }

    #[test]
    fn test_unknown_name() {
        let err = PeriodResolver::resolve("fortnight", date(2025, 1, 1), None).unwrap_err();
        assert!(matches!(err, LedgerLensError::UnknownPeriod(_)));
    }

    #[test]
    fn test_previous_comparison_window() {
        let window = resolve("this-month", date(2025, 2, 10));
        let prev = PeriodResolver::previous(&window).unwrap();
        assert_eq!(prev.end, date(2025, 1, 31));
        assert_eq!(prev.start, date(2025, 1, 4));
    }

    #[test]
    fn test_calendar_helpers() {
        assert_eq!(
            PeriodResolver::calendar_year(2025),
            PeriodWindow::new(date(2025, 1, 1), date(2025, 12, 31)).unwrap()
        );
        assert_eq!(
            PeriodResolver::calendar_quarter(2025, 2).unwrap(),
            PeriodWindow::new(date(2025, 4, 1), date(2025, 6, 30)).unwrap()
        );
        assert!(PeriodResolver::calendar_quarter(2025, 5).is_err());
        assert_eq!(shift_months(date(2025, 1, 31), 1), Some(date(2025, 2, 28)));
        assert_eq!(shift_months(date(2025, 1, 15), -13), Some(date(2023, 12, 15)));
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(last_of_quarter(date(2025, 11, 5)), date(2025, 12, 31));
    }

    #[test]
    fn test_year_month_and_quarter_names() {
        let today = date(2025, 6, 1);
        assert_eq!(
            resolve("2025-03", today),
            PeriodWindow::new(date(2025, 3, 1), date(2025, 3, 31)).unwrap()
        );
        assert_eq!(
            resolve("2024-Q1", today),
            PeriodWindow::new(date(2024, 1, 1), date(2024, 3, 31)).unwrap()
        );
        assert_eq!(
            resolve("2025-q4", today),
            PeriodWindow::new(date(2025, 10, 1), date(2025, 12, 31)).unwrap()
        );

        for bad in ["2025-13", "2025-Q5", "25-03", "2025-"] {
            let err = PeriodResolver::resolve(bad, today, None).unwrap_err();
            assert!(matches!(err, LedgerLensError::UnknownPeriod(_)), "{}", bad);
        }
    }

    #[test]
    fn test_shift_months_outside_calendar_range() {
        assert_eq!(shift_months(NaiveDate::MIN, -1), None);
        assert_eq!(shift_months(NaiveDate::MAX, 1), None);
        assert_eq!(shift_months(date(2025, 1, 1), i32::MIN), None);
        assert_eq!(last_of_month(NaiveDate::MAX), NaiveDate::MAX);
    }

    #[test]
    fn test_relative_ranges_near_earliest_date_fail() {
        let earliest = NaiveDate::MIN;
        for name in ["last-week", "last-month", "last-3-months", "last-year"] {
            let err = PeriodResolver::resolve(name, earliest, None).unwrap_err();
            assert!(err.is_validation(), "{}", name);
        }
        assert!(PeriodResolver::resolve("this-month", earliest, None).is_ok());
    }
}
