//! Ledger aggregator
//!
//! Sums, counts and category breakdowns over dated monetary records, plus
//! calendar bucketing for trend series. Every function is pure: input slices
//! are only read, and results are rebuilt on each call.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::period::{first_of_month, first_of_quarter, last_of_month, last_of_quarter, shift_months};
use crate::error::{LedgerLensError, LedgerLensResult};
use crate::models::{MonetaryRecord, Money, PeriodWindow};

/// Key used for records that carry no category
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Totals over the records that matched a window and predicate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub total: Money,
    pub count: usize,
    /// `total / count`, rounded to the cent; zero when nothing matched
    pub average: Money,
    pub by_category: BTreeMap<String, Money>,
}

impl AggregateResult {
    /// Groups ordered by amount, largest first
    pub fn top_categories(&self, limit: usize) -> Vec<(&str, Money)> {
        let mut groups: Vec<_> = self
            .by_category
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        groups.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        groups.truncate(limit);
        groups
    }
}

/// Aggregate every record dated inside `window`
pub fn aggregate(records: &[MonetaryRecord], window: &PeriodWindow) -> AggregateResult {
    aggregate_where(records, window, |_| true)
}

/// Aggregate records inside `window` that satisfy `predicate`, grouped by category
pub fn aggregate_where<P>(
    records: &[MonetaryRecord],
    window: &PeriodWindow,
    predicate: P,
) -> AggregateResult
where
    P: Fn(&MonetaryRecord) -> bool,
{
    aggregate_by(records, window, predicate, |record| {
        record
            .category
            .clone()
            .unwrap_or_else(|| UNCATEGORIZED.to_string())
    })
}

/// Aggregate with a caller-supplied grouping key
pub fn aggregate_by<P, K>(
    records: &[MonetaryRecord],
    window: &PeriodWindow,
    predicate: P,
    key_fn: K,
) -> AggregateResult
where
    P: Fn(&MonetaryRecord) -> bool,
    K: Fn(&MonetaryRecord) -> String,
{
    let mut result = AggregateResult::default();

    for record in records
        .iter()
        .filter(|r| window.contains(r.occurred_on) && predicate(r))
    {
        result.total += record.amount;
        result.count += 1;
        *result
            .by_category
            .entry(key_fn(record))
            .or_insert_with(Money::zero) += record.amount;
    }

    result.average = result.total.split(result.count);
    result
}

/// Calendar unit of a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Month,
    Quarter,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month => write!(f, "month"),
            Self::Quarter => write!(f, "quarter"),
        }
    }
}

impl FromStr for Granularity {
    type Err = LedgerLensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "month" | "monthly" => Ok(Self::Month),
            "quarter" | "quarterly" => Ok(Self::Quarter),
            other => Err(LedgerLensError::Validation(format!(
                "Unknown granularity: {} (expected month or quarter)",
                other
            ))),
        }
    }
}

/// A labelled sub-window of a trend series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub window: PeriodWindow,
}

/// Credit and debit totals for one bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketTotals {
    pub label: String,
    pub window: PeriodWindow,
    pub total_credit: Money,
    pub total_debit: Money,
    pub net: Money,
}

/// Most buckets a single series may span
pub const MAX_BUCKETS: usize = 1200;

/// `count` calendar months ending with the month containing `today`, oldest first
pub fn month_buckets(today: NaiveDate, count: usize) -> LedgerLensResult<Vec<Bucket>> {
    buckets(today, count, Granularity::Month)
}

/// `count` calendar quarters ending with the quarter containing `today`, oldest first
pub fn quarter_buckets(today: NaiveDate, count: usize) -> LedgerLensResult<Vec<Bucket>> {
    buckets(today, count, Granularity::Quarter)
}

/// Contiguous buckets: each starts the day after the previous one ends
///
/// Counts above `MAX_BUCKETS`, or reaching back past the earliest
/// representable date, are rejected.
pub fn buckets(
    today: NaiveDate,
    count: usize,
    granularity: Granularity,
) -> LedgerLensResult<Vec<Bucket>> {
    let too_many = || {
        LedgerLensError::Validation(format!(
            "Bucket count {} exceeds the maximum of {}",
            count, MAX_BUCKETS
        ))
    };
    if count > MAX_BUCKETS {
        return Err(too_many());
    }
    let count = i32::try_from(count).map_err(|_| too_many())?;

    let (anchor, step) = match granularity {
        Granularity::Month => (first_of_month(today), 1),
        Granularity::Quarter => (first_of_quarter(today), 3),
    };

    (0..count)
        .rev()
        .map(|back| {
            let start = shift_months(anchor, -back * step).ok_or_else(|| {
                LedgerLensError::Validation(format!(
                    "{} {} buckets before {} reach past the supported date range",
                    count, granularity, today
                ))
            })?;
            let (end, label) = match granularity {
                Granularity::Month => (last_of_month(start), start.format("%b %Y").to_string()),
                Granularity::Quarter => (
                    last_of_quarter(start),
                    format!("Q{} {}", start.month0() / 3 + 1, start.year()),
                ),
            };
            Ok(Bucket {
                label,
                window: PeriodWindow { start, end },
            })
        })
        .collect()
}

/// Credit/debit series over trailing buckets, re-running the aggregator per bucket
///
/// Credit side is `credit` and `income` records, debit side is `debit` and
/// `expense` records; tax payments are in neither.
pub fn bucket_series(
    records: &[MonetaryRecord],
    today: NaiveDate,
    count: usize,
    granularity: Granularity,
) -> LedgerLensResult<Vec<BucketTotals>> {
    let series: Vec<BucketTotals> = buckets(today, count, granularity)?
        .into_iter()
        .map(|bucket| {
            let credit = aggregate_where(records, &bucket.window, |r| r.kind.is_inflow());
            let debit = aggregate_where(records, &bucket.window, |r| r.kind.is_outflow());
            BucketTotals {
                net: credit.total - debit.total,
                total_credit: credit.total,
                total_debit: debit.total,
                label: bucket.label,
                window: bucket.window,
            }
        })
        .collect();

    tracing::debug!(
        buckets = series.len(),
        records = records.len(),
        ?granularity,
        "built bucket series"
    );
    Ok(series)
}
