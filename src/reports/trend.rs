//! Trend Report
//!
//! Credit and debit totals over trailing calendar buckets, drawn as bars.

use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;

use crate::display::format_bar;
use crate::error::LedgerLensResult;
use crate::export::csv::write_rows;
use crate::models::{MonetaryRecord, Money};
use crate::services::aggregate::{bucket_series, BucketTotals, Granularity};

const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, Serialize)]
pub struct TrendReport {
    pub granularity: Granularity,
    pub buckets: Vec<BucketTotals>,
}

impl TrendReport {
    /// `count` buckets ending with the one containing `today`, oldest first
    pub fn generate(
        records: &[MonetaryRecord],
        today: NaiveDate,
        count: usize,
        granularity: Granularity,
    ) -> LedgerLensResult<Self> {
        Ok(Self {
            granularity,
            buckets: bucket_series(records, today, count, granularity)?,
        })
    }

    pub fn total_credit(&self) -> Money {
        self.buckets.iter().map(|b| b.total_credit).sum()
    }

    pub fn total_debit(&self) -> Money {
        self.buckets.iter().map(|b| b.total_debit).sum()
    }

    /// Largest single credit or debit total; the bars are scaled to it
    fn peak(&self) -> Money {
        self.buckets
            .iter()
            .map(|b| b.total_credit.max(b.total_debit))
            .max()
            .unwrap_or_default()
    }

    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();
        let peak = self.peak().as_f64();

        output.push_str(&format!("Trend - by {}\n", self.granularity));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        for bucket in &self.buckets {
            output.push_str(&format!(
                "{:<9} in  {} {:>12}\n",
                bucket.label,
                format_bar(bucket.total_credit.as_f64(), peak, BAR_WIDTH),
                bucket.total_credit
            ));
            output.push_str(&format!(
                "{:<9} out {} {:>12}   net {}\n",
                "",
                format_bar(bucket.total_debit.as_f64(), peak, BAR_WIDTH),
                bucket.total_debit,
                bucket.net
            ));
        }

        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "Total in {}, out {}, net {}\n",
            self.total_credit().format_with_symbol(currency),
            self.total_debit().format_with_symbol(currency),
            (self.total_credit() - self.total_debit()).format_with_symbol(currency)
        ));

        output
    }

    pub fn export_csv<W: Write>(&self, writer: &mut W) -> LedgerLensResult<()> {
        write_rows(
            writer,
            &["bucket", "start", "end", "credit", "debit", "net"],
            self.buckets.iter().map(|b| {
                [
                    b.label.clone(),
                    b.window.start.to_string(),
                    b.window.end.to_string(),
                    b.total_credit.to_string(),
                    b.total_debit.to_string(),
                    b.net.to_string(),
                ]
            }),
        )
    }
}
