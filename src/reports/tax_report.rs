//! Tax Report
//!
//! Annual marginal liability for one calendar year, what has already been
//! paid against it, and a per-quarter flat estimate.

use serde::Serialize;
use std::io::Write;

use crate::display::format_percentage;
use crate::error::LedgerLensResult;
use crate::export::csv::{decimal, write_rows};
use crate::models::{
    MonetaryRecord, Money, PeriodWindow, QuarterlyEstimate, QuarterlyEstimateRule, RecordKind,
    TaxResult, TaxSchedule,
};
use crate::services::aggregate::aggregate_where;
use crate::services::period::PeriodResolver;
use crate::services::tax::{compute_tax, quarterly_estimate};

/// Income, deductions and the flat estimate for one calendar quarter
#[derive(Debug, Clone, Serialize)]
pub struct QuarterRow {
    pub label: String,
    pub window: PeriodWindow,
    pub income: Money,
    pub expenses: Money,
    /// `max(0, income - expenses)`
    pub taxable: Money,
    pub estimate: QuarterlyEstimate,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaxReport {
    pub year: i32,
    pub schedule_name: String,
    pub gross_income: Money,
    pub deductible_expenses: Money,
    pub taxable_income: Money,
    pub result: TaxResult,
    /// Sum of `tax_liability` records dated in the year
    pub taxes_paid: Money,
    /// Liability minus taxes paid; negative when overpaid
    pub balance_due: Money,
    pub quarters: Vec<QuarterRow>,
}

/// Taxable base of a window: realized income less effective expenses, floored at zero
fn taxable_base(records: &[MonetaryRecord], window: &PeriodWindow) -> (Money, Money, Money) {
    let income = aggregate_where(records, window, MonetaryRecord::is_realized_income).total;
    let expenses = aggregate_where(records, window, MonetaryRecord::is_effective_expense).total;
    (income, expenses, (income - expenses).max(Money::zero()))
}

impl TaxReport {
    pub fn generate(
        records: &[MonetaryRecord],
        year: i32,
        schedule: &TaxSchedule,
        rule: &QuarterlyEstimateRule,
    ) -> LedgerLensResult<Self> {
        let year_window = PeriodResolver::calendar_year(year);
        let (gross_income, deductible_expenses, taxable_income) =
            taxable_base(records, &year_window);

        let result = compute_tax(taxable_income, schedule)?;
        let taxes_paid = aggregate_where(records, &year_window, |r| {
            r.kind == RecordKind::TaxLiability
        })
        .total;

        let quarters = (1..=4)
            .map(|q| {
                let window = PeriodResolver::calendar_quarter(year, q)?;
                let (income, expenses, taxable) = taxable_base(records, &window);
                Ok(QuarterRow {
                    label: format!("Q{} {}", q, year),
                    window,
                    income,
                    expenses,
                    taxable,
                    estimate: quarterly_estimate(taxable, rule)?,
                })
            })
            .collect::<LedgerLensResult<Vec<_>>>()?;

        tracing::debug!(
            year,
            taxable = %taxable_income,
            liability = %result.liability,
            paid = %taxes_paid,
            "generated tax report"
        );

        Ok(Self {
            year,
            schedule_name: schedule.name.clone(),
            gross_income,
            deductible_expenses,
            taxable_income,
            balance_due: result.liability - taxes_paid,
            result,
            taxes_paid,
            quarters,
        })
    }

    /// Sum of the four quarterly estimates
    pub fn total_estimated(&self) -> Money {
        self.quarters.iter().map(|q| q.estimate.estimate).sum()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let money = |m: Money| m.format_with_symbol(currency);
        let mut output = String::new();

        output.push_str(&format!("Tax Report - {} ({})\n", self.year, self.schedule_name));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!("{:<28} {:>16}\n", "Gross Income", money(self.gross_income)));
        output.push_str(&format!(
            "{:<28} {:>16}\n",
            "Deductible Expenses",
            money(self.deductible_expenses)
        ));
        output.push_str(&format!("{:<28} {:>16}\n", "Taxable Income", money(self.taxable_income)));
        output.push_str(&format!("{:<28} {:>16}\n", "Tax Liability", money(self.result.liability)));
        output.push_str(&format!(
            "{:<28} {:>16}\n",
            "Effective Rate",
            format_percentage(self.result.effective_rate_pct)
        ));
        output.push_str(&format!(
            "{:<28} {:>16}\n",
            "Marginal Rate",
            format_percentage(self.result.marginal_rate * 100.0)
        ));
        output.push_str(&format!("{:<28} {:>16}\n", "Taxes Paid", money(self.taxes_paid)));
        output.push_str(&format!("{:<28} {:>16}\n", "Balance Due", money(self.balance_due)));

        if !self.result.breakdown.is_empty() {
            output.push_str("\nBracket Breakdown\n");
            output.push_str(&"-".repeat(60));
            output.push('\n');
            for share in &self.result.breakdown {
                let upper = share
                    .upper_bound
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| "and above".to_string());
                output.push_str(&format!(
                    "  {:>12} - {:<12} {:>6} {:>14} {:>12}\n",
                    share.lower_bound,
                    upper,
                    format_percentage(share.rate * 100.0),
                    share.taxable_amount,
                    share.tax
                ));
            }
        }

        output.push_str("\nQuarterly Estimates\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for quarter in &self.quarters {
            output.push_str(&format!(
                "  {:<8} taxable {:>14}  estimate {:>12}\n",
                quarter.label, quarter.taxable, quarter.estimate.estimate
            ));
        }
        output.push_str(&format!(
            "  {:<8} {:>39}\n",
            "Total",
            money(self.total_estimated())
        ));

        output
    }

    /// Export one row per quarter plus an annual row
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> LedgerLensResult<()> {
        let mut rows: Vec<Vec<String>> = self
            .quarters
            .iter()
            .map(|q| {
                vec![
                    q.label.clone(),
                    q.income.to_string(),
                    q.expenses.to_string(),
                    q.taxable.to_string(),
                    q.estimate.estimate.to_string(),
                    String::new(),
                    String::new(),
                ]
            })
            .collect();

        rows.push(vec![
            format!("FY {}", self.year),
            self.gross_income.to_string(),
            self.deductible_expenses.to_string(),
            self.taxable_income.to_string(),
            self.result.liability.to_string(),
            decimal(self.result.effective_rate_pct),
            self.balance_due.to_string(),
        ]);

        write_rows(
            writer,
            &[
                "period",
                "income",
                "expenses",
                "taxable",
                "tax",
                "effective_rate_pct",
                "balance_due",
            ],
            rows,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerLensError;
    use crate::models::{RecordStatus, TaxBracket};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(units: i64, on: NaiveDate, kind: RecordKind) -> MonetaryRecord {
        MonetaryRecord::new(Money::from_units(units), on, kind)
    }

    fn fixture() -> Vec<MonetaryRecord> {
        vec![
            record(1_000_000, date(2025, 2, 1), RecordKind::Income).with_status(RecordStatus::Paid),
            record(900_000, date(2025, 8, 1), RecordKind::Income),
            record(250_000, date(2025, 8, 9), RecordKind::Income).with_status(RecordStatus::Pending),
            record(400_000, date(2025, 5, 1), RecordKind::Expense),
            record(10_000, date(2025, 6, 30), RecordKind::TaxLiability),
            // Other years are ignored
            record(5_000_000, date(2024, 12, 31), RecordKind::Income),
        ]
    }

    #[test]
    fn test_generate_annual_figures() {
        let report = TaxReport::generate(
            &fixture(),
            2025,
            &TaxSchedule::default_business(),
            &QuarterlyEstimateRule::default(),
        )
        .unwrap();

        assert_eq!(report.gross_income, Money::from_units(1_900_000));
        assert_eq!(report.deductible_expenses, Money::from_units(400_000));
        assert_eq!(report.taxable_income, Money::from_units(1_500_000));
        assert_eq!(report.result.liability, Money::from_units(60_000));
        assert_eq!(report.taxes_paid, Money::from_units(10_000));
        assert_eq!(report.balance_due, Money::from_units(50_000));
    }

    #[test]
    fn test_quarters_use_flat_estimate() {
        let report = TaxReport::generate(
            &fixture(),
            2025,
            &TaxSchedule::default_business(),
            &QuarterlyEstimateRule::default(),
        )
        .unwrap();

        assert_eq!(report.quarters.len(), 4);
        // Q1: 1,000,000 taxable, 10% above 150,000
        assert_eq!(report.quarters[0].estimate.estimate, Money::from_units(85_000));
        // Q2: expenses only, floored at zero
        assert_eq!(report.quarters[1].taxable, Money::zero());
        assert_eq!(report.quarters[1].estimate.estimate, Money::zero());
        assert_eq!(report.quarters[2].estimate.estimate, Money::from_units(75_000));
        assert_eq!(report.total_estimated(), Money::from_units(160_000));
    }

    #[test]
    fn test_invalid_schedule_fails() {
        let broken = TaxSchedule::new(
            "broken",
            vec![TaxBracket::new(Money::zero(), Some(Money::from_units(10)), 0.1)],
        );
        let err =
            TaxReport::generate(&fixture(), 2025, &broken, &QuarterlyEstimateRule::default())
                .unwrap_err();
        assert!(matches!(err, LedgerLensError::InvalidBracketTable(_)));
    }

    #[test]
    fn test_terminal_and_csv_output() {
        let report = TaxReport::generate(
            &fixture(),
            2025,
            &TaxSchedule::default_business(),
            &QuarterlyEstimateRule::default(),
        )
        .unwrap();

        let text = report.format_terminal("$");
        assert!(text.contains("Tax Report - 2025"));
        assert!(text.contains("$60000.00"));
        assert!(text.contains("4.0%"));

        let mut out = Vec::new();
        report.export_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        assert!(csv.contains("Q1 2025,1000000.00,0.00,1000000.00,85000.00,,"));
        assert!(csv.contains("FY 2025,1900000.00,400000.00,1500000.00,60000.00,4.00,50000.00"));
    }
}
