//! Budget Overview Report
//!
//! Shows every budget with its allocation, what has been spent against it
//! in the window, and the progress band.

use serde::Serialize;
use std::io::Write;

use crate::display::format_progress;
use crate::error::LedgerLensResult;
use crate::export::csv::{decimal, write_rows};
use crate::models::{
    Budget, BudgetId, MonetaryRecord, Money, PeriodWindow, ProgressBand, ProgressState,
    ProgressThresholds,
};
use crate::services::aggregate::aggregate_where;
use crate::services::progress::{band, progress};

/// A row in the budget report for a single budget
#[derive(Debug, Clone, Serialize)]
pub struct BudgetReportRow {
    pub budget_id: BudgetId,
    pub name: String,
    pub category: String,
    pub progress: ProgressState,
    pub band: ProgressBand,
}

impl BudgetReportRow {
    pub fn is_over(&self) -> bool {
        self.band == ProgressBand::Over
    }
}

/// Budget Overview Report
#[derive(Debug, Clone, Serialize)]
pub struct BudgetOverviewReport {
    pub window: PeriodWindow,
    pub rows: Vec<BudgetReportRow>,
    pub total_allocated: Money,
    pub total_spent: Money,
    /// Progress of all budgets taken together
    pub overall: ProgressState,
    pub overall_band: ProgressBand,
}

/// Spending in `window` whose category matches, ignoring case
fn spent_in_category(records: &[MonetaryRecord], window: &PeriodWindow, category: &str) -> Money {
    aggregate_where(records, window, |r| {
        r.is_effective_expense()
            && r.category
                .as_deref()
                .is_some_and(|c| c.trim().eq_ignore_ascii_case(category.trim()))
    })
    .total
}

impl BudgetOverviewReport {
    /// Generate a budget overview report for a window
    pub fn generate(
        budgets: &[Budget],
        records: &[MonetaryRecord],
        window: PeriodWindow,
        thresholds: &ProgressThresholds,
    ) -> Self {
        let rows: Vec<BudgetReportRow> = budgets
            .iter()
            .map(|budget| {
                let spent = spent_in_category(records, &window, &budget.category);
                let state = progress(budget.allocated, spent);
                BudgetReportRow {
                    budget_id: budget.id,
                    name: budget.name.clone(),
                    category: budget.category.clone(),
                    band: band(state.percentage, thresholds),
                    progress: state,
                }
            })
            .collect();

        let total_allocated: Money = rows.iter().map(|r| r.progress.allocated).sum();
        let total_spent: Money = rows.iter().map(|r| r.progress.consumed).sum();
        let overall = progress(total_allocated, total_spent);

        Self {
            window,
            overall_band: band(overall.percentage, thresholds),
            rows,
            total_allocated,
            total_spent,
            overall,
        }
    }

    pub fn over_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_over()).count()
    }

    pub fn near_limit_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.band == ProgressBand::NearLimit)
            .count()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Budget Overview - {}\n", self.window));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        if self.rows.is_empty() {
            output.push_str("No budgets defined.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<24} {:>12} {:>12} {:>12}  {}\n",
            "Budget", "Allocated", "Spent", "Remaining", "Progress"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<24} {:>12} {:>12} {:>12}  {}\n",
                row.name,
                row.progress.allocated,
                row.progress.consumed,
                row.progress.remaining,
                format_progress(&row.progress, row.band, 15)
            ));
        }

        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "{:<24} {:>12} {:>12} {:>12}  {}\n",
            "TOTAL",
            self.total_allocated.format_with_symbol(currency),
            self.total_spent.format_with_symbol(currency),
            self.overall.remaining.format_with_symbol(currency),
            format_progress(&self.overall, self.overall_band, 15)
        ));

        let over = self.over_count();
        let near = self.near_limit_count();
        if over > 0 || near > 0 {
            output.push_str(&format!("\n{} over budget, {} near the limit\n", over, near));
        }

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> LedgerLensResult<()> {
        let window = self.window.to_string();
        let line = |name: &str, category: &str, state: &ProgressState, band: ProgressBand| {
            vec![
                window.clone(),
                name.to_string(),
                category.to_string(),
                state.allocated.to_string(),
                state.consumed.to_string(),
                state.remaining.to_string(),
                decimal(state.percentage),
                band.to_string(),
            ]
        };

        let mut rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|r| line(&r.name, &r.category, &r.progress, r.band))
            .collect();
        rows.push(line("TOTAL", "", &self.overall, self.overall_band));

        write_rows(
            writer,
            &[
                "window",
                "budget",
                "category",
                "allocated",
                "spent",
                "remaining",
                "percentage",
                "band",
            ],
            rows,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecordKind, RecordStatus};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(units: i64, day: u32, category: &str) -> MonetaryRecord {
        MonetaryRecord::new(Money::from_units(units), date(2025, 1, day), RecordKind::Expense)
            .with_category(category)
    }

    fn setup() -> (Vec<Budget>, Vec<MonetaryRecord>, PeriodWindow) {
        let budgets = vec![
            Budget::new("Payroll", "Payroll", Money::from_units(50_000)),
            Budget::new("Software", "Software", Money::from_units(2_000)),
            Budget::new("Travel", "Travel", Money::from_units(1_000)),
        ];
        let records = vec![
            expense(40_000, 5, "Payroll"),
            expense(25_000, 20, "payroll"),
            expense(1_700, 9, "Software"),
            expense(500, 10, "Travel").with_status(RecordStatus::Cancelled),
            // Outside the window
            MonetaryRecord::new(Money::from_units(900), date(2025, 2, 1), RecordKind::Expense)
                .with_category("Travel"),
        ];
        let window = PeriodWindow::new(date(2025, 1, 1), date(2025, 1, 31)).unwrap();
        (budgets, records, window)
    }

    #[test]
    fn test_generate_report() {
        let (budgets, records, window) = setup();
        let report =
            BudgetOverviewReport::generate(&budgets, &records, window, &ProgressThresholds::default());

        assert_eq!(report.rows.len(), 3);

        let payroll = &report.rows[0];
        assert_eq!(payroll.progress.consumed, Money::from_units(65_000));
        assert_eq!(payroll.progress.remaining, Money::from_units(-15_000));
        assert_eq!(payroll.progress.percentage, 130.0);
        assert_eq!(payroll.band, ProgressBand::Over);

        assert_eq!(report.rows[1].band, ProgressBand::NearLimit);
        assert_eq!(report.rows[2].progress.consumed, Money::zero());
        assert_eq!(report.rows[2].band, ProgressBand::OnTrack);

        assert_eq!(report.total_allocated, Money::from_units(53_000));
        assert_eq!(report.total_spent, Money::from_units(66_700));
        assert_eq!(report.over_count(), 1);
        assert_eq!(report.near_limit_count(), 1);
    }

    #[test]
    fn test_no_budgets() {
        let (_, records, window) = setup();
        let report =
            BudgetOverviewReport::generate(&[], &records, window, &ProgressThresholds::default());
        assert_eq!(report.overall.percentage, 0.0);
        assert!(report.format_terminal("$").contains("No budgets defined."));
    }

    #[test]
    fn test_csv_export() {
        let (budgets, records, window) = setup();
        let report =
            BudgetOverviewReport::generate(&budgets, &records, window, &ProgressThresholds::default());

        let mut csv_output = Vec::new();
        report.export_csv(&mut csv_output).unwrap();

        let csv_string = String::from_utf8(csv_output).unwrap();
        assert!(csv_string.starts_with("window,budget,category,allocated,spent,remaining,percentage,band\n"));
        assert!(csv_string
            .contains("2025-01-01..2025-01-31,Payroll,Payroll,50000.00,65000.00,-15000.00,130.00,over"));
        assert!(csv_string.contains(",TOTAL,,53000.00,66700.00,"));
    }

    #[test]
    fn test_terminal_format() {
        let (budgets, records, window) = setup();
        let report =
            BudgetOverviewReport::generate(&budgets, &records, window, &ProgressThresholds::default());
        let output = report.format_terminal("$");

        assert!(output.contains("Budget Overview - 2025-01-01..2025-01-31"));
        assert!(output.contains("Payroll"));
        assert!(output.contains("130% !!"));
        assert!(output.contains("1 over budget, 1 near the limit"));
    }
}
