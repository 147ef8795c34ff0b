//! Savings Goals Report
//!
//! Progress toward each savings goal and the days left until its target
//! date, as of a given day.

use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;

use crate::display::format_progress;
use crate::error::LedgerLensResult;
use crate::export::csv::{decimal, write_rows};
use crate::models::{GoalId, Money, ProgressBand, ProgressThresholds, SavingsGoal, SavingsProgress};
use crate::services::progress::{band, savings_progress};

#[derive(Debug, Clone, Serialize)]
pub struct SavingsReportRow {
    pub goal_id: GoalId,
    pub name: String,
    pub target_date: Option<NaiveDate>,
    pub savings: SavingsProgress,
    pub band: ProgressBand,
}

impl SavingsReportRow {
    /// Saved at least the target amount
    pub fn is_complete(&self) -> bool {
        self.savings.progress.percentage >= 100.0
    }

    /// Target date has passed without reaching the target
    pub fn is_overdue(&self) -> bool {
        !self.is_complete() && self.savings.days_remaining.is_some_and(|d| d < 0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SavingsReport {
    pub as_of: NaiveDate,
    pub rows: Vec<SavingsReportRow>,
    pub total_target: Money,
    pub total_saved: Money,
}

impl SavingsReport {
    pub fn generate(goals: &[SavingsGoal], today: NaiveDate, thresholds: &ProgressThresholds) -> Self {
        let rows: Vec<SavingsReportRow> = goals
            .iter()
            .map(|goal| {
                let savings = savings_progress(goal, today);
                SavingsReportRow {
                    goal_id: goal.id,
                    name: goal.name.clone(),
                    target_date: goal.target_date,
                    band: band(savings.progress.percentage, thresholds),
                    savings,
                }
            })
            .collect();

        Self {
            as_of: today,
            total_target: rows.iter().map(|r| r.savings.progress.allocated).sum(),
            total_saved: rows.iter().map(|r| r.savings.progress.consumed).sum(),
            rows,
        }
    }

    pub fn completed_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_complete()).count()
    }

    pub fn overdue_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_overdue()).count()
    }

    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Savings Goals - as of {}\n", self.as_of));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        if self.rows.is_empty() {
            output.push_str("No savings goals defined.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<22} {:>12} {:>12} {:>12}  {}\n",
            "Goal", "Target", "Saved", "Deadline", "Progress"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');

        for row in &self.rows {
            let deadline = match row.savings.days_remaining {
                Some(days) if row.is_overdue() => format!("{}d late", -days),
                Some(days) => format!("{}d", days),
                None => "-".to_string(),
            };
            output.push_str(&format!(
                "{:<22} {:>12} {:>12} {:>12}  {}\n",
                row.name,
                row.savings.progress.allocated,
                row.savings.progress.consumed,
                deadline,
                format_progress(&row.savings.progress, row.band, 15)
            ));
        }

        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "{:<22} {:>12} {:>12}\n",
            "TOTAL",
            self.total_target.format_with_symbol(currency),
            self.total_saved.format_with_symbol(currency)
        ));
        output.push_str(&format!(
            "\n{} of {} goals reached, {} overdue\n",
            self.completed_count(),
            self.rows.len(),
            self.overdue_count()
        ));

        output
    }

    pub fn export_csv<W: Write>(&self, writer: &mut W) -> LedgerLensResult<()> {
        write_rows(
            writer,
            &[
                "goal",
                "target",
                "saved",
                "remaining",
                "percentage",
                "target_date",
                "days_remaining",
                "band",
            ],
            self.rows.iter().map(|r| {
                let p = &r.savings.progress;
                vec![
                    r.name.clone(),
                    p.allocated.to_string(),
                    p.consumed.to_string(),
                    p.remaining.to_string(),
                    decimal(p.percentage),
                    r.target_date.map(|d| d.to_string()).unwrap_or_default(),
                    r.savings
                        .days_remaining
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                    r.band.to_string(),
                ]
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn goals() -> Vec<SavingsGoal> {
        vec![
            SavingsGoal::new("Emergency fund", Money::from_units(10_000))
                .with_current(Money::from_units(2_500))
                .with_target_date(date(2025, 12, 31)),
            SavingsGoal::new("Laptop", Money::from_units(2_000))
                .with_current(Money::from_units(2_000)),
            SavingsGoal::new("Conference", Money::from_units(1_000))
                .with_current(Money::from_units(900))
                .with_target_date(date(2025, 5, 1)),
        ]
    }

    #[test]
    fn test_generate_report() {
        let report = SavingsReport::generate(&goals(), date(2025, 6, 1), &ProgressThresholds::default());

        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.rows[0].savings.progress.percentage, 25.0);
        assert_eq!(report.rows[0].savings.days_remaining, Some(213));
        assert_eq!(report.rows[0].band, ProgressBand::OnTrack);

        assert!(report.rows[1].is_complete());
        assert_eq!(report.rows[1].savings.days_remaining, None);

        assert_eq!(report.rows[2].savings.days_remaining, Some(-31));
        assert_eq!(report.rows[2].band, ProgressBand::NearLimit);
        assert!(report.rows[2].is_overdue());

        assert_eq!(report.total_target, Money::from_units(13_000));
        assert_eq!(report.total_saved, Money::from_units(5_400));
        assert_eq!(report.completed_count(), 1);
        assert_eq!(report.overdue_count(), 1);
    }

    #[test]
    fn test_terminal_and_csv_output() {
        let report = SavingsReport::generate(&goals(), date(2025, 6, 1), &ProgressThresholds::default());

        let text = report.format_terminal("$");
        assert!(text.contains("Emergency fund"));
        assert!(text.contains("31d late"));
        assert!(text.contains("1 of 3 goals reached, 1 overdue"));

        let mut out = Vec::new();
        report.export_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        assert!(csv.contains("Emergency fund,10000.00,2500.00,7500.00,25.00,2025-12-31,213,on-track"));
        assert!(csv.contains("Laptop,2000.00,2000.00,0.00,100.00,,,on-track"));
    }

    #[test]
    fn test_empty_goals() {
        let report = SavingsReport::generate(&[], date(2025, 6, 1), &ProgressThresholds::default());
        assert!(report.format_terminal("$").contains("No savings goals defined."));
        assert_eq!(report.total_target, Money::zero());
    }
}
