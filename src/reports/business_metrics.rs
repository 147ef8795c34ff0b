//! Business Metrics Report
//!
//! Revenue, expenses, profit, growth against the preceding window,
//! receivables, client retention, simplified ratios, a trailing monthly
//! trend and the KPI table, all derived from the records of one window.

use serde::Serialize;
use std::io::Write;

use crate::config::Settings;
use crate::display::{format_change, format_kpi_table, format_percentage};
use crate::error::LedgerLensResult;
use crate::export::csv::{decimal, write_rows};
use crate::models::{Client, Kpi, KpiMetric, MonetaryRecord, Money, PeriodWindow};
use crate::services::aggregate::{aggregate_where, bucket_series, BucketTotals, Granularity};
use crate::services::growth::{
    growth, profit_margin, retention, safe_ratio, FinancialRatios, GrowthMetric,
};
use crate::services::kpi::KpiEvaluator;

/// Number of expense categories listed in the report
const TOP_CATEGORIES: usize = 5;

/// Figures for one window, before any period-over-period comparison
#[derive(Debug, Clone)]
struct PeriodFigures {
    revenue: Money,
    expenses: Money,
    receivables: Money,
    receivable_count: usize,
    top_expenses: Vec<(String, Money)>,
    total_clients: usize,
    new_clients: usize,
}

impl PeriodFigures {
    fn collect(records: &[MonetaryRecord], clients: &[Client], window: &PeriodWindow) -> Self {
        let revenue = aggregate_where(records, window, MonetaryRecord::is_realized_income);
        let expenses = aggregate_where(records, window, MonetaryRecord::is_effective_expense);
        let receivables = aggregate_where(records, window, MonetaryRecord::is_receivable);

        Self {
            revenue: revenue.total,
            expenses: expenses.total,
            receivables: receivables.total,
            receivable_count: receivables.count,
            top_expenses: expenses
                .top_categories(TOP_CATEGORIES)
                .into_iter()
                .map(|(name, amount)| (name.to_string(), amount))
                .collect(),
            total_clients: clients.iter().filter(|c| c.created_on <= window.end).count(),
            new_clients: clients.iter().filter(|c| window.contains(c.created_on)).count(),
        }
    }

    fn margin(&self) -> f64 {
        profit_margin(self.revenue, self.expenses)
    }

    fn expense_ratio(&self) -> f64 {
        safe_ratio(self.expenses.as_f64(), self.revenue.as_f64()) * 100.0
    }

    /// Collected share of everything invoiced
    fn collection_rate(&self) -> f64 {
        safe_ratio(
            self.revenue.as_f64(),
            (self.revenue + self.receivables).as_f64(),
        ) * 100.0
    }

    fn retention(&self) -> f64 {
        retention(self.total_clients, self.new_clients)
    }

    /// Assets approximated by revenue, liabilities by expenses
    fn ratios(&self) -> FinancialRatios {
        FinancialRatios::from_totals(self.revenue, self.expenses, self.revenue, self.expenses)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BusinessMetricsReport {
    pub window: PeriodWindow,
    pub previous_window: PeriodWindow,
    pub revenue: GrowthMetric,
    pub expenses: GrowthMetric,
    pub net_profit: Money,
    pub profit_margin: f64,
    pub expense_ratio: f64,
    pub receivables: Money,
    pub receivable_count: usize,
    pub collection_rate: f64,
    pub total_clients: usize,
    pub new_clients: usize,
    pub client_retention: f64,
    pub ratios: FinancialRatios,
    pub top_expense_categories: Vec<(String, Money)>,
    /// Trailing months ending with the month of `window.end`, oldest first
    pub trend: Vec<BucketTotals>,
    pub kpis: Vec<Kpi>,
}

impl BusinessMetricsReport {
    pub fn generate(
        records: &[MonetaryRecord],
        clients: &[Client],
        window: PeriodWindow,
        settings: &Settings,
    ) -> LedgerLensResult<Self> {
        let previous_window = window.previous()?;
        let current = PeriodFigures::collect(records, clients, &window);
        let previous = PeriodFigures::collect(records, clients, &previous_window);
        // Only needed for the trend of revenue growth itself
        let before_previous =
            PeriodFigures::collect(records, clients, &previous_window.previous()?);

        let revenue = growth(current.revenue, previous.revenue);
        let previous_revenue_growth = growth(previous.revenue, before_previous.revenue);
        let ratios = current.ratios();
        let previous_ratios = previous.ratios();

        let evaluator = KpiEvaluator::new(&settings.kpi_targets);
        let kpis = evaluator.evaluate_all([
            (KpiMetric::ProfitMargin, current.margin(), Some(previous.margin())),
            (
                KpiMetric::RevenueGrowth,
                revenue.growth_pct,
                Some(previous_revenue_growth.growth_pct),
            ),
            (KpiMetric::ClientRetention, current.retention(), Some(previous.retention())),
            (KpiMetric::ExpenseRatio, current.expense_ratio(), Some(previous.expense_ratio())),
            (
                KpiMetric::CollectionRate,
                current.collection_rate(),
                Some(previous.collection_rate()),
            ),
            (
                KpiMetric::CurrentRatio,
                ratios.current_ratio,
                Some(previous_ratios.current_ratio),
            ),
            (
                KpiMetric::DebtToEquity,
                ratios.debt_to_equity,
                Some(previous_ratios.debt_to_equity),
            ),
            (
                KpiMetric::ReturnOnAssets,
                ratios.return_on_assets,
                Some(previous_ratios.return_on_assets),
            ),
        ]);

        let trend = bucket_series(records, window.end, settings.trend_months, Granularity::Month)?;

        tracing::debug!(
            %window,
            revenue = %current.revenue,
            expenses = %current.expenses,
            kpis = kpis.len(),
            "generated business metrics"
        );

        Ok(Self {
            window,
            previous_window,
            revenue,
            expenses: growth(current.expenses, previous.expenses),
            net_profit: current.revenue - current.expenses,
            profit_margin: current.margin(),
            expense_ratio: current.expense_ratio(),
            receivables: current.receivables,
            receivable_count: current.receivable_count,
            collection_rate: current.collection_rate(),
            total_clients: current.total_clients,
            new_clients: current.new_clients,
            client_retention: current.retention(),
            ratios,
            top_expense_categories: current.top_expenses,
            trend,
            kpis,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let money = |m: Money| m.format_with_symbol(currency);
        let mut output = String::new();

        output.push_str(&format!("Business Metrics - {}\n", self.window));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!("Compared with {}\n\n", self.previous_window));

        output.push_str(&format!(
            "{:<24} {:>16} {:>10}\n",
            "Revenue",
            money(self.revenue.current),
            format_change(self.revenue.growth_pct)
        ));
        output.push_str(&format!(
            "{:<24} {:>16} {:>10}\n",
            "Expenses",
            money(self.expenses.current),
            format_change(self.expenses.growth_pct)
        ));
        output.push_str(&format!("{:<24} {:>16}\n", "Net Profit", money(self.net_profit)));
        output.push_str(&format!(
            "{:<24} {:>16}\n",
            "Profit Margin",
            format_percentage(self.profit_margin)
        ));
        output.push_str(&format!(
            "{:<24} {:>16} ({} open)\n",
            "Receivables",
            money(self.receivables),
            self.receivable_count
        ));
        output.push_str(&format!(
            "{:<24} {:>16} ({} new of {})\n",
            "Client Retention",
            format_percentage(self.client_retention),
            self.new_clients,
            self.total_clients
        ));

        output.push_str("\nRatios (simplified)\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "  Current {:.2}   Quick {:.2}   Debt/Equity {:.2}   ROA {}\n",
            self.ratios.current_ratio,
            self.ratios.quick_ratio,
            self.ratios.debt_to_equity,
            format_percentage(self.ratios.return_on_assets)
        ));

        if !self.top_expense_categories.is_empty() {
            output.push_str("\nTop Expense Categories\n");
            output.push_str(&"-".repeat(60));
            output.push('\n');
            for (name, amount) in &self.top_expense_categories {
                output.push_str(&format!("  {:<22} {:>16}\n", name, money(*amount)));
            }
        }

        output.push_str("\nMonthly Trend\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for bucket in &self.trend {
            output.push_str(&format!(
                "  {:<10} in {:>14}  out {:>14}  net {:>14}\n",
                bucket.label, bucket.total_credit, bucket.total_debit, bucket.net
            ));
        }

        output.push('\n');
        output.push_str(&format_kpi_table(&self.kpis));
        output.push('\n');
        output
    }

    /// Export the headline figures, KPIs and trend as one flat table
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> LedgerLensResult<()> {
        let window = self.window.to_string();
        let row = |section: &str, metric: &str, value: String, extra: [String; 2]| {
            let [first, second] = extra;
            vec![
                window.clone(),
                section.to_string(),
                metric.to_string(),
                value,
                first,
                second,
            ]
        };
        let summary = |metric: &str, value: String| row("summary", metric, value, Default::default());

        let mut rows = vec![
            summary("revenue", self.revenue.current.to_string()),
            summary("revenue_growth_pct", decimal(self.revenue.growth_pct)),
            summary("expenses", self.expenses.current.to_string()),
            summary("net_profit", self.net_profit.to_string()),
            summary("profit_margin_pct", decimal(self.profit_margin)),
            summary("receivables", self.receivables.to_string()),
            summary("client_retention_pct", decimal(self.client_retention)),
        ];

        for kpi in &self.kpis {
            rows.push(row(
                "kpi",
                &kpi.name,
                kpi.value.to_string(),
                [kpi.target.to_string(), kpi.status.to_string()],
            ));
        }
        for bucket in &self.trend {
            rows.push(row(
                "trend",
                &bucket.label,
                bucket.net.to_string(),
                [bucket.total_credit.to_string(), bucket.total_debit.to_string()],
            ));
        }

        write_rows(
            writer,
            &["window", "section", "metric", "value", "target_or_in", "status_or_out"],
            rows,
        )
    }
}
