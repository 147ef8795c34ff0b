//! KPI display formatting
//!
//! The classifier only knows positive/warning/negative; the wording shown
//! to the user depends on the KPI's category.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Kpi, KpiCategory, KpiStatus};

/// User-facing label for a status within a category
pub fn status_label(status: KpiStatus, category: KpiCategory) -> &'static str {
    use KpiCategory::*;
    use KpiStatus::*;

    match (category, status) {
        (Customer, Positive) => "Excellent",
        (Customer, Warning) => "Good",
        (Customer, Negative) => "Needs Improvement",
        (Operational, Positive) => "Efficient",
        (Operational, Warning) => "Moderate",
        (Operational, Negative) => "Inefficient",
        (Growth, Positive) => "Growing",
        (Growth, Warning) => "Slowing",
        (Growth, Negative) => "Declining",
        (Financial, Positive) => "Healthy",
        (Financial, Warning) => "Watch",
        (Financial, Negative) => "At Risk",
    }
}

#[derive(Tabled)]
struct KpiRow {
    #[tabled(rename = "KPI")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Trend")]
    trend: String,
}

impl From<&Kpi> for KpiRow {
    fn from(kpi: &Kpi) -> Self {
        Self {
            name: kpi.name.clone(),
            value: kpi.value.to_string(),
            target: kpi.target.to_string(),
            status: status_label(kpi.status, kpi.category).to_string(),
            trend: format!("{} {}", kpi.trend.arrow(), kpi.trend),
        }
    }
}

/// Render KPIs as a table
pub fn format_kpi_table(kpis: &[Kpi]) -> String {
    if kpis.is_empty() {
        return "No KPIs configured.".to_string();
    }

    let rows: Vec<KpiRow> = kpis.iter().map(KpiRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{KpiMetric, KpiValue, Trend};

    #[test]
    fn test_labels_depend_on_category() {
        assert_eq!(status_label(KpiStatus::Warning, KpiCategory::Customer), "Good");
        assert_eq!(
            status_label(KpiStatus::Negative, KpiCategory::Operational),
            "Inefficient"
        );
        assert_eq!(status_label(KpiStatus::Positive, KpiCategory::Financial), "Healthy");
    }

    #[test]
    fn test_kpi_table() {
        let kpi = Kpi {
            name: "Client Retention".into(),
            metric: KpiMetric::ClientRetention,
            value: KpiValue::Percent(85.0),
            target: KpiValue::Percent(80.0),
            status: KpiStatus::Positive,
            trend: Trend::Up,
            category: KpiCategory::Customer,
        };
        let table = format_kpi_table(&[kpi]);
        assert!(table.contains("Client Retention"));
        assert!(table.contains("85.0%"));
        assert!(table.contains("Excellent"));
        assert!(table.contains("up"));
    }
}
