//! End-to-end engine scenarios through the public API

use chrono::NaiveDate;
use tempfile::TempDir;

use ledgerlens::config::paths::LedgerLensPaths;
use ledgerlens::config::settings::Settings;
use ledgerlens::models::{
    Budget, Client, KpiStatus, MonetaryRecord, Money, PeriodWindow, ProgressBand,
    ProgressThresholds, RecordKind, RecordStatus, TaxBracket, TaxSchedule,
};
use ledgerlens::reports::{BudgetOverviewReport, BusinessMetricsReport, TaxReport};
use ledgerlens::services::aggregate::{aggregate, quarter_buckets};
use ledgerlens::services::{
    band, classify, compute_tax, growth, progress, PeriodResolver,
};
use ledgerlens::storage::{RecordFilter, RecordStore, Storage, DEFAULT_TABLE};
use ledgerlens::LedgerLensError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn units(n: i64) -> Money {
    Money::from_units(n)
}

#[test]
fn growth_from_zero_previous_is_zero() {
    let metric = growth(units(5_000), Money::zero());
    assert_eq!(metric.growth_pct, 0.0);
    assert!(!metric.growth_pct.is_nan());
}

#[test]
fn window_bounds_are_inclusive() {
    let window = PeriodResolver::resolve("this-month", date(2025, 4, 15), None).unwrap();
    let records = vec![
        MonetaryRecord::new(units(10), date(2025, 4, 1), RecordKind::Income),
        MonetaryRecord::new(units(20), date(2025, 4, 30), RecordKind::Income),
        MonetaryRecord::new(units(40), date(2025, 5, 1), RecordKind::Income),
    ];

    let first = aggregate(&records, &window);
    let second = aggregate(&records, &window);
    assert_eq!(first.total, units(30));
    assert_eq!(first.count, 2);
    assert_eq!(first, second);
}

#[test]
fn custom_range_must_be_ordered() {
    let err = PeriodResolver::resolve(
        "custom",
        date(2025, 1, 1),
        Some((date(2025, 2, 1), date(2025, 1, 1))),
    )
    .unwrap_err();
    assert!(matches!(err, LedgerLensError::InvalidRange { .. }));
}

#[test]
fn default_schedule_taxes_one_and_a_half_million_at_four_percent() {
    let result = compute_tax(units(1_500_000), &TaxSchedule::default_business()).unwrap();
    assert_eq!(result.liability, units(60_000));
    assert!((result.effective_rate_pct - 4.0).abs() < 1e-9);
    assert_eq!(result.marginal_rate, 0.10);
}

#[test]
fn tax_is_continuous_at_bracket_edge() {
    let schedule = TaxSchedule::default_business();
    let at_edge = compute_tax(units(600_000), &schedule).unwrap();
    let just_above = compute_tax(Money::from_cents(60_000_001), &schedule).unwrap();
    assert_eq!(at_edge.liability, Money::zero());
    assert!(just_above.liability >= at_edge.liability);
    assert!(just_above.liability.cents() <= 1);
}

#[test]
fn gap_in_bracket_table_is_rejected() {
    let schedule = TaxSchedule::new(
        "gap",
        vec![
            TaxBracket::new(Money::zero(), Some(units(100)), 0.0),
            TaxBracket::new(units(200), None, 0.1),
        ],
    );
    let err = compute_tax(units(1_000), &schedule).unwrap_err();
    assert!(matches!(err, LedgerLensError::InvalidBracketTable(_)));
}

#[test]
fn over_budget_progress() {
    let state = progress(units(50_000), units(65_000));
    assert_eq!(state.remaining, units(-15_000));
    assert_eq!(state.percentage, 130.0);
    assert_eq!(band(state.percentage, &ProgressThresholds::default()), ProgressBand::Over);
}

#[test]
fn kpi_within_band_is_warning() {
    assert_eq!(classify(12.0, 15.0, 5.0, true), KpiStatus::Warning);
}

#[test]
fn six_quarter_buckets_are_contiguous_oldest_first() {
    let buckets = quarter_buckets(date(2025, 8, 20), 6).unwrap();
    assert_eq!(buckets.len(), 6);
    assert!(buckets[5].window.contains(date(2025, 8, 20)));
    for pair in buckets.windows(2) {
        assert!(pair[0].window.end < pair[1].window.start);
        assert_eq!(pair[0].window.end.succ_opt().unwrap(), pair[1].window.start);
    }
}

#[test]
fn reports_read_from_the_record_store() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::new(LedgerLensPaths::with_base_dir(dir.path().to_path_buf())).unwrap();
    storage.load_all().unwrap();

    let rows = vec![
        MonetaryRecord::new(units(8_000), date(2025, 2, 10), RecordKind::Income)
            .with_status(RecordStatus::Paid)
            .with_user("alice"),
        MonetaryRecord::new(units(10_000), date(2025, 3, 10), RecordKind::Income)
            .with_status(RecordStatus::Paid)
            .with_user("alice"),
        MonetaryRecord::new(units(4_000), date(2025, 3, 12), RecordKind::Expense)
            .with_category("Payroll")
            .with_user("alice"),
        // Another user's records are never mixed in
        MonetaryRecord::new(units(99_000), date(2025, 3, 12), RecordKind::Income)
            .with_user("bob"),
    ];
    storage.records.insert_many(DEFAULT_TABLE, rows).unwrap();
    storage
        .clients
        .add(Client::new("Acme", date(2024, 6, 1)))
        .unwrap();
    storage
        .budgets
        .add(Budget::new("Payroll", "payroll", units(5_000)))
        .unwrap();

    let records = storage
        .records
        .fetch_records(DEFAULT_TABLE, &RecordFilter::new().for_user("alice"))
        .unwrap();
    assert_eq!(records.len(), 3);

    let march = PeriodWindow::new(date(2025, 3, 1), date(2025, 3, 31)).unwrap();
    let metrics = BusinessMetricsReport::generate(
        &records,
        &storage.clients.all().unwrap(),
        march,
        &Settings::default(),
    )
    .unwrap();
    assert_eq!(metrics.revenue.current, units(10_000));
    assert_eq!(metrics.revenue.growth_pct, 25.0);
    assert_eq!(metrics.net_profit, units(6_000));
    assert!((metrics.profit_margin - 60.0).abs() < 1e-9);
    assert_eq!(metrics.client_retention, 100.0);

    let budgets = BudgetOverviewReport::generate(
        &storage.budgets.all().unwrap(),
        &records,
        march,
        &ProgressThresholds::default(),
    );
    assert_eq!(budgets.rows[0].progress.percentage, 80.0);
    assert_eq!(budgets.rows[0].band, ProgressBand::OnTrack);

    let tax = TaxReport::generate(
        &records,
        2025,
        &TaxSchedule::default_business(),
        &Settings::default().quarterly_estimate,
    )
    .unwrap();
    assert_eq!(tax.taxable_income, units(14_000));
    assert_eq!(tax.result.liability, Money::zero());
}
