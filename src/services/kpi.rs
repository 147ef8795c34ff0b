//! KPI status classifier
//!
//! Maps a metric value onto the three canonical statuses against a target
//! and band, and renders a signed delta as a trend. Category wording lives
//! in `display::kpi`.

use serde::{Deserialize, Serialize};

use crate::models::{Kpi, KpiMetric, KpiStatus, KpiTarget, KpiValue, Trend};

/// Status and trend of one metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiClassification {
    pub status: KpiStatus,
    pub trend: Trend,
}

/// Classify `value` against `target`
///
/// Meeting the target exactly is positive. A miss of at most `band_width` on
/// the worse side is a warning. Anything further away, or a non-finite
/// value, is negative.
pub fn classify(value: f64, target: f64, band_width: f64, higher_is_better: bool) -> KpiStatus {
    if !value.is_finite() {
        return KpiStatus::Negative;
    }

    // Distance below target, oriented so positive always means "worse"
    let shortfall = if higher_is_better {
        target - value
    } else {
        value - target
    };

    if shortfall <= 0.0 {
        KpiStatus::Positive
    } else if shortfall <= band_width.abs() {
        KpiStatus::Warning
    } else {
        KpiStatus::Negative
    }
}

pub fn trend_from_delta(delta: f64) -> Trend {
    if delta > 0.0 {
        Trend::Up
    } else if delta < 0.0 {
        Trend::Down
    } else {
        Trend::Stable
    }
}

pub fn classify_with_trend(
    value: f64,
    target: f64,
    band_width: f64,
    higher_is_better: bool,
    delta: f64,
) -> KpiClassification {
    KpiClassification {
        status: classify(value, target, band_width, higher_is_better),
        trend: trend_from_delta(delta),
    }
}

/// Classifies metric values against a configured target table
pub struct KpiEvaluator<'a> {
    targets: &'a [KpiTarget],
}

impl<'a> KpiEvaluator<'a> {
    pub fn new(targets: &'a [KpiTarget]) -> Self {
        Self { targets }
    }

    pub fn target_for(&self, metric: KpiMetric) -> Option<&'a KpiTarget> {
        self.targets.iter().find(|t| t.metric == metric)
    }

    /// Build a `Kpi` for `metric`, or `None` if the table has no target for it
    ///
    /// `previous` is the same metric over the preceding window; without it
    /// the trend is stable.
    pub fn evaluate(&self, metric: KpiMetric, value: f64, previous: Option<f64>) -> Option<Kpi> {
        let target = self.target_for(metric)?;
        let delta = previous.map_or(0.0, |p| value - p);
        let classification = classify_with_trend(
            value,
            target.target,
            target.band_width,
            target.higher_is_better,
            delta,
        );

        let wrap = |v: f64| {
            if metric.is_percentage() {
                KpiValue::Percent(v)
            } else {
                KpiValue::Ratio(v)
            }
        };

        Some(Kpi {
            name: metric.display_name().to_string(),
            metric,
            value: wrap(value),
            target: wrap(target.target),
            status: classification.status,
            trend: classification.trend,
            category: target.category,
        })
    }

    /// Evaluate every `(metric, value, previous)` triple that has a target
    pub fn evaluate_all<I>(&self, readings: I) -> Vec<Kpi>
    where
        I: IntoIterator<Item = (KpiMetric, f64, Option<f64>)>,
    {
        readings
            .into_iter()
            .filter_map(|(metric, value, previous)| self.evaluate(metric, value, previous))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KpiCategory;

    #[test]
    fn test_warning_within_band_below_target() {
        assert_eq!(classify(12.0, 15.0, 5.0, true), KpiStatus::Warning);
    }

    #[test]
    fn test_higher_is_better() {
        assert_eq!(classify(15.0, 15.0, 5.0, true), KpiStatus::Positive);
        assert_eq!(classify(30.0, 15.0, 5.0, true), KpiStatus::Positive);
        assert_eq!(classify(10.0, 15.0, 5.0, true), KpiStatus::Warning);
        assert_eq!(classify(9.99, 15.0, 5.0, true), KpiStatus::Negative);
    }

    #[test]
    fn test_lower_is_better() {
        assert_eq!(classify(60.0, 70.0, 10.0, false), KpiStatus::Positive);
        assert_eq!(classify(75.0, 70.0, 10.0, false), KpiStatus::Warning);
        assert_eq!(classify(81.0, 70.0, 10.0, false), KpiStatus::Negative);
    }

    #[test]
    fn test_non_finite_value_is_negative() {
        assert_eq!(classify(f64::NAN, 1.0, 1.0, true), KpiStatus::Negative);
    }

    #[test]
    fn test_trend_from_delta() {
        assert_eq!(trend_from_delta(0.5), Trend::Up);
        assert_eq!(trend_from_delta(-0.5), Trend::Down);
        assert_eq!(trend_from_delta(0.0), Trend::Stable);
    }

    #[test]
    fn test_evaluator_uses_target_table() {
        let targets = KpiTarget::defaults();
        let evaluator = KpiEvaluator::new(&targets);

        let kpi = evaluator
            .evaluate(KpiMetric::ProfitMargin, 25.0, Some(30.0))
            .unwrap();
        assert_eq!(kpi.status, KpiStatus::Positive);
        assert_eq!(kpi.trend, Trend::Down);
        assert_eq!(kpi.value, KpiValue::Percent(25.0));
        assert_eq!(kpi.category, KpiCategory::Financial);

        let ratio = evaluator.evaluate(KpiMetric::CurrentRatio, 1.2, None).unwrap();
        assert_eq!(ratio.status, KpiStatus::Warning);
        assert_eq!(ratio.trend, Trend::Stable);
        assert_eq!(ratio.target, KpiValue::Ratio(1.5));
    }

    #[test]
    fn test_evaluator_skips_metrics_without_target() {
        let targets = vec![KpiTarget::new(
            KpiMetric::ClientRetention,
            80.0,
            10.0,
            true,
            KpiCategory::Customer,
        )];
        let evaluator = KpiEvaluator::new(&targets);
        let kpis = evaluator.evaluate_all([
            (KpiMetric::ClientRetention, 90.0, None),
            (KpiMetric::ProfitMargin, 10.0, None),
        ]);
        assert_eq!(kpis.len(), 1);
        assert_eq!(kpis[0].name, "Client Retention");
    }
}
