//! Progressive tax calculator
//!
//! Two independent modes: the annual marginal-bracket calculation over a
//! configured `TaxSchedule`, and a flat quarterly estimate over a
//! `QuarterlyEstimateRule`. Neither knows anything about a jurisdiction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{LedgerLensError, LedgerLensResult};
use crate::models::{
    BracketShare, Money, QuarterlyEstimate, QuarterlyEstimateRule, TaxResult, TaxSchedule,
};
use crate::services::growth::safe_ratio;

/// Which calculation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaxMode {
    Marginal,
    QuarterlyEstimate,
}

impl fmt::Display for TaxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Marginal => write!(f, "marginal"),
            Self::QuarterlyEstimate => write!(f, "quarterly-estimate"),
        }
    }
}

impl FromStr for TaxMode {
    type Err = LedgerLensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "marginal" | "annual" => Ok(Self::Marginal),
            "quarterly-estimate" | "quarterly" => Ok(Self::QuarterlyEstimate),
            other => Err(LedgerLensError::Validation(format!(
                "Unknown tax mode: {}",
                other
            ))),
        }
    }
}

/// Apply a marginal schedule to `taxable_income`
///
/// The schedule is validated first; a malformed table is an error, never a
/// silent zero. Negative income is taxed as zero.
pub fn compute_tax(taxable_income: Money, schedule: &TaxSchedule) -> LedgerLensResult<TaxResult> {
    schedule.validate()?;

    let income = taxable_income.max(Money::zero());
    let mut liability_cents = 0.0_f64;
    let mut marginal_rate = 0.0;
    let mut breakdown = Vec::new();

    for bracket in &schedule.brackets {
        if income <= bracket.lower_bound {
            break;
        }
        let ceiling = bracket.upper_bound.map_or(income, |upper| income.min(upper));
        let taxable = ceiling - bracket.lower_bound;
        let tax_cents = taxable.cents() as f64 * bracket.rate;

        liability_cents += tax_cents;
        marginal_rate = bracket.rate;
        breakdown.push(BracketShare {
            lower_bound: bracket.lower_bound,
            upper_bound: bracket.upper_bound,
            rate: bracket.rate,
            taxable_amount: taxable,
            tax: Money::from_cents(tax_cents.round() as i64),
        });
    }

    // Rounded once so the total is monotone in income
    let liability = Money::from_cents(liability_cents.round() as i64);
    let effective_rate_pct = safe_ratio(liability.as_f64(), income.as_f64()) * 100.0;

    tracing::debug!(
        schedule = %schedule.name,
        income = %income,
        liability = %liability,
        effective_rate_pct,
        "computed marginal tax"
    );

    Ok(TaxResult {
        taxable_income: income,
        liability,
        effective_rate_pct,
        marginal_rate,
        breakdown,
    })
}

/// Flat sub-annual estimate: `rate` on whatever `income` exceeds `threshold`
pub fn quarterly_estimate(
    income: Money,
    rule: &QuarterlyEstimateRule,
) -> LedgerLensResult<QuarterlyEstimate> {
    if !rule.rate.is_finite() || !(0.0..=1.0).contains(&rule.rate) {
        return Err(LedgerLensError::Validation(format!(
            "Quarterly estimate rate {} is outside [0, 1]",
            rule.rate
        )));
    }
    if rule.threshold.is_negative() {
        return Err(LedgerLensError::Validation(format!(
            "Quarterly estimate threshold {} is negative",
            rule.threshold
        )));
    }

    let excess = (income - rule.threshold).max(Money::zero());
    Ok(QuarterlyEstimate {
        income,
        threshold: rule.threshold,
        rate: rule.rate,
        estimate: excess.scale(rule.rate),
    })
}
