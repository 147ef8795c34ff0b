//! Tax schedule model
//!
//! Bracket tables are configuration data: the calculator in
//! `services::tax` knows nothing about any jurisdiction.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::money::Money;
use crate::error::{LedgerLensError, LedgerLensResult};

/// One marginal band: income in `[lower_bound, upper_bound)` is taxed at `rate`
///
/// Bounds serialize as cents, like every `Money`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower_bound: Money,
    /// `None` for the top, unbounded bracket
    #[serde(default)]
    pub upper_bound: Option<Money>,
    /// Fraction in `[0, 1]`
    pub rate: f64,
}

impl TaxBracket {
    pub fn new(lower_bound: Money, upper_bound: Option<Money>, rate: f64) -> Self {
        Self {
            lower_bound,
            upper_bound,
            rate,
        }
    }
}

/// An ordered, contiguous bracket table covering `[0, ∞)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSchedule {
    #[serde(default = "default_schedule_name")]
    pub name: String,
    pub brackets: Vec<TaxBracket>,
}

fn default_schedule_name() -> String {
    "custom".to_string()
}

impl TaxSchedule {
    pub fn new(name: impl Into<String>, brackets: Vec<TaxBracket>) -> Self {
        Self {
            name: name.into(),
            brackets,
        }
    }

    /// Illustrative business-income schedule used as the configuration default
    pub fn default_business() -> Self {
        let band = |lower: i64, upper: Option<i64>, rate: f64| {
            TaxBracket::new(Money::from_units(lower), upper.map(Money::from_units), rate)
        };
        Self::new(
            "business-default",
            vec![
                band(0, Some(600_000), 0.0),
                band(600_000, Some(1_200_000), 0.05),
                band(1_200_000, Some(2_400_000), 0.10),
                band(2_400_000, Some(3_600_000), 0.15),
                band(3_600_000, Some(6_000_000), 0.20),
                band(6_000_000, None, 0.25),
            ],
        )
    }

    /// Check contiguity, ordering and rate domain
    pub fn validate(&self) -> LedgerLensResult<()> {
        let invalid = |msg: String| Err(LedgerLensError::InvalidBracketTable(msg));

        let Some(first) = self.brackets.first() else {
            return invalid("table has no brackets".into());
        };
        if !first.lower_bound.is_zero() {
            return invalid(format!(
                "first bracket must start at 0, starts at {}",
                first.lower_bound
            ));
        }

        let last_index = self.brackets.len() - 1;
        for (i, bracket) in self.brackets.iter().enumerate() {
            if !bracket.rate.is_finite() || !(0.0..=1.0).contains(&bracket.rate) {
                return invalid(format!(
                    "bracket {} has rate {} outside [0, 1]",
                    i + 1,
                    bracket.rate
                ));
            }

            match bracket.upper_bound {
                Some(upper) => {
                    if upper <= bracket.lower_bound {
                        return invalid(format!(
                            "bracket {} is not ascending: {} to {}",
                            i + 1,
                            bracket.lower_bound,
                            upper
                        ));
                    }
                    if i == last_index {
                        return invalid("last bracket must be unbounded".into());
                    }
                    let next = &self.brackets[i + 1];
                    if next.lower_bound != upper {
                        return invalid(format!(
                            "bracket {} ends at {} but bracket {} starts at {}",
                            i + 1,
                            upper,
                            i + 2,
                            next.lower_bound
                        ));
                    }
                }
                None => {
                    if i != last_index {
                        return invalid(format!(
                            "only the last bracket may be unbounded (bracket {})",
                            i + 1
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    /// Load a schedule from a `.json`, `.yaml` or `.yml` file and validate it
    pub fn load(path: &Path) -> LedgerLensResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LedgerLensError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let schedule: TaxSchedule = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)?,
            _ => serde_json::from_str(&contents).map_err(|e| {
                LedgerLensError::Config(format!("Failed to parse {}: {}", path.display(), e))
            })?,
        };

        schedule.validate()?;
        Ok(schedule)
    }
}

impl Default for TaxSchedule {
    fn default() -> Self {
        Self::default_business()
    }
}

/// Flat-rate rule for sub-annual estimates: `rate` applied to income above `threshold`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyEstimateRule {
    pub threshold: Money,
    pub rate: f64,
}

impl Default for QuarterlyEstimateRule {
    fn default() -> Self {
        Self {
            threshold: Money::from_units(150_000),
            rate: 0.10,
        }
    }
}

/// How much of the income fell into one bracket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketShare {
    pub lower_bound: Money,
    pub upper_bound: Option<Money>,
    pub rate: f64,
    pub taxable_amount: Money,
    pub tax: Money,
}

/// Outcome of the marginal calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxResult {
    pub taxable_income: Money,
    pub liability: Money,
    pub effective_rate_pct: f64,
    /// Rate of the highest bracket the income reached
    pub marginal_rate: f64,
    pub breakdown: Vec<BracketShare>,
}

/// Outcome of the flat quarterly estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyEstimate {
    pub income: Money,
    pub threshold: Money,
    pub rate: f64,
    pub estimate: Money,
}
