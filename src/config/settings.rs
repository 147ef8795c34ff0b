//! User settings for LedgerLens
//!
//! The tax schedule, quarterly estimate rule, KPI target table and progress
//! thresholds are all data here, so they can change without touching the
//! calculators. Every field has a default, so a partial `config.json` loads.

use serde::{Deserialize, Serialize};

use super::paths::LedgerLensPaths;
use crate::error::{LedgerLensError, LedgerLensResult};
use crate::models::{KpiTarget, ProgressThresholds, QuarterlyEstimateRule, TaxSchedule};
use crate::services::aggregate::MAX_BUCKETS;

/// Current config schema
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// strftime format used for display and as the CSV import default
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default)]
    pub tax_schedule: TaxSchedule,

    #[serde(default)]
    pub quarterly_estimate: QuarterlyEstimateRule,

    #[serde(default = "KpiTarget::defaults")]
    pub kpi_targets: Vec<KpiTarget>,

    #[serde(default)]
    pub progress: ProgressThresholds,

    /// Number of trailing months in trend series
    #[serde(default = "default_trend_months")]
    pub trend_months: usize,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_trend_months() -> usize {
    6
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            tax_schedule: TaxSchedule::default(),
            quarterly_estimate: QuarterlyEstimateRule::default(),
            kpi_targets: KpiTarget::defaults(),
            progress: ProgressThresholds::default(),
            trend_months: default_trend_months(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if no config file exists yet
    pub fn load_or_create(paths: &LedgerLensPaths) -> LedgerLensResult<Self> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| LedgerLensError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
            LedgerLensError::Config(format!("Failed to parse settings file: {}", e))
        })?;

        settings.validate()?;
        tracing::debug!(path = %settings_path.display(), "loaded settings");
        Ok(settings)
    }

    /// Reject configuration the engine cannot run with
    pub fn validate(&self) -> LedgerLensResult<()> {
        self.tax_schedule.validate()?;

        if self.progress.near_limit_pct > self.progress.over_pct {
            return Err(LedgerLensError::Config(format!(
                "near_limit_pct ({}) must not exceed over_pct ({})",
                self.progress.near_limit_pct, self.progress.over_pct
            )));
        }
        if !(1..=MAX_BUCKETS).contains(&self.trend_months) {
            return Err(LedgerLensError::Validation(format!(
                "trend_months must be between 1 and {}, got {}",
                MAX_BUCKETS, self.trend_months
            )));
        }
        Ok(())
    }

    pub fn save(&self, paths: &LedgerLensPaths) -> LedgerLensResult<()> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            LedgerLensError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents)
            .map_err(|e| LedgerLensError::Io(format!("Failed to write settings file: {}", e)))?;

        tracing::info!(path = %settings_path.display(), "saved settings");
        Ok(())
    }
}
