//! LedgerLens - financial aggregation and tax engine for small-business dashboards
//!
//! This library turns dated monetary records into the figures a business
//! dashboard shows: period totals and growth, margins and simple ratios,
//! progressive income tax, KPI status, and budget or savings progress.
//!
//! # Architecture
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Records, windows, money, tax, KPI and progress types
//! - `storage`: JSON file storage layer
//! - `services`: The computation engine, plus CSV import
//! - `reports`: Dashboard reports built on the engine
//! - `display` / `export`: Terminal formatting and CSV/JSON export
//! - `cli`: Command handlers for the `ledgerlens` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use ledgerlens::models::{Money, TaxSchedule};
//! use ledgerlens::services::compute_tax;
//!
//! let result = compute_tax(Money::from_units(1_500_000), &TaxSchedule::default_business())?;
//! assert_eq!(result.liability, Money::from_units(60_000));
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerLensError, LedgerLensResult};

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Install the stderr log subscriber
///
/// `RUST_LOG` takes precedence; otherwise the level follows `-v` count
/// (warn, info, debug). Calling this more than once is a no-op.
pub fn init_tracing(verbosity: u8) {
    TRACING.call_once(|| {
        let default_level = match verbosity {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("ledgerlens={}", default_level)));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
