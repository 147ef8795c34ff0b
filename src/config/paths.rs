//! Path management for LedgerLens
//!
//! ## Path Resolution Order
//!
//! 1. `LEDGERLENS_DATA_DIR` environment variable (if set)
//! 2. The platform config directory for `ledgerlens` (via `directories`),
//!    e.g. `~/.config/ledgerlens` on Linux

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::{LedgerLensError, LedgerLensResult};

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "LEDGERLENS_DATA_DIR";

/// Manages all paths used by LedgerLens
#[derive(Debug, Clone)]
pub struct LedgerLensPaths {
    base_dir: PathBuf,
}

impl LedgerLensPaths {
    /// Resolve the base directory from the environment or the platform default
    pub fn new() -> LedgerLensResult<Self> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Use an explicit base directory (tests, `--data-dir`)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Record tables and entity collections live here
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// One JSON file per record table
    pub fn table_file(&self, table: &str) -> PathBuf {
        self.data_dir().join(format!("{}.json", table))
    }

    pub fn budgets_file(&self) -> PathBuf {
        self.data_dir().join("budgets.json")
    }

    pub fn goals_file(&self) -> PathBuf {
        self.data_dir().join("goals.json")
    }

    pub fn clients_file(&self) -> PathBuf {
        self.data_dir().join("clients.json")
    }

    /// Create the base and data directories
    pub fn ensure_directories(&self) -> LedgerLensResult<()> {
        std::fs::create_dir_all(&self.base_dir).map_err(|e| {
            LedgerLensError::Io(format!(
                "Failed to create base directory {}: {}",
                self.base_dir.display(),
                e
            ))
        })?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| LedgerLensError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Whether `ledgerlens init` has written a config file
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> LedgerLensResult<PathBuf> {
    ProjectDirs::from("", "", "ledgerlens")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| {
            LedgerLensError::Config(format!(
                "Could not determine a home directory; set {}",
                DATA_DIR_ENV
            ))
        })
}
