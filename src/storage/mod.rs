//! Storage layer for LedgerLens
//!
//! JSON file storage with atomic writes: a multi-table record store behind
//! the `RecordStore` trait, plus collections for budgets, savings goals and
//! clients.

pub mod collection;
pub mod file_io;
pub mod records;

pub use collection::Collection;
pub use file_io::{read_json, write_json_atomic};
pub use records::{RecordFilter, RecordRepository, RecordStore, DEFAULT_TABLE};

use crate::config::paths::LedgerLensPaths;
use crate::error::LedgerLensResult;
use crate::models::{Budget, Client, SavingsGoal};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: LedgerLensPaths,
    pub records: RecordRepository,
    pub budgets: Collection<Budget>,
    pub goals: Collection<SavingsGoal>,
    pub clients: Collection<Client>,
}

impl Storage {
    pub fn new(paths: LedgerLensPaths) -> LedgerLensResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            records: RecordRepository::new(paths.data_dir()),
            budgets: Collection::new(paths.budgets_file()),
            goals: Collection::new(paths.goals_file()),
            clients: Collection::new(paths.clients_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &LedgerLensPaths {
        &self.paths
    }

    /// Load the entity collections; record tables load lazily on first use
    pub fn load_all(&self) -> LedgerLensResult<()> {
        self.budgets.load()?;
        self.goals.load()?;
        self.clients.load()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}
