//! Configuration module for LedgerLens
//!
//! Path resolution and the persisted settings that carry the engine's
//! configuration tables.

pub mod paths;
pub mod settings;

pub use paths::LedgerLensPaths;
pub use settings::Settings;
