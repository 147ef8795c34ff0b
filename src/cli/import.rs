//! CLI command handler for CSV import
//!
//! Detects the column mapping from the header row, imports into a record
//! table, and reports skipped duplicates and bad rows.

use std::path::Path;

use crate::error::{LedgerLensError, LedgerLensResult};
use crate::services::ImportService;
use crate::storage::Storage;

/// Handle `record import`
pub fn handle_import_command(
    storage: &Storage,
    file: &Path,
    table: &str,
    user: Option<&str>,
    date_format: Option<&str>,
    delimiter: char,
) -> LedgerLensResult<()> {
    if !file.exists() {
        return Err(LedgerLensError::Import(format!(
            "File not found: {}",
            file.display()
        )));
    }

    if !delimiter.is_ascii() {
        return Err(LedgerLensError::Validation(format!(
            "Delimiter must be a single ASCII character, got '{}'",
            delimiter
        )));
    }

    let import_service = ImportService::new(storage);
    let mut mapping = import_service.detect_mapping(file, delimiter as u8)?;
    if let Some(format) = date_format {
        mapping = mapping.with_date_format(format);
    }

    let result = import_service.import_file(file, table, &mapping, user)?;

    println!("Import Complete!");
    println!("  Imported:    {}", result.imported);
    println!("  Skipped:     {}", result.duplicates_skipped);
    if !result.error_messages.is_empty() {
        println!("  Errors:      {}", result.errors);
        for (row, msg) in &result.error_messages {
            println!("    Row {}: {}", row, msg);
        }
    }

    Ok(())
}
