//! CSV import service
//!
//! Reads monetary records from CSV exports with a column mapping, detects
//! the mapping from a header row when asked, skips duplicates of records
//! already in the target table, and reports bad rows without aborting.

use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};

use crate::error::{LedgerLensError, LedgerLensResult};
use crate::models::{MonetaryRecord, Money, RecordKind, RecordStatus};
use crate::storage::{RecordFilter, RecordStore, Storage};

/// Column mapping configuration for CSV import
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    pub date_column: usize,
    pub amount_column: usize,
    /// Without a kind column the sign decides: negative is a debit, positive a credit
    pub kind_column: Option<usize>,
    pub category_column: Option<usize>,
    pub status_column: Option<usize>,
    pub description_column: Option<usize>,
    pub client_column: Option<usize>,
    /// Date format tried first (e.g., "%Y-%m-%d", "%m/%d/%Y")
    pub date_format: String,
    pub has_header: bool,
    pub delimiter: u8,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            date_column: 0,
            amount_column: 1,
            kind_column: None,
            category_column: None,
            status_column: None,
            description_column: Some(2),
            client_column: None,
            date_format: "%Y-%m-%d".to_string(),
            has_header: true,
            delimiter: b',',
        }
    }
}

impl ColumnMapping {
    /// Layout written by `ledgerlens record list --csv`:
    /// date, kind, amount, category, status, description
    pub fn ledger_export() -> Self {
        Self {
            date_column: 0,
            amount_column: 2,
            kind_column: Some(1),
            category_column: Some(3),
            status_column: Some(4),
            description_column: Some(5),
            client_column: None,
            ..Self::default()
        }
    }

    pub fn with_date_format(mut self, format: &str) -> Self {
        self.date_format = format.to_string();
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Detect columns from a header row by name
    pub fn detect_from_headers(headers: &StringRecord) -> LedgerLensResult<Self> {
        let mut mapping = Self {
            description_column: None,
            ..Self::default()
        };
        let mut found_date = false;
        let mut found_amount = false;

        for (idx, header) in headers.iter().enumerate() {
            let h = header.trim().to_lowercase();

            if !found_date && (h.contains("date") || h.contains("posted")) {
                mapping.date_column = idx;
                found_date = true;
            } else if !found_amount && (h.contains("amount") || h == "total" || h == "value") {
                mapping.amount_column = idx;
                found_amount = true;
            } else if h == "kind" || h == "type" {
                mapping.kind_column = Some(idx);
            } else if h.contains("category") {
                mapping.category_column = Some(idx);
            } else if h == "status" {
                mapping.status_column = Some(idx);
            } else if h.contains("client") || h.contains("customer") {
                mapping.client_column = Some(idx);
            } else if h.contains("description") || h.contains("memo") || h.contains("payee") {
                mapping.description_column = Some(idx);
            }
        }

        if !found_date || !found_amount {
            return Err(LedgerLensError::Import(
                "Could not find date and amount columns in the header row".into(),
            ));
        }
        Ok(mapping)
    }
}

/// Rows that parsed, and the ones that did not
#[derive(Debug, Default)]
pub struct ParsedImport {
    pub records: Vec<MonetaryRecord>,
    /// 1-based data row number to error message
    pub errors: BTreeMap<usize, String>,
}

/// Result of a completed import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportResult {
    pub imported: usize,
    pub duplicates_skipped: usize,
    pub errors: usize,
    pub error_messages: BTreeMap<usize, String>,
}

/// Parse CSV data from any reader
pub fn parse_reader<R: Read>(reader: R, mapping: &ColumnMapping) -> LedgerLensResult<ParsedImport> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(mapping.has_header)
        .delimiter(mapping.delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut parsed = ParsedImport::default();
    for (idx, row) in csv_reader.records().enumerate() {
        let row_number = idx + 1;
        let result = row
            .map_err(|e| format!("Error reading CSV record: {}", e))
            .and_then(|row| parse_row(&row, mapping));

        match result {
            Ok(record) => parsed.records.push(record),
            Err(message) => {
                tracing::warn!(row = row_number, %message, "skipping import row");
                parsed.errors.insert(row_number, message);
            }
        }
    }
    Ok(parsed)
}

fn parse_row(row: &StringRecord, mapping: &ColumnMapping) -> Result<MonetaryRecord, String> {
    let field = |col: Option<usize>| {
        col.and_then(|c| row.get(c))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    let date_str = field(Some(mapping.date_column)).ok_or("Missing date")?;
    let date = parse_date(date_str, &mapping.date_format)?;

    let amount_str = field(Some(mapping.amount_column)).ok_or("Missing amount")?;
    let signed = Money::parse(amount_str)
        .map_err(|e| format!("Could not parse amount '{}': {}", amount_str, e))?;

    let kind = match field(mapping.kind_column) {
        Some(kind) => kind.parse::<RecordKind>()?,
        None if signed.is_negative() => RecordKind::Debit,
        None => RecordKind::Credit,
    };

    let mut record = MonetaryRecord::new(signed.abs(), date, kind);
    if let Some(category) = field(mapping.category_column) {
        record = record.with_category(category);
    }
    if let Some(status) = field(mapping.status_column) {
        record = record.with_status(status.parse::<RecordStatus>()?);
    }
    if let Some(description) = field(mapping.description_column) {
        record = record.with_description(description);
    }
    if let Some(client) = field(mapping.client_column) {
        record = record.with_client(client);
    }
    Ok(record)
}

/// Parse a date with the mapping's format, falling back to common layouts
fn parse_date(s: &str, primary_format: &str) -> Result<NaiveDate, String> {
    if let Ok(date) = NaiveDate::parse_from_str(s, primary_format) {
        return Ok(date);
    }

    const FALLBACKS: [&str; 6] = [
        "%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y", "%d %b %Y",
    ];
    FALLBACKS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .ok_or_else(|| format!("Could not parse date: '{}'", s))
}

/// Identity used for duplicate detection
fn fingerprint(record: &MonetaryRecord) -> (NaiveDate, i64, RecordKind, String) {
    (
        record.occurred_on,
        record.amount.cents(),
        record.kind,
        record.description.to_lowercase(),
    )
}

/// Service for CSV import into a record table
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Read the first row of a file and detect a mapping from it
    pub fn detect_mapping(&self, path: &Path, delimiter: u8) -> LedgerLensResult<ColumnMapping> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .from_path(path)?;
        let headers = reader.headers()?.clone();
        Ok(ColumnMapping::detect_from_headers(&headers)?.with_delimiter(delimiter))
    }

    /// Import a CSV file into `table`, tagging every record with `user_id`
    pub fn import_file(
        &self,
        path: &Path,
        table: &str,
        mapping: &ColumnMapping,
        user_id: Option<&str>,
    ) -> LedgerLensResult<ImportResult> {
        let file = std::fs::File::open(path).map_err(|e| {
            LedgerLensError::Import(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let parsed = parse_reader(file, mapping)?;
        self.import_parsed(parsed, table, user_id)
    }

    pub fn import_parsed(
        &self,
        parsed: ParsedImport,
        table: &str,
        user_id: Option<&str>,
    ) -> LedgerLensResult<ImportResult> {
        let mut filter = RecordFilter::new();
        if let Some(user_id) = user_id {
            filter = filter.for_user(user_id);
        }
        let mut seen: HashSet<_> = self
            .storage
            .records
            .fetch_records(table, &filter)?
            .iter()
            .map(fingerprint)
            .collect();

        let mut fresh = Vec::new();
        let mut duplicates_skipped = 0;
        for mut record in parsed.records {
            if let Some(user_id) = user_id {
                record.user_id = Some(user_id.to_string());
            }
            if seen.insert(fingerprint(&record)) {
                fresh.push(record);
            } else {
                duplicates_skipped += 1;
            }
        }

        let imported = if fresh.is_empty() {
            0
        } else {
            self.storage.records.insert_many(table, fresh)?
        };

        tracing::info!(
            table,
            imported,
            duplicates_skipped,
            errors = parsed.errors.len(),
            "import finished"
        );

        Ok(ImportResult {
            imported,
            duplicates_skipped,
            errors: parsed.errors.len(),
            error_messages: parsed.errors,
        })
    }
}
