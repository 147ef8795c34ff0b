//! Record store for monetary records
//!
//! Each table (`ledger`, `invoices`, `expenses`, ...) is one JSON file under
//! the data directory, loaded the first time it is touched and rewritten
//! atomically on every change.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{LedgerLensError, LedgerLensResult};
use crate::models::{MonetaryRecord, PeriodWindow, RecordId, RecordKind, RecordStatus};

use super::file_io::{read_json, write_json_atomic};

/// Table used when the caller does not name one
pub const DEFAULT_TABLE: &str = "ledger";

/// Query parameters for `RecordStore::fetch_records`
///
/// The owning user is always passed in explicitly; `None` fields do not filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub user_id: Option<String>,
    pub window: Option<PeriodWindow>,
    pub status: Option<RecordStatus>,
    pub kind: Option<RecordKind>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn within(mut self, window: PeriodWindow) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_kind(mut self, kind: RecordKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn matches(&self, record: &MonetaryRecord) -> bool {
        if let Some(user_id) = &self.user_id {
            if record.user_id.as_deref() != Some(user_id.as_str()) {
                return false;
            }
        }
        if let Some(window) = &self.window {
            if !window.contains(record.occurred_on) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if record.status != Some(status) {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if record.kind != kind {
                return false;
            }
        }
        true
    }
}

/// The collaborator the engine reads records from
pub trait RecordStore {
    /// Records of `table` matching `filter`, oldest first
    fn fetch_records(
        &self,
        table: &str,
        filter: &RecordFilter,
    ) -> LedgerLensResult<Vec<MonetaryRecord>>;

    fn insert(&self, table: &str, record: MonetaryRecord) -> LedgerLensResult<RecordId>;

    /// Replace an existing record; unknown IDs are an error
    fn update(&self, table: &str, record: MonetaryRecord) -> LedgerLensResult<()>;

    /// Remove a record and return it
    fn delete(&self, table: &str, id: RecordId) -> LedgerLensResult<MonetaryRecord>;
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct RecordTable {
    records: Vec<MonetaryRecord>,
}

type Tables = HashMap<String, HashMap<RecordId, MonetaryRecord>>;

/// JSON-file implementation of `RecordStore`
pub struct RecordRepository {
    data_dir: PathBuf,
    tables: RwLock<Tables>,
}

impl RecordRepository {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            tables: RwLock::new(HashMap::new()),
        }
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", table))
    }

    fn check_table_name(table: &str) -> LedgerLensResult<()> {
        let valid = !table.is_empty()
            && table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(())
        } else {
            Err(LedgerLensError::Validation(format!(
                "Invalid table name: '{}'",
                table
            )))
        }
    }

    /// Load `table` from disk unless it is already in memory
    fn ensure_loaded(&self, table: &str) -> LedgerLensResult<()> {
        Self::check_table_name(table)?;

        {
            let tables = self.tables.read().map_err(|e| {
                LedgerLensError::Storage(format!("Failed to acquire read lock: {}", e))
            })?;
            if tables.contains_key(table) {
                return Ok(());
            }
        }

        let file_data: RecordTable = read_json(self.table_path(table))?;
        let mut tables = self.tables.write().map_err(|e| {
            LedgerLensError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        tables.entry(table.to_string()).or_insert_with(|| {
            file_data
                .records
                .into_iter()
                .map(|record| (record.id, record))
                .collect()
        });

        tracing::debug!(table, "loaded record table");
        Ok(())
    }

    fn save_table(&self, table: &str, rows: &HashMap<RecordId, MonetaryRecord>) -> LedgerLensResult<()> {
        let mut records: Vec<_> = rows.values().cloned().collect();
        sort_oldest_first(&mut records);
        write_json_atomic(self.table_path(table), &RecordTable { records })
    }

    /// Run `f` against a copy of `table`'s rows and persist it
    ///
    /// The cached table is only replaced once the write succeeds.
    fn mutate<R>(
        &self,
        table: &str,
        f: impl FnOnce(&mut HashMap<RecordId, MonetaryRecord>) -> LedgerLensResult<R>,
    ) -> LedgerLensResult<R> {
        self.ensure_loaded(table)?;

        let mut tables = self.tables.write().map_err(|e| {
            LedgerLensError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut rows = tables.get(table).cloned().unwrap_or_default();
        let result = f(&mut rows)?;
        self.save_table(table, &rows)?;
        tables.insert(table.to_string(), rows);
        Ok(result)
    }

    /// Look a record up by full ID or short prefix
    pub fn find(&self, table: &str, reference: &str) -> LedgerLensResult<Option<MonetaryRecord>> {
        self.ensure_loaded(table)?;

        let tables = self.tables.read().map_err(|e| {
            LedgerLensError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        let mut matches = tables
            .get(table)
            .into_iter()
            .flat_map(|rows| rows.values())
            .filter(|r| r.id.matches(reference));

        match (matches.next(), matches.next()) {
            (Some(record), None) => Ok(Some(record.clone())),
            (None, _) => Ok(None),
            (Some(_), Some(_)) => Err(LedgerLensError::Validation(format!(
                "Record reference '{}' is ambiguous",
                reference
            ))),
        }
    }

    /// Insert many records with a single write
    pub fn insert_many(&self, table: &str, records: Vec<MonetaryRecord>) -> LedgerLensResult<usize> {
        for record in &records {
            record.validate().map_err(LedgerLensError::Validation)?;
        }
        let count = records.len();
        self.mutate(table, |rows| {
            for record in records {
                rows.insert(record.id, record);
            }
            Ok(())
        })?;
        tracing::info!(table, count, "inserted records");
        Ok(count)
    }

    pub fn count(&self, table: &str) -> LedgerLensResult<usize> {
        self.ensure_loaded(table)?;
        let tables = self.tables.read().map_err(|e| {
            LedgerLensError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(tables.get(table).map_or(0, |rows| rows.len()))
    }
}

impl RecordStore for RecordRepository {
    fn fetch_records(
        &self,
        table: &str,
        filter: &RecordFilter,
    ) -> LedgerLensResult<Vec<MonetaryRecord>> {
        self.ensure_loaded(table)?;

        let tables = self.tables.read().map_err(|e| {
            LedgerLensError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        let mut records: Vec<_> = tables
            .get(table)
            .into_iter()
            .flat_map(|rows| rows.values())
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        sort_oldest_first(&mut records);
        Ok(records)
    }

    fn insert(&self, table: &str, record: MonetaryRecord) -> LedgerLensResult<RecordId> {
        record.validate().map_err(LedgerLensError::Validation)?;
        let id = record.id;
        self.mutate(table, |rows| {
            rows.insert(id, record);
            Ok(())
        })?;
        tracing::info!(table, %id, "inserted record");
        Ok(id)
    }

    fn update(&self, table: &str, record: MonetaryRecord) -> LedgerLensResult<()> {
        record.validate().map_err(LedgerLensError::Validation)?;
        let id = record.id;
        self.mutate(table, |rows| match rows.get_mut(&id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(LedgerLensError::record_not_found(id.to_string())),
        })?;
        tracing::info!(table, %id, "updated record");
        Ok(())
    }

    fn delete(&self, table: &str, id: RecordId) -> LedgerLensResult<MonetaryRecord> {
        let removed = self.mutate(table, |rows| {
            rows.remove(&id)
                .ok_or_else(|| LedgerLensError::record_not_found(id.to_string()))
        })?;
        tracing::info!(table, %id, "deleted record");
        Ok(removed)
    }
}

fn sort_oldest_first(records: &mut [MonetaryRecord]) {
    records.sort_by(|a, b| {
        a.occurred_on
            .cmp(&b.occurred_on)
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> (TempDir, RecordRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = RecordRepository::new(temp_dir.path().join("data"));
        (temp_dir, repo)
    }

    fn expense(units: i64, on: NaiveDate) -> MonetaryRecord {
        MonetaryRecord::new(Money::from_units(units), on, RecordKind::Expense)
    }

    #[test]
    fn test_insert_fetch_and_reload() {
        let (temp_dir, repo) = setup();
        repo.insert("expenses", expense(30, date(2025, 2, 1))).unwrap();
        repo.insert("expenses", expense(10, date(2025, 1, 1))).unwrap();

        let records = repo.fetch_records("expenses", &RecordFilter::new()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].occurred_on, date(2025, 1, 1));

        let reopened = RecordRepository::new(temp_dir.path().join("data"));
        assert_eq!(reopened.count("expenses").unwrap(), 2);
        assert_eq!(reopened.count("invoices").unwrap(), 0);
    }

    #[test]
    fn test_filter_by_user_window_status_and_kind() {
        let (_temp_dir, repo) = setup();
        let mine = expense(10, date(2025, 1, 15)).with_user("u1");
        let theirs = expense(20, date(2025, 1, 15)).with_user("u2");
        let invoice = MonetaryRecord::new(Money::from_units(500), date(2025, 1, 20), RecordKind::Income)
            .with_user("u1")
            .with_status(RecordStatus::Paid);
        let late = expense(40, date(2025, 2, 1)).with_user("u1");
        repo.insert_many(DEFAULT_TABLE, vec![mine, theirs, invoice, late]).unwrap();

        let january = PeriodWindow::new(date(2025, 1, 1), date(2025, 1, 31)).unwrap();
        let filter = RecordFilter::new().for_user("u1").within(january);
        assert_eq!(repo.fetch_records(DEFAULT_TABLE, &filter).unwrap().len(), 2);

        let paid = filter.clone().with_status(RecordStatus::Paid);
        assert_eq!(repo.fetch_records(DEFAULT_TABLE, &paid).unwrap().len(), 1);

        let expenses = filter.with_kind(RecordKind::Expense);
        let found = repo.fetch_records(DEFAULT_TABLE, &expenses).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].amount, Money::from_units(10));
    }

    #[test]
    fn test_update_and_delete() {
        let (_temp_dir, repo) = setup();
        let id = repo.insert(DEFAULT_TABLE, expense(10, date(2025, 1, 1))).unwrap();

        let mut record = repo.find(DEFAULT_TABLE, &id.to_string()).unwrap().unwrap();
        record.amount = Money::from_units(15);
        repo.update(DEFAULT_TABLE, record).unwrap();

        let removed = repo.delete(DEFAULT_TABLE, id).unwrap();
        assert_eq!(removed.amount, Money::from_units(15));
        assert!(repo.delete(DEFAULT_TABLE, id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_failed_write_leaves_cached_table_unchanged() {
        let (temp_dir, repo) = setup();
        let id = repo.insert("expenses", expense(10, date(2025, 1, 1))).unwrap();

        // A directory in place of the table file makes the atomic rename fail
        let table_file = temp_dir.path().join("data").join("expenses.json");
        std::fs::remove_file(&table_file).unwrap();
        std::fs::create_dir(&table_file).unwrap();
        std::fs::write(table_file.join("keep"), "x").unwrap();

        assert!(repo.insert("expenses", expense(20, date(2025, 1, 2))).is_err());
        assert!(repo.delete("expenses", id).is_err());

        let records = repo.fetch_records("expenses", &RecordFilter::new()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
    }

    #[test]
    fn test_update_unknown_record_is_not_found() {
        let (_temp_dir, repo) = setup();
        let err = repo
            .update(DEFAULT_TABLE, expense(1, date(2025, 1, 1)))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        let (_temp_dir, repo) = setup();
        assert!(repo
            .insert("../escape", expense(1, date(2025, 1, 1)))
            .unwrap_err()
            .is_validation());

        let negative = MonetaryRecord::new(Money::from_cents(-5), date(2025, 1, 1), RecordKind::Debit);
        assert!(repo.insert(DEFAULT_TABLE, negative).unwrap_err().is_validation());
    }
}
