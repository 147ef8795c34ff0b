//! CSV export functionality
//!
//! Reports hand over already-computed rows; nothing here recomputes.

use std::io::Write;

use crate::error::{LedgerLensError, LedgerLensResult};
use crate::models::MonetaryRecord;

fn export_error(e: csv::Error) -> LedgerLensError {
    LedgerLensError::Export(e.to_string())
}

/// Write a header row followed by data rows
pub fn write_rows<W, I, R>(writer: W, header: &[&str], rows: I) -> LedgerLensResult<()>
where
    W: Write,
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(header).map_err(export_error)?;
    for row in rows {
        csv_writer.write_record(row).map_err(export_error)?;
    }
    csv_writer
        .flush()
        .map_err(|e| LedgerLensError::Export(e.to_string()))?;
    Ok(())
}

/// Percent or ratio column value
pub fn decimal(value: f64) -> String {
    format!("{:.2}", value)
}

/// Export records in the layout `ColumnMapping::ledger_export` reads back
pub fn export_records_csv<W: Write>(records: &[MonetaryRecord], writer: W) -> LedgerLensResult<()> {
    write_rows(
        writer,
        &["date", "kind", "amount", "category", "status", "description"],
        records.iter().map(|r| {
            [
                r.occurred_on.format("%Y-%m-%d").to_string(),
                r.kind.to_string(),
                r.amount.to_string(),
                r.category.clone().unwrap_or_default(),
                r.status.map(|s| s.to_string()).unwrap_or_default(),
                r.description.clone(),
            ]
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, RecordKind, RecordStatus};
    use crate::services::import::{parse_reader, ColumnMapping};
    use chrono::NaiveDate;

    #[test]
    fn test_write_rows_quotes_fields() {
        let mut out = Vec::new();
        write_rows(&mut out, &["name", "amount"], vec![vec!["Rent, office", "100.00"]]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "name,amount\n\"Rent, office\",100.00\n");
    }

    #[test]
    fn test_exported_records_read_back() {
        let records = vec![MonetaryRecord::new(
            Money::from_cents(123_456),
            NaiveDate::from_ymd_opt(2025, 4, 2).unwrap(),
            RecordKind::Income,
        )
        .with_category("Consulting")
        .with_status(RecordStatus::Pending)
        .with_description("April, part 1")];

        let mut out = Vec::new();
        export_records_csv(&records, &mut out).unwrap();

        let parsed = parse_reader(out.as_slice(), &ColumnMapping::ledger_export()).unwrap();
        assert_eq!(parsed.records.len(), 1);
        let back = &parsed.records[0];
        assert_eq!(back.amount, records[0].amount);
        assert_eq!(back.kind, RecordKind::Income);
        assert_eq!(back.status, Some(RecordStatus::Pending));
        assert_eq!(back.description, "April, part 1");
    }
}
