//! Monetary record display formatting

use super::report::truncate;
use crate::models::{MonetaryRecord, RecordKind};

/// One register row: id, date, kind, signed amount, category, status, description
pub fn format_record_row(record: &MonetaryRecord) -> String {
    let sign = match record.kind {
        RecordKind::Debit | RecordKind::Expense | RecordKind::TaxLiability => "-",
        RecordKind::Credit | RecordKind::Income => "+",
    };

    format!(
        "{:12} {} {:13} {:>14} {:16} {:9} {}",
        record.id.short(),
        record.occurred_on.format("%Y-%m-%d"),
        record.kind.as_str(),
        format!("{}{}", sign, record.amount),
        truncate(record.category.as_deref().unwrap_or("-"), 16),
        record.status.map(|s| s.to_string()).unwrap_or_default(),
        truncate(&record.description, 30)
    )
}

/// Format records as a register
pub fn format_record_list(records: &[MonetaryRecord]) -> String {
    if records.is_empty() {
        return "No records found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:12} {:10} {:13} {:>14} {:16} {:9} {}\n",
        "ID", "Date", "Kind", "Amount", "Category", "Status", "Description"
    ));
    output.push_str(&"-".repeat(100));
    output.push('\n');

    for record in records {
        output.push_str(&format_record_row(record));
        output.push('\n');
    }

    output.push_str(&format!("\n{} record(s)\n", records.len()));
    output
}
