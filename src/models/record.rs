//! Monetary record model
//!
//! A dated amount fetched from the record store: an invoice, an expense, a
//! bank movement or a tax payment. The engine only ever reads these.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::RecordId;
use super::money::Money;

/// What a record represents in the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Money into an account
    Credit,
    /// Money out of an account
    Debit,
    /// Earned income (usually an invoice)
    Income,
    /// A business expense
    Expense,
    /// Tax already paid or assessed
    TaxLiability,
}

impl RecordKind {
    /// Money-in side of the ledger
    pub fn is_inflow(&self) -> bool {
        matches!(self, Self::Credit | Self::Income)
    }

    /// Money-out side of the ledger (tax payments are tracked separately)
    pub fn is_outflow(&self) -> bool {
        matches!(self, Self::Debit | Self::Expense)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
            Self::Income => "income",
            Self::Expense => "expense",
            Self::TaxLiability => "tax_liability",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "credit" => Ok(Self::Credit),
            "debit" => Ok(Self::Debit),
            "income" | "invoice" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "tax_liability" | "tax" => Ok(Self::TaxLiability),
            other => Err(format!("Unknown record kind: {}", other)),
        }
    }
}

/// Lifecycle status of a record (mostly meaningful for invoices)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Draft,
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl RecordStatus {
    /// Issued but not yet collected
    pub fn is_outstanding(&self) -> bool {
        matches!(self, Self::Pending | Self::Overdue)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "pending" | "sent" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "overdue" => Ok(Self::Overdue),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            other => Err(format!("Unknown record status: {}", other)),
        }
    }
}

/// A dated monetary record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonetaryRecord {
    pub id: RecordId,

    /// Always stored as a magnitude; `kind` carries the direction
    pub amount: Money,

    pub occurred_on: NaiveDate,

    pub kind: RecordKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RecordStatus>,

    /// Owner of the record in a multi-user store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Client an invoice was issued to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(default)]
    pub description: String,
}

impl MonetaryRecord {
    pub fn new(amount: Money, occurred_on: NaiveDate, kind: RecordKind) -> Self {
        Self {
            id: RecordId::new(),
            amount,
            occurred_on,
            kind,
            category: None,
            status: None,
            user_id: None,
            client_id: None,
            description: String::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Income that has actually been collected: paid, or carrying no status at all
    pub fn is_realized_income(&self) -> bool {
        self.kind.is_inflow() && matches!(self.status, None | Some(RecordStatus::Paid))
    }

    /// Spending that counts toward totals (cancelled and draft entries do not)
    pub fn is_effective_expense(&self) -> bool {
        self.kind.is_outflow()
            && !matches!(
                self.status,
                Some(RecordStatus::Cancelled) | Some(RecordStatus::Draft)
            )
    }

    /// Income issued but not yet collected
    pub fn is_receivable(&self) -> bool {
        self.kind.is_inflow() && self.status.map(|s| s.is_outstanding()).unwrap_or(false)
    }

    /// Validate the record
    pub fn validate(&self) -> Result<(), String> {
        if self.amount.is_negative() {
            return Err(format!(
                "Amount must be a positive magnitude, got {} (use the kind for direction)",
                self.amount
            ));
        }
        if let Some(category) = &self.category {
            if category.trim().is_empty() {
                return Err("Category cannot be blank".into());
            }
        }
        Ok(())
    }
}

impl fmt::Display for MonetaryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.occurred_on.format("%Y-%m-%d"),
            self.kind,
            self.amount,
            self.category.as_deref().unwrap_or("-")
        )
    }
}
