//! Budgets, savings goals and clients
//!
//! These are the non-ledger records the dashboard tracks progress against.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{BudgetId, ClientId, GoalId};
use super::money::Money;

/// Anything persisted in a `storage::Collection`
pub trait Identified {
    type Id: Copy + Eq + std::fmt::Display;

    fn id(&self) -> Self::Id;

    /// Check whether a user-supplied reference (short ID or name) names this entity
    fn matches_ref(&self, reference: &str) -> bool;
}

/// A spending allowance for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,
    pub name: String,
    /// Expense category whose spending counts against this budget
    pub category: String,
    pub allocated: Money,
    pub created_at: DateTime<Utc>,
}

impl Budget {
    pub fn new(name: impl Into<String>, category: impl Into<String>, allocated: Money) -> Self {
        Self {
            id: BudgetId::new(),
            name: name.into(),
            category: category.into(),
            allocated,
            created_at: Utc::now(),
        }
    }
}

impl Identified for Budget {
    type Id = BudgetId;

    fn id(&self) -> BudgetId {
        self.id
    }

    fn matches_ref(&self, reference: &str) -> bool {
        self.id.matches(reference) || self.name.eq_ignore_ascii_case(reference)
    }
}

/// A savings target with an optional deadline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: GoalId,
    pub name: String,
    pub target_amount: Money,
    pub current_amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl SavingsGoal {
    pub fn new(name: impl Into<String>, target_amount: Money) -> Self {
        Self {
            id: GoalId::new(),
            name: name.into(),
            target_amount,
            current_amount: Money::zero(),
            target_date: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_current(mut self, current_amount: Money) -> Self {
        self.current_amount = current_amount;
        self
    }

    pub fn with_target_date(mut self, target_date: NaiveDate) -> Self {
        self.target_date = Some(target_date);
        self
    }

    /// Record an extra contribution; the saved amount may exceed the target
    pub fn contribute(&mut self, amount: Money) {
        self.current_amount += amount;
    }
}

impl Identified for SavingsGoal {
    type Id = GoalId;

    fn id(&self) -> GoalId {
        self.id
    }

    fn matches_ref(&self, reference: &str) -> bool {
        self.id.matches(reference) || self.name.eq_ignore_ascii_case(reference)
    }
}

/// A customer, used for retention metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    /// The day the client was first onboarded
    pub created_on: NaiveDate,
}

impl Client {
    pub fn new(name: impl Into<String>, created_on: NaiveDate) -> Self {
        Self {
            id: ClientId::new(),
            name: name.into(),
            created_on,
        }
    }
}

impl Identified for Client {
    type Id = ClientId;

    fn id(&self) -> ClientId {
        self.id
    }

    fn matches_ref(&self, reference: &str) -> bool {
        self.id.matches(reference) || self.name.eq_ignore_ascii_case(reference)
    }
}
