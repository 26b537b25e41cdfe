use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub type Money = Decimal;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ParticipantId(Uuid);

impl ParticipantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ExpenseId(Uuid);

impl ExpenseId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExpenseId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    pub amount: Money,
    pub paid_by: ParticipantId,
    pub split_between: Vec<ParticipantId>,
    pub timestamp: DateTime<Utc>,
}

impl Expense {
    /// Whether `participant` pays or owes a share of this expense.
    pub fn involves(&self, participant: ParticipantId) -> bool {
        self.paid_by == participant || self.split_between.contains(&participant)
    }
}

/// Input of [`Ledger::add_expense`](crate::ledger::Ledger::add_expense).
/// Id and timestamp are assigned by the ledger.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct NewExpense {
    pub description: String,
    pub amount: Money,
    pub paid_by: ParticipantId,
    pub split_between: Vec<ParticipantId>,
}
