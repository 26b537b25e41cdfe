use crate::balance::{compute_balances, Balances};
use crate::error::LedgerError;
use crate::schemas::{Expense, ExpenseId, Money, NewExpense, Participant, ParticipantId};
use crate::settlement::{compute_settlements, ParticipantNames, Settlement};
use chrono::Utc;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::collections::HashSet;

/// Upper bound on the sum of every expense in a ledger. Any balance or
/// running total stays below it, far from the range `Money` can represent.
pub const MAX_LEDGER_TOTAL: Money = dec!(1000000000000000000);

/// Participants and the expenses shared between them.
///
/// Every stored expense only references participants present in the ledger.
/// Removing a participant drops the expenses that mention them.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    participants: Vec<Participant>,
    expenses: Vec<Expense>,
}

/// What [`Ledger::remove_participant`] took out of the ledger.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RemovedParticipant {
    pub participant: Participant,
    pub expenses: Vec<Expense>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    pub fn participant_ids(&self) -> Vec<ParticipantId> {
        self.participants.iter().map(|p| p.id).collect()
    }

    pub fn find_participant_name(&self, id: ParticipantId) -> Option<&str> {
        self.participant(id).map(|p| p.name.as_str())
    }

    pub fn add_participant(&mut self, name: &str) -> Result<&Participant, LedgerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation(
                "participant name cannot be empty".to_string(),
            ));
        }

        let id = ParticipantId::new();
        self.participants.push(Participant {
            id,
            name: name.to_string(),
        });
        tracing::debug!(%id, %name, "participant added");
        self.participants
            .last()
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))
    }

    pub fn remove_participant(
        &mut self,
        id: ParticipantId,
    ) -> Result<RemovedParticipant, LedgerError> {
        let index = self
            .participants
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;
        let participant = self.participants.remove(index);

        let (expenses, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.expenses)
            .into_iter()
            .partition(|expense| expense.involves(id));
        self.expenses = kept;

        tracing::debug!(
            %id,
            cascaded = expenses.len(),
            "participant removed"
        );
        Ok(RemovedParticipant {
            participant,
            expenses,
        })
    }

    pub fn add_expense(&mut self, expense: NewExpense) -> Result<&Expense, LedgerError> {
        let description = expense.description.trim();
        if description.is_empty() {
            return Err(LedgerError::Validation(
                "expense description cannot be empty".to_string(),
            ));
        }
        if expense.amount <= Money::ZERO {
            return Err(LedgerError::Validation(format!(
                "expense amount must be positive, got {}",
                expense.amount
            )));
        }
        let within_limit = self
            .total_expenses()
            .checked_add(expense.amount)
            .is_some_and(|total| total <= MAX_LEDGER_TOTAL);
        if !within_limit {
            return Err(LedgerError::Validation(format!(
                "expense amount {} would push the ledger total above {MAX_LEDGER_TOTAL}",
                expense.amount
            )));
        }
        if expense.split_between.is_empty() {
            return Err(LedgerError::Validation(
                "expense must be split between at least one participant".to_string(),
            ));
        }
        let mut seen = HashSet::with_capacity(expense.split_between.len());
        if let Some(duplicate) = expense.split_between.iter().find(|id| !seen.insert(**id)) {
            return Err(LedgerError::Validation(format!(
                "participant {duplicate} appears twice in the split"
            )));
        }
        if let Some(unknown) = std::iter::once(&expense.paid_by)
            .chain(&expense.split_between)
            .find(|id| self.participant(**id).is_none())
        {
            return Err(LedgerError::UnknownParticipant(*unknown));
        }

        let id = ExpenseId::new();
        let expense = Expense {
            id,
            description: description.to_string(),
            amount: expense.amount,
            paid_by: expense.paid_by,
            split_between: expense.split_between,
            timestamp: Utc::now(),
        };
        let (amount, paid_by) = (expense.amount, expense.paid_by);
        self.expenses.push(expense);
        tracing::debug!(%id, %amount, %paid_by, "expense added");
        self.expenses
            .last()
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))
    }

    pub fn remove_expense(&mut self, id: ExpenseId) -> Result<Expense, LedgerError> {
        let index = self
            .expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;
        let expense = self.expenses.remove(index);
        tracing::debug!(%id, "expense removed");
        Ok(expense)
    }

    /// Sum of every expense amount. Never above [`MAX_LEDGER_TOTAL`].
    pub fn total_expenses(&self) -> Money {
        self.expenses.iter().map(|e| e.amount).sum()
    }

    pub fn balances(&self) -> Balances {
        compute_balances(&self.participants, &self.expenses)
    }

    pub fn settlements(&self) -> Vec<Settlement> {
        compute_settlements(&self.balances(), self)
    }
}

impl ParticipantNames for Ledger {
    fn participant_name(&self, id: ParticipantId) -> Option<&str> {
        self.find_participant_name(id)
    }
}
