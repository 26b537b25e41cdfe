//! Shared-expense ledger: participants, expenses split between them, the net
//! balance of everyone and the transfers that settle those balances.
pub mod balance;
pub mod error;
pub mod ledger;
pub mod schemas;
pub mod server;
pub mod settings;
pub mod settlement;

pub use balance::{compute_balances, Balances, PersonalBalance};
pub use error::LedgerError;
pub use ledger::{Ledger, RemovedParticipant, MAX_LEDGER_TOTAL};
pub use schemas::{Expense, ExpenseId, Money, NewExpense, Participant, ParticipantId};
pub use settlement::{
    compute_settlements, ParticipantNames, Settlement, SettlementParty, SETTLEMENT_TOLERANCE,
};
