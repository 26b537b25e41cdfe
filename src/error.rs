//! Errors returned by the ledger mutators.
//!
//! - [`Validation`] bad or missing input (empty name, non-positive amount, ...).
//! - [`UnknownParticipant`] a mutator referenced a participant that is not in
//!   the ledger.
//! - [`NotFound`] a removal targeted an id the ledger does not hold.
//!
//! A failed mutation never changes the ledger.
//!
//!  [`Validation`]: LedgerError::Validation
//!  [`UnknownParticipant`]: LedgerError::UnknownParticipant
//!  [`NotFound`]: LedgerError::NotFound
use crate::schemas::ParticipantId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Unknown participant: {0}")]
    UnknownParticipant(ParticipantId),
    #[error("\"{0}\" not found!")]
    NotFound(String),
}
