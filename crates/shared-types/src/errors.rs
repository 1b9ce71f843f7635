//! # Error Types
//!
//! Invariant violations detected on a decoded lottery document.

use thiserror::Error;

use crate::entities::DrawNumber;

/// Ways a `LotteryState` can break the data model invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// `drawnNumbers` and `participants` have different lengths.
    #[error("drawn numbers ({drawn}) and participants ({participants}) out of sync")]
    LengthMismatch { drawn: usize, participants: usize },

    /// A number was issued twice within one epoch.
    #[error("number {0} drawn more than once")]
    DuplicateNumber(DrawNumber),

    /// A number lies outside `1..=totalNumbers`.
    #[error("number {number} outside 1..={total}")]
    OutOfRange { number: DrawNumber, total: u32 },

    /// Participant record does not match the drawn number at the same position.
    #[error("participant {index} holds {participant} but drawn list holds {drawn}")]
    OrderMismatch {
        index: usize,
        participant: DrawNumber,
        drawn: DrawNumber,
    },
}
