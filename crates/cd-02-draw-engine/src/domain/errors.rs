//! # Domain Errors
//!
//! Error taxonomy of the draw workflow.
//!
//! Version conflicts never appear here: they are an internal attempt outcome
//! absorbed by the retry loop and only surface as `MaxRetriesExceeded`.

use thiserror::Error;

/// Errors returned by the Draw Engine, Configuration Manager and Reset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    /// Bad input. Always correctable by the caller.
    #[error("{0}")]
    Validation(String),

    /// Configuration changes are refused once the first draw happened.
    #[error("Configuration is locked because drawing has started")]
    Locked,

    /// Every number in the pool has been issued.
    #[error("All {total} numbers have been drawn")]
    LotteryFull { total: u32 },

    /// Every attempt lost to a concurrent commit.
    #[error("Too many concurrent draws, gave up after {attempts} attempts")]
    MaxRetriesExceeded { attempts: u32 },

    /// The document store failed and the retry budget is spent.
    #[error("Failed to save lottery state: {0}")]
    StoreUnavailable(String),

    /// Reset password mismatch.
    #[error("Incorrect password")]
    Auth,

    /// Unexpected failure inside the engine.
    #[error("Draw failed: {0}")]
    Internal(String),
}

impl DrawError {
    /// Stable machine-readable code sent to clients.
    pub fn code(&self) -> &'static str {
        match self {
            DrawError::Validation(_) => "VALIDATION_ERROR",
            DrawError::Locked => "CONFIG_LOCKED",
            DrawError::LotteryFull { .. } => "LOTTERY_FULL",
            DrawError::MaxRetriesExceeded { .. } => "MAX_RETRIES_EXCEEDED",
            DrawError::StoreUnavailable(_) => "SAVE_FAILED",
            DrawError::Auth => "AUTH_FAILED",
            DrawError::Internal(_) => "DRAW_FAILED",
        }
    }

    /// Business-rule rejections the caller should not simply retry.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            DrawError::Validation(_) | DrawError::Locked | DrawError::LotteryFull { .. }
        )
    }
}
