//! # Stake Error Types
//!
//! Structured errors for the stake subsystem. Every error aborts the
//! operation that raised it with no partial mutation — a caller retrying
//! against unchanged state fails identically.

use thiserror::Error;

/// Errors from stake-account operations.
#[derive(Error, Debug)]
pub enum StakeError {
    /// The caller lacks the role required for the operation.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The operation is invalid for the current claim or account state,
    /// including attempts to rule an already-ruled claim.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The referenced claim does not exist in this account.
    #[error("unknown claim {0}")]
    InvalidClaim(u64),

    /// The token gateway rejected a transfer; nothing was applied.
    #[error("token transfer failed: {0}")]
    TransferFailed(String),

    /// The lockup window has not elapsed yet.
    #[error("lockup window still open: {0} seconds remaining")]
    WindowOpen(i64),
}
