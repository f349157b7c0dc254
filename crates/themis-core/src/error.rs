//! # Validation Error Types
//!
//! Structured errors for constructor-time validation in `themis-core`.
//! Uses `thiserror` for ergonomic error definitions with diagnostic context.

use thiserror::Error;

/// Errors from validating domain primitives at construction time.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Address is not `0x` followed by 40 hex characters.
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),

    /// Hex string does not decode into a 32-byte digest.
    #[error("invalid digest: {0:?}")]
    InvalidDigest(String),

    /// Amount string is not a valid unsigned decimal integer.
    #[error("invalid token amount: {0:?}")]
    InvalidAmount(String),
}
