//! # Token Amounts
//!
//! [`TokenAmount`] is the only representation of fungible-token quantities
//! in the engine. Backed by `u128` in the token's smallest unit; arithmetic
//! is checked so balances can neither overflow nor go negative silently.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A quantity of fungible tokens, in the token's smallest unit.
///
/// # Security Invariant
///
/// Amounts must never be represented as floating-point numbers, and all
/// arithmetic on balances goes through the checked operations below.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct TokenAmount(u128);

impl TokenAmount {
    /// The zero amount.
    pub const ZERO: TokenAmount = TokenAmount(0);

    /// Create an amount from a raw value in the token's smallest unit.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Parse an amount from a decimal string, as supplied in configuration
    /// or over the wire.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAmount`] unless the string is an
    /// unsigned decimal integer that fits in `u128`.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        s.parse::<u128>()
            .map(Self)
            .map_err(|_| ValidationError::InvalidAmount(s.to_string()))
    }

    /// Access the raw value.
    pub const fn value(&self) -> u128 {
        self.0
    }

    /// Whether the amount is zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition. `None` on overflow.
    pub fn checked_add(self, other: TokenAmount) -> Option<TokenAmount> {
        self.0.checked_add(other.0).map(TokenAmount)
    }

    /// Checked subtraction. `None` if `other` exceeds `self`.
    pub fn checked_sub(self, other: TokenAmount) -> Option<TokenAmount> {
        self.0.checked_sub(other.0).map(TokenAmount)
    }

    /// Saturating addition, for restoring a previously reserved amount.
    pub fn saturating_add(self, other: TokenAmount) -> TokenAmount {
        TokenAmount(self.0.saturating_add(other.0))
    }
}

impl From<u128> for TokenAmount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
