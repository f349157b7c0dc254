//! # Identity Newtypes
//!
//! Domain-primitive newtypes for the actors and accounts in the engine.
//! Each identifier is a distinct type — you cannot pass a [`StakeId`]
//! where an [`Address`] is expected.
//!
//! ## Validation
//!
//! [`Address`] validates its format at construction time. [`StakeId`] is a
//! UUID and always valid by construction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// A ledger address: `0x` followed by exactly 40 hexadecimal characters.
///
/// Addresses identify every external actor the engine deals with — stakers,
/// claimants, arbiters, token contracts, and the voting engine itself.
/// Stored lowercased so that equality and hashing are case-insensitive.
///
/// # Validation
///
/// - Must start with `0x`
/// - Exactly 40 hex digits after the prefix
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Address(String);

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Route through `new()` so invalid values are rejected at
        // deserialization time, not silently accepted.
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl Address {
    /// Create an address from a string, validating format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAddress`] if the string is not
    /// `0x` + 40 hex characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let lower = raw.to_lowercase();
        let Some(body) = lower.strip_prefix("0x") else {
            return Err(ValidationError::InvalidAddress(raw));
        };
        if body.len() != 40 || !body.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::InvalidAddress(raw));
        }
        Ok(Self(lower))
    }

    /// Access the address string (lowercase, `0x`-prefixed).
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unique handle for a stake account.
///
/// Opaque to everything except the keying function: the voting engine never
/// looks inside a `StakeId`, it only feeds it to [`claim_key`](crate::claim_key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StakeId(Uuid);

impl StakeId {
    /// Create a new random stake handle.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a stake handle from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for StakeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StakeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stake:{}", self.0)
    }
}
