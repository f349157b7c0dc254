//! # Claim Keying
//!
//! Derives a globally unique [`ClaimKey`] from a stake-account handle and a
//! local claim number. The voting engine keys its polls by `ClaimKey`, so it
//! can arbitrate claims from many stake accounts without knowing anything
//! about any account's internal storage.
//!
//! ## Security Invariant
//!
//! The keying function is pure and collision-resistant: SHA-256 over a
//! domain-separation tag, the handle's UUID bytes, and the claim number in
//! big-endian form. Two distinct (handle, number) pairs never share a key.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::ValidationError;
use crate::identity::StakeId;

/// Domain-separation tag for claim keys.
const CLAIM_KEY_DOMAIN: &[u8] = b"themis.claim-key.v1";

/// A 32-byte key identifying one claim across all stake accounts.
///
/// Serializes as its hex string so it can key JSON maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClaimKey([u8; 32]);

impl ClaimKey {
    /// Wrap raw digest bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Access the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering (64 characters).
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse a 64-character hex string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDigest`] if the string is not
    /// exactly 64 hex characters.
    pub fn from_hex(s: &str) -> Result<Self, ValidationError> {
        if s.len() != 64 {
            return Err(ValidationError::InvalidDigest(s.to_string()));
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
            let hex_pair =
                std::str::from_utf8(chunk).map_err(|_| ValidationError::InvalidDigest(s.to_string()))?;
            bytes[i] = u8::from_str_radix(hex_pair, 16)
                .map_err(|_| ValidationError::InvalidDigest(s.to_string()))?;
        }
        Ok(Self(bytes))
    }
}

impl std::fmt::Display for ClaimKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for ClaimKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ClaimKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ClaimKey::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Derive the claim key for claim `claim_number` of the account `stake`.
pub fn claim_key(stake: &StakeId, claim_number: u64) -> ClaimKey {
    let mut hasher = Sha256::new();
    hasher.update(CLAIM_KEY_DOMAIN);
    hasher.update(stake.as_uuid().as_bytes());
    hasher.update(claim_number.to_be_bytes());
    ClaimKey(hasher.finalize().into())
}
