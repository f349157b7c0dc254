//! # Vote Commitments
//!
//! An arbiter first publishes a [`CommitDigest`] — a hash of its choice and
//! a private salt, computed off-protocol with [`commit_digest`] — and later
//! reveals the underlying pair. Before reveal the digest discloses nothing
//! and may be overwritten freely; after reveal the record is frozen.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use themis_stake::Ruling;

/// Domain-separation tag for vote commitments.
const COMMIT_DOMAIN: &[u8] = b"themis.vote-commit.v1";

/// A 32-byte vote commitment digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommitDigest([u8; 32]);

impl CommitDigest {
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
}

impl std::fmt::Display for CommitDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Compute the commitment digest for `choice` under `salt`.
///
/// Arbiters run this off-protocol before committing; the engine runs it
/// again at reveal time to check the match.
pub fn commit_digest(choice: Ruling, salt: &[u8]) -> CommitDigest {
    let mut hasher = Sha256::new();
    hasher.update(COMMIT_DOMAIN);
    hasher.update([match choice {
        Ruling::Accepted => 1u8,
        Ruling::Rejected => 2u8,
    }]);
    hasher.update(salt);
    CommitDigest(hasher.finalize().into())
}

/// One arbiter's commitment for one claim.
///
/// May be overwritten any number of times before reveal, never after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// The committed digest.
    pub secret_hash: CommitDigest,
    /// Whether the arbiter has revealed.
    pub revealed: bool,
    /// The revealed choice, once revealed.
    pub choice: Option<Ruling>,
    /// The revealed salt, once revealed.
    pub salt: Option<Vec<u8>>,
}

impl CommitRecord {
    /// A fresh, unrevealed record for `secret_hash`.
    pub fn new(secret_hash: CommitDigest) -> Self {
        Self {
            secret_hash,
            revealed: false,
            choice: None,
            salt: None,
        }
    }
}
