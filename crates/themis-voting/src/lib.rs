//! # themis-voting — Commit-Reveal Panel Arbitration
//!
//! The panel side of the Themis engine: a set of registered arbiters rules
//! on claims through hidden commitments and timed reveals, and the tallied
//! outcome flows into the stake state machine through the same designated
//! arbiter path a single human arbiter would use.
//!
//! - **Error** ([`error`]): Structured error hierarchy for voting
//!   operations, wrapping stake errors on forwarding.
//!
//! - **Registry** ([`registry`]): The injected [`ArbiterRegistry`]
//!   capability answering who may vote.
//!
//! - **Commit** ([`commit`]): [`CommitDigest`] computation and the
//!   per-arbiter [`CommitRecord`].
//!
//! - **Engine** ([`engine`]): [`VotingEngine`] — lazily opened per-claim
//!   polls, commit and reveal windows, and majority tallying.

pub mod commit;
pub mod engine;
pub mod error;
pub mod registry;

// Re-export primary types for ergonomic imports.

pub use commit::{commit_digest, CommitDigest, CommitRecord};
pub use engine::{VotingEngine, VotingEvent};
pub use error::VotingError;
pub use registry::{ArbiterRegistry, InMemoryArbiterRegistry};
