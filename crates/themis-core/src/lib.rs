//! # themis-core — Foundational Types
//!
//! Domain primitives shared by every crate in the Themis workspace:
//!
//! - **Error** ([`error`]): Structured validation errors for constructor
//!   failures.
//!
//! - **Identity** ([`identity`]): Validated [`Address`] newtype and the
//!   [`StakeId`] handle that names a stake account across crate boundaries.
//!
//! - **Token** ([`token`]): [`TokenAmount`] — fungible-token quantities with
//!   checked arithmetic. Balances are never floats.
//!
//! - **Time** ([`time`]): [`Timestamp`] wrapper over `chrono::DateTime<Utc>`.
//!   Engine operations take ledger time as an explicit argument rather than
//!   reading the wall clock, so timing behaviour is exactly reproducible.
//!
//! - **Keying** ([`keying`]): The pure [`claim_key`] function deriving a
//!   [`ClaimKey`] from a stake handle and a local claim number, so the voting
//!   engine can reference claims across many stake accounts uniformly.

pub mod error;
pub mod identity;
pub mod keying;
pub mod time;
pub mod token;

// Re-export primary types for ergonomic imports.

pub use error::ValidationError;
pub use identity::{Address, StakeId};
pub use keying::{claim_key, ClaimKey};
pub use time::Timestamp;
pub use token::TokenAmount;
