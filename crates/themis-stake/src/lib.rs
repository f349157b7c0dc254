//! # themis-stake — Stake Accounts & Claim Arbitration
//!
//! The escrow side of the Themis engine:
//!
//! - **Error** ([`error`]): Structured error hierarchy for stake operations.
//!
//! - **Claim** ([`claim`]): The three-state claim lifecycle
//!   (`Open → SettlementFailed → Ruled`) and the [`Ruling`] outcome type.
//!
//! - **Account** ([`account`]): [`StakeAccount`] — collateral, the
//!   append-only claim registry, and the withdrawal lockup timer that
//!   freezes while any claim is unresolved.
//!
//! - **Gateway** ([`gateway`]): The injected [`TokenGateway`] capability
//!   through which every balance movement flows, plus an in-memory
//!   reference ledger.
//!
//! - **Events** ([`events`]): Typed notifications emitted by successful
//!   operations, drained by the host.

pub mod account;
pub mod claim;
pub mod error;
pub mod events;
pub mod gateway;

// Re-export primary types for ergonomic imports.

pub use account::{StakeAccount, StakeConfig};
pub use claim::{Claim, ClaimState, Ruling};
pub use error::StakeError;
pub use events::StakeEvent;
pub use gateway::{InMemoryTokenLedger, TokenGateway};
