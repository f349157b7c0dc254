//! # Claim Lifecycle
//!
//! A claim moves through a three-state machine:
//!
//! ```text
//! Open ──settlement_failed()──▶ SettlementFailed ──rule_on_claim()──▶ Ruled
//! ```
//!
//! `Open` claims await off-protocol settlement; either party declaring
//! settlement failed makes the claim eligible for a ruling; `Ruled` is
//! terminal and the claim is immutable from then on. A claim abandoned in
//! `Open` simply stays there.
//!
//! The transitions themselves live on
//! [`StakeAccount`](crate::account::StakeAccount), because every transition
//! also moves account-level bookkeeping (`claimable_stake`, the open-claims
//! count, the lockup timer). This module holds the data and the state
//! predicates.

use serde::{Deserialize, Serialize};

use themis_core::{Address, Timestamp, TokenAmount};

/// The lifecycle state of a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimState {
    /// Claim is open, awaiting off-protocol settlement.
    Open,
    /// A party declared settlement failed; the claim is eligible for ruling.
    SettlementFailed,
    /// An arbiter ruled on the claim. Terminal state.
    Ruled,
}

impl ClaimState {
    /// The canonical string name of this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::SettlementFailed => "SETTLEMENT_FAILED",
            Self::Ruled => "RULED",
        }
    }

    /// Whether this state is terminal (no further transitions allowed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ruled)
    }

    /// Valid target states from this state.
    pub fn valid_transitions(&self) -> &'static [ClaimState] {
        match self {
            Self::Open => &[Self::SettlementFailed],
            Self::SettlementFailed => &[Self::Ruled],
            Self::Ruled => &[],
        }
    }
}

impl std::fmt::Display for ClaimState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An arbitration ruling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ruling {
    /// The claim is justified; the reserved amount is forfeited toward the
    /// claimant.
    Accepted,
    /// The claim is unjustified; the reserved amount returns to the stake.
    Rejected,
}

impl Ruling {
    /// The canonical string name of this ruling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for Ruling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A claim against a stake account.
///
/// Owned exclusively by its [`StakeAccount`](crate::account::StakeAccount);
/// the id is the claim's position in the account's append-only claim
/// sequence (monotonic, unique, immutable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Sequence-assigned identifier, local to the owning account.
    pub id: u64,
    /// The claimant who opened the claim.
    pub claimant: Address,
    /// Amount reserved from the stake while the claim is unresolved.
    pub amount: TokenAmount,
    /// Arbitration fee escrowed from the claimant at open time.
    pub fee: TokenAmount,
    /// Opaque claim data (evidence reference, agreement hash, free text).
    pub data: String,
    /// Current lifecycle state.
    pub state: ClaimState,
    /// The ruling, once the claim is ruled.
    pub ruling: Option<Ruling>,
    /// When the claim was opened (ledger time).
    pub opened_at: Timestamp,
}

impl Claim {
    /// Whether this claim still counts toward the account's open-claims
    /// bookkeeping (any non-terminal state).
    pub fn is_unresolved(&self) -> bool {
        !self.state.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_claim(state: ClaimState) -> Claim {
        Claim {
            id: 0,
            claimant: Address::new("0x1111111111111111111111111111111111111111").unwrap(),
            amount: TokenAmount::new(10),
            fee: TokenAmount::new(1),
            data: String::new(),
            state,
            ruling: None,
            opened_at: Timestamp::now(),
        }
    }

    #[test]
    fn state_as_str_all_variants() {
        assert_eq!(ClaimState::Open.as_str(), "OPEN");
        assert_eq!(ClaimState::SettlementFailed.as_str(), "SETTLEMENT_FAILED");
        assert_eq!(ClaimState::Ruled.as_str(), "RULED");
    }

    #[test]
    fn state_is_terminal_all_variants() {
        assert!(!ClaimState::Open.is_terminal());
        assert!(!ClaimState::SettlementFailed.is_terminal());
        assert!(ClaimState::Ruled.is_terminal());
    }

    #[test]
    fn state_valid_transitions() {
        assert_eq!(
            ClaimState::Open.valid_transitions(),
            &[ClaimState::SettlementFailed]
        );
        assert_eq!(
            ClaimState::SettlementFailed.valid_transitions(),
            &[ClaimState::Ruled]
        );
        assert!(ClaimState::Ruled.valid_transitions().is_empty());
    }

    #[test]
    fn ruling_display() {
        assert_eq!(format!("{}", Ruling::Accepted), "ACCEPTED");
        assert_eq!(format!("{}", Ruling::Rejected), "REJECTED");
    }

    #[test]
    fn unresolved_tracks_state() {
        assert!(test_claim(ClaimState::Open).is_unresolved());
        assert!(test_claim(ClaimState::SettlementFailed).is_unresolved());
        assert!(!test_claim(ClaimState::Ruled).is_unresolved());
    }

    #[test]
    fn claim_serde_roundtrip() {
        let claim = test_claim(ClaimState::Open);
        let json_str = serde_json::to_string(&claim).unwrap();
        let deserialized: Claim = serde_json::from_str(&json_str).unwrap();
        assert_eq!(claim, deserialized);
    }

    #[test]
    fn state_serde_roundtrip() {
        let state = ClaimState::SettlementFailed;
        let json_str = serde_json::to_string(&state).unwrap();
        let deserialized: ClaimState = serde_json::from_str(&json_str).unwrap();
        assert_eq!(state, deserialized);
    }
}
