//! # Stake Events
//!
//! Fire-and-forget notifications emitted at the end of each successful
//! account operation. The engine never consumes its own events; the host
//! drains them via [`StakeAccount::take_events`](crate::StakeAccount::take_events)
//! and forwards them to whatever transport it uses.

use serde::{Deserialize, Serialize};

use themis_core::TokenAmount;

use crate::claim::Ruling;

/// An observable side effect of a stake-account operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakeEvent {
    /// A claim was opened against the stake.
    ClaimOpened {
        /// Sequence-assigned id of the new claim.
        claim_id: u64,
    },
    /// A claim received its ruling and closed.
    ClaimRuled {
        /// Id of the ruled claim.
        claim_id: u64,
        /// The ruling that closed it.
        ruling: Ruling,
    },
    /// The staker requested withdrawal; the lockup countdown is armed.
    WithdrawInitiated,
    /// The stake was paid out to the staker after the lockup elapsed.
    StakeWithdrawn {
        /// Amount released.
        amount: TokenAmount,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serde_roundtrip() {
        let events = vec![
            StakeEvent::ClaimOpened { claim_id: 0 },
            StakeEvent::ClaimRuled {
                claim_id: 0,
                ruling: Ruling::Rejected,
            },
            StakeEvent::WithdrawInitiated,
            StakeEvent::StakeWithdrawn {
                amount: TokenAmount::new(1000),
            },
        ];
        let json_str = serde_json::to_string(&events).unwrap();
        let deserialized: Vec<StakeEvent> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(events, deserialized);
    }
}
