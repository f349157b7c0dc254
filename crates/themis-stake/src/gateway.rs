//! # Token Transfer Gateway
//!
//! The engine never moves balances itself. Every token movement — stake
//! initialization, fee escrow, fee payout, withdrawal — goes through the
//! [`TokenGateway`] capability, which the host injects. A gateway call is a
//! synchronous, atomic sub-operation: it either succeeds or the whole engine
//! operation fails with `TransferFailed` and no state change.
//!
//! [`InMemoryTokenLedger`] is a reference implementation for tests and
//! simple hosts. The gateway implementation holds the engine's escrow
//! balance, so `transfer_from` moves tokens *into* escrow and `transfer`
//! pays *out of* escrow.

use std::collections::HashMap;

use themis_core::{Address, TokenAmount};

/// Capability for moving fungible-token balances.
pub trait TokenGateway {
    /// Pull `amount` from `owner` into the engine's escrow.
    /// Returns `false` if the owner's balance is insufficient or the
    /// transfer is otherwise rejected.
    fn transfer_from(&mut self, owner: &Address, amount: TokenAmount) -> bool;

    /// Pay `amount` out of the engine's escrow to `to`.
    /// Returns `false` if the escrow balance is insufficient.
    fn transfer(&mut self, to: &Address, amount: TokenAmount) -> bool;
}

/// In-memory token ledger holding an escrow balance.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenLedger {
    balances: HashMap<Address, TokenAmount>,
    escrow: TokenAmount,
}

impl InMemoryTokenLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to `holder` (mint, for test setup). Saturates at
    /// the maximum representable balance.
    pub fn credit(&mut self, holder: &Address, amount: TokenAmount) {
        let balance = self.balances.entry(holder.clone()).or_default();
        *balance = balance.saturating_add(amount);
    }

    /// The free balance of `holder`.
    pub fn balance_of(&self, holder: &Address) -> TokenAmount {
        self.balances.get(holder).copied().unwrap_or(TokenAmount::ZERO)
    }

    /// The balance currently held in escrow.
    pub fn escrow_balance(&self) -> TokenAmount {
        self.escrow
    }
}

impl TokenGateway for InMemoryTokenLedger {
    fn transfer_from(&mut self, owner: &Address, amount: TokenAmount) -> bool {
        let Some(balance) = self.balances.get_mut(owner) else {
            return amount.is_zero();
        };
        match balance.checked_sub(amount) {
            Some(remaining) => match self.escrow.checked_add(amount) {
                Some(escrow) => {
                    *balance = remaining;
                    self.escrow = escrow;
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    fn transfer(&mut self, to: &Address, amount: TokenAmount) -> bool {
        match self.escrow.checked_sub(amount) {
            Some(escrow) => {
                self.escrow = escrow;
                self.credit(to, amount);
                true
            }
            None => false,
        }
    }
}
