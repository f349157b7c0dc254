//! # Arbiter Registry
//!
//! The arbiter whitelist is externally managed (a token-curated registry,
//! a governance list, an operator config file). The voting engine only ever
//! asks one question of it, so it is modelled as an injected capability
//! rather than engine state — which also keeps the engine independently
//! testable.

use std::collections::HashSet;

use themis_core::Address;

/// Capability answering whether an address is a registered arbiter.
pub trait ArbiterRegistry {
    /// Whether `address` is currently whitelisted to vote.
    fn is_whitelisted(&self, address: &Address) -> bool;
}

/// In-memory arbiter registry for tests and simple hosts.
#[derive(Debug, Clone, Default)]
pub struct InMemoryArbiterRegistry {
    arbiters: HashSet<Address>,
}

impl InMemoryArbiterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an arbiter.
    pub fn register(&mut self, arbiter: Address) {
        self.arbiters.insert(arbiter);
    }

    /// Remove an arbiter.
    pub fn deregister(&mut self, arbiter: &Address) {
        self.arbiters.remove(arbiter);
    }
}

impl ArbiterRegistry for InMemoryArbiterRegistry {
    fn is_whitelisted(&self, address: &Address) -> bool {
        self.arbiters.contains(address)
    }
}
