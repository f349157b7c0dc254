//! # Commit-Reveal Voting Engine
//!
//! Panel arbitration: a set of registered arbiters reaches a [`Ruling`]
//! without any arbiter's choice influencing another's. Each claim gets a
//! poll in two timed phases — commit, then reveal — followed by resolution:
//!
//! ```text
//! first commit ──▶ [commit window] ──▶ [reveal window] ──▶ resolve_claim()
//! ```
//!
//! The engine addresses claims by [`ClaimKey`], derived purely from the
//! originating account's handle and the local claim number, so one engine
//! serves any number of stake accounts. A poll exists only once the first
//! arbiter commits; the originating claim's own creation is invisible here.
//!
//! To rule, the engine is installed as the designated arbiter of the stake
//! accounts it serves: [`resolve_claim`](VotingEngine::resolve_claim)
//! forwards the tallied ruling through the exact same
//! [`StakeAccount::rule_on_claim`] transition the direct-arbiter path uses,
//! so payout and lockup bookkeeping are never duplicated.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use themis_core::{claim_key, Address, ClaimKey, Timestamp};
use themis_stake::{ClaimState, Ruling, StakeAccount, TokenGateway};

use crate::commit::{commit_digest, CommitDigest, CommitRecord};
use crate::error::VotingError;
use crate::registry::ArbiterRegistry;

/// An observable side effect of a voting operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VotingEvent {
    /// An arbiter committed (or replaced) a vote for a claim.
    VoteCommitted {
        /// Key of the claim voted on.
        claim: ClaimKey,
        /// The committing arbiter.
        arbiter: Address,
    },
    /// An arbiter revealed its vote.
    VoteRevealed {
        /// Key of the claim voted on.
        claim: ClaimKey,
        /// The revealing arbiter.
        arbiter: Address,
        /// The revealed choice.
        choice: Ruling,
    },
}

/// Per-claim poll state: fixed windows and the arbiters' commit records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ClaimPoll {
    /// End of the commit window (fixed at the first commit).
    commit_ending: Timestamp,
    /// End of the reveal window.
    reveal_ending: Timestamp,
    /// One record per arbiter that has committed.
    commits: HashMap<Address, CommitRecord>,
    /// Whether the poll has been resolved into a ruling.
    resolved: bool,
}

/// The commit-reveal voting engine.
///
/// Holds one [`ClaimPoll`] per claim voted on. Per-arbiter commit records
/// are independent and never contend with one another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotingEngine {
    address: Address,
    commit_period_secs: u64,
    reveal_period_secs: u64,
    polls: HashMap<ClaimKey, ClaimPoll>,
    events: Vec<VotingEvent>,
}

impl VotingEngine {
    /// Create an engine with the given commit and reveal window lengths.
    ///
    /// `address` is the engine's own ledger address — install it as the
    /// designated arbiter of every stake account the panel should serve.
    pub fn new(address: Address, commit_period_secs: u64, reveal_period_secs: u64) -> Self {
        Self {
            address,
            commit_period_secs,
            reveal_period_secs,
            polls: HashMap::new(),
            events: Vec::new(),
        }
    }

    /// The engine's ledger address.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Whether a poll exists for `key`. Existence is established lazily by
    /// the first committed vote, not by the originating claim's creation.
    pub fn claim_exists(&self, key: &ClaimKey) -> bool {
        self.polls.contains_key(key)
    }

    /// The commitment an arbiter currently has on record for `key`, if any.
    pub fn arbiter_commit(&self, key: &ClaimKey, arbiter: &Address) -> Option<&CommitRecord> {
        self.polls.get(key)?.commits.get(arbiter)
    }

    /// Commit a vote on claim `claim_number` of `stake`.
    ///
    /// The first commit for a claim opens its poll and fixes the commit and
    /// reveal deadlines. Repeated commits from the same arbiter before its
    /// reveal replace the prior commitment.
    ///
    /// # Errors
    ///
    /// - [`VotingError::Unauthorized`] if `arbiter` is not whitelisted.
    /// - [`VotingError::InvalidClaim`] unless the referenced claim exists
    ///   in its origin account and is `SettlementFailed`.
    /// - [`VotingError::WindowClosed`] after the commit window.
    /// - [`VotingError::InvalidState`] if the arbiter already revealed.
    pub fn commit_vote(
        &mut self,
        registry: &dyn ArbiterRegistry,
        arbiter: &Address,
        stake: &StakeAccount,
        claim_number: u64,
        secret_hash: CommitDigest,
        now: Timestamp,
    ) -> Result<ClaimKey, VotingError> {
        if !registry.is_whitelisted(arbiter) {
            return Err(VotingError::Unauthorized(format!(
                "{arbiter} is not a registered arbiter"
            )));
        }
        match stake.claim(claim_number) {
            None => {
                return Err(VotingError::InvalidClaim(format!(
                    "claim {claim_number} does not exist in account {}",
                    stake.id()
                )))
            }
            Some(claim) if claim.state != ClaimState::SettlementFailed => {
                return Err(VotingError::InvalidClaim(format!(
                    "claim {claim_number} is {}, not eligible for voting",
                    claim.state
                )))
            }
            Some(_) => {}
        }

        let key = claim_key(&stake.id(), claim_number);
        // Validate against the would-be deadlines before the poll exists,
        // so a refused commit never leaves an empty poll behind.
        let commit_ending = match self.polls.get(&key) {
            Some(poll) => poll.commit_ending,
            None => now.plus_secs(self.commit_period_secs),
        };
        if now >= commit_ending {
            return Err(VotingError::WindowClosed(format!(
                "commit window for claim {key} ended at {commit_ending}"
            )));
        }
        if self
            .polls
            .get(&key)
            .and_then(|poll| poll.commits.get(arbiter))
            .is_some_and(|r| r.revealed)
        {
            return Err(VotingError::InvalidState(format!(
                "{arbiter} already revealed for claim {key}"
            )));
        }

        let reveal_period = self.reveal_period_secs;
        let poll = self.polls.entry(key).or_insert_with(|| ClaimPoll {
            commit_ending,
            reveal_ending: commit_ending.plus_secs(reveal_period),
            commits: HashMap::new(),
            resolved: false,
        });
        poll.commits
            .insert(arbiter.clone(), CommitRecord::new(secret_hash));

        self.events.push(VotingEvent::VoteCommitted {
            claim: key,
            arbiter: arbiter.clone(),
        });
        tracing::debug!(claim = %key, %arbiter, "vote committed");
        Ok(key)
    }

    /// Reveal a previously committed vote.
    ///
    /// # Errors
    ///
    /// - [`VotingError::InvalidClaim`] if no poll exists for `key`.
    /// - [`VotingError::InvalidState`] without an unrevealed commitment
    ///   from the caller.
    /// - [`VotingError::WindowOpen`] while the commit window still runs.
    /// - [`VotingError::WindowClosed`] after the reveal window.
    /// - [`VotingError::RevealMismatch`] if `commit_digest(choice, salt)`
    ///   differs from the committed digest.
    pub fn reveal_vote(
        &mut self,
        arbiter: &Address,
        key: ClaimKey,
        choice: Ruling,
        salt: &[u8],
        now: Timestamp,
    ) -> Result<(), VotingError> {
        let poll = self
            .polls
            .get_mut(&key)
            .ok_or_else(|| VotingError::InvalidClaim(format!("no poll for claim {key}")))?;
        if now < poll.commit_ending {
            return Err(VotingError::WindowOpen(format!(
                "commit window for claim {key} runs until {}",
                poll.commit_ending
            )));
        }
        if now >= poll.reveal_ending {
            return Err(VotingError::WindowClosed(format!(
                "reveal window for claim {key} ended at {}",
                poll.reveal_ending
            )));
        }
        let record = poll.commits.get_mut(arbiter).ok_or_else(|| {
            VotingError::InvalidState(format!("no commitment from {arbiter} for claim {key}"))
        })?;
        if record.revealed {
            return Err(VotingError::InvalidState(format!(
                "{arbiter} already revealed for claim {key}"
            )));
        }
        if commit_digest(choice, salt) != record.secret_hash {
            return Err(VotingError::RevealMismatch);
        }
        record.revealed = true;
        record.choice = Some(choice);
        record.salt = Some(salt.to_vec());

        self.events.push(VotingEvent::VoteRevealed {
            claim: key,
            arbiter: arbiter.clone(),
            choice,
        });
        tracing::debug!(claim = %key, %arbiter, %choice, "vote revealed");
        Ok(())
    }

    /// Resolve the poll for claim `claim_number` of `stake` and forward the
    /// tallied ruling into the claim state machine.
    ///
    /// Unrevealed commitments are excluded from the tally. The claim is
    /// accepted only on a strict majority of revealed `Accepted` choices;
    /// ties — and polls where nobody revealed — reject, leaving the stake
    /// whole.
    ///
    /// # Errors
    ///
    /// - [`VotingError::InvalidClaim`] if no poll exists.
    /// - [`VotingError::WindowOpen`] before the reveal window closes.
    /// - [`VotingError::InvalidState`] if already resolved.
    /// - [`VotingError::Stake`] if the stake state machine rejects the
    ///   ruling (the poll then stays unresolved).
    pub fn resolve_claim(
        &mut self,
        stake: &mut StakeAccount,
        claim_number: u64,
        gateway: &mut dyn TokenGateway,
        now: Timestamp,
    ) -> Result<Ruling, VotingError> {
        let key = claim_key(&stake.id(), claim_number);
        let poll = self
            .polls
            .get(&key)
            .ok_or_else(|| VotingError::InvalidClaim(format!("no poll for claim {key}")))?;
        if now < poll.reveal_ending {
            return Err(VotingError::WindowOpen(format!(
                "reveal window for claim {key} runs until {}",
                poll.reveal_ending
            )));
        }
        if poll.resolved {
            return Err(VotingError::InvalidState(format!(
                "claim {key} is already resolved"
            )));
        }
        let ruling = tally(poll.commits.values());

        stake.rule_on_claim(&self.address, claim_number, ruling, gateway, now)?;
        if let Some(poll) = self.polls.get_mut(&key) {
            poll.resolved = true;
        }
        tracing::info!(claim = %key, %ruling, "claim resolved by panel");
        Ok(ruling)
    }

    /// Events emitted so far, without draining them.
    pub fn events(&self) -> &[VotingEvent] {
        &self.events
    }

    /// Drain the pending event log for forwarding by the host.
    pub fn take_events(&mut self) -> Vec<VotingEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Tally revealed choices into a ruling: strict majority accepts, ties and
/// empty tallies reject.
fn tally<'a>(commits: impl Iterator<Item = &'a CommitRecord>) -> Ruling {
    let mut accepts = 0u64;
    let mut rejects = 0u64;
    for record in commits.filter(|r| r.revealed) {
        match record.choice {
            Some(Ruling::Accepted) => accepts += 1,
            Some(Ruling::Rejected) => rejects += 1,
            None => {}
        }
    }
    if accepts > rejects {
        Ruling::Accepted
    } else {
        Ruling::Rejected
    }
}
