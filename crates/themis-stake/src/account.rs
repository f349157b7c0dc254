//! # Stake Accounts
//!
//! A [`StakeAccount`] holds a staker's token collateral, the append-only
//! registry of claims opened against it, and the withdrawal lockup timer.
//! Every claim transition runs through the account because every transition
//! also moves account-level bookkeeping: the reserved-adjusted
//! `claimable_stake`, the open-claims count, and the lockup timer.
//!
//! ## Ruling Sources
//!
//! The account does not care *how* a ruling was produced. The designated
//! arbiter address may belong to a single human arbiter or to a
//! commit-reveal voting engine (`themis-voting`); both feed the same
//! [`rule_on_claim`](StakeAccount::rule_on_claim) transition, so payout and
//! bookkeeping logic exists exactly once.
//!
//! ## Lockup Timer
//!
//! The timer enforces a minimum delay between a withdrawal request and fund
//! release without letting the staker wait out pending disputes:
//!
//! - `lockup_ending == None` means the countdown is frozen (or was never
//!   armed). The invariant `open_claims > 0 ⇒ lockup_ending == None` holds
//!   across every reachable state.
//! - When the first claim opens while the countdown runs, the time left is
//!   captured into `lockup_remaining_secs` and the deadline cleared.
//! - When the last unresolved claim closes, the deadline is re-armed at
//!   `now + lockup_remaining_secs`.
//!
//! Time spent in disputes is therefore neither counted against the staker
//! nor skipped.
//!
//! ## Concurrency Model
//!
//! Operations apply one at a time in arrival order, as transactions against
//! a single authoritative ledger. Each operation validates fully before its
//! first effect; the only external effect (a gateway transfer) happens
//! before any internal mutation, so a failed call leaves all state
//! unchanged.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use themis_core::{Address, StakeId, Timestamp, TokenAmount};

use crate::claim::{Claim, ClaimState, Ruling};
use crate::error::StakeError;
use crate::events::StakeEvent;
use crate::gateway::TokenGateway;

/// Account configuration, fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeConfig {
    /// Collateral escrowed from the staker at creation.
    pub initial_stake: TokenAmount,
    /// Reference to the token the stake is denominated in.
    pub token: Address,
    /// Opaque arbitration agreement data.
    pub data: String,
    /// Minimum delay between withdrawal request and release, in seconds.
    pub lockup_period_secs: u64,
    /// The designated arbiter (a person, or a voting engine's address).
    pub arbiter: Address,
}

/// A stake account: collateral, claim registry, and lockup timer.
///
/// Created exactly once via [`StakeAccount::open`]; never re-initialized.
/// Fields are private because the invariants between `claimable_stake`,
/// `open_claims`, and the lockup timer only hold when mutation goes through
/// the operations below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeAccount {
    id: StakeId,
    staker: Address,
    token: Address,
    data: String,
    arbiter: Address,
    claimable_stake: TokenAmount,
    lockup_duration_secs: u64,
    lockup_remaining_secs: u64,
    lockup_ending: Option<Timestamp>,
    withdraw_initiated: bool,
    open_claims: u64,
    claims: Vec<Claim>,
    whitelisted_claimants: HashSet<Address>,
    created_at: Timestamp,
    events: Vec<StakeEvent>,
}

impl StakeAccount {
    /// Open a new stake account, escrowing `config.initial_stake` from the
    /// staker through the gateway.
    ///
    /// # Errors
    ///
    /// Returns [`StakeError::TransferFailed`] if the gateway rejects the
    /// stake escrow; no account is created in that case.
    pub fn open(
        staker: Address,
        config: StakeConfig,
        gateway: &mut dyn TokenGateway,
        now: Timestamp,
    ) -> Result<Self, StakeError> {
        if !gateway.transfer_from(&staker, config.initial_stake) {
            return Err(StakeError::TransferFailed(format!(
                "could not escrow initial stake of {} from {}",
                config.initial_stake, staker
            )));
        }
        let account = Self {
            id: StakeId::new(),
            staker,
            token: config.token,
            data: config.data,
            arbiter: config.arbiter,
            claimable_stake: config.initial_stake,
            lockup_duration_secs: config.lockup_period_secs,
            lockup_remaining_secs: config.lockup_period_secs,
            lockup_ending: None,
            withdraw_initiated: false,
            open_claims: 0,
            claims: Vec::new(),
            whitelisted_claimants: HashSet::new(),
            created_at: now,
            events: Vec::new(),
        };
        tracing::info!(stake = %account.id, "stake account opened");
        Ok(account)
    }

    // ── Claim lifecycle ────────────────────────────────────────────────

    /// Whitelist `claimant`, allowing it to open claims against this stake.
    ///
    /// # Errors
    ///
    /// Returns [`StakeError::Unauthorized`] unless `caller` is the staker.
    pub fn whitelist_claimant(
        &mut self,
        caller: &Address,
        claimant: Address,
    ) -> Result<(), StakeError> {
        if caller != &self.staker {
            return Err(StakeError::Unauthorized(
                "only the staker may whitelist claimants".to_string(),
            ));
        }
        self.whitelisted_claimants.insert(claimant);
        Ok(())
    }

    /// Open a claim: reserve `amount` from the claimable stake and escrow
    /// `fee` from the claimant. The caller is the claimant.
    ///
    /// If this is the first unresolved claim and the lockup countdown is
    /// running, the countdown freezes until all claims resolve.
    ///
    /// # Errors
    ///
    /// - [`StakeError::Unauthorized`] if the claimant is not whitelisted.
    /// - [`StakeError::InvalidState`] if `amount` exceeds the claimable stake.
    /// - [`StakeError::TransferFailed`] if the fee escrow is rejected.
    pub fn open_claim(
        &mut self,
        claimant: &Address,
        amount: TokenAmount,
        fee: TokenAmount,
        data: String,
        gateway: &mut dyn TokenGateway,
        now: Timestamp,
    ) -> Result<u64, StakeError> {
        if !self.whitelisted_claimants.contains(claimant) {
            return Err(StakeError::Unauthorized(format!(
                "claimant {claimant} is not whitelisted"
            )));
        }
        let remaining_stake = self.claimable_stake.checked_sub(amount).ok_or_else(|| {
            StakeError::InvalidState(format!(
                "claim amount {amount} exceeds claimable stake {}",
                self.claimable_stake
            ))
        })?;
        if !gateway.transfer_from(claimant, fee) {
            return Err(StakeError::TransferFailed(format!(
                "could not escrow arbitration fee of {fee} from {claimant}"
            )));
        }

        self.claimable_stake = remaining_stake;
        let claim_id = self.claims.len() as u64;
        self.claims.push(Claim {
            id: claim_id,
            claimant: claimant.clone(),
            amount,
            fee,
            data,
            state: ClaimState::Open,
            ruling: None,
            opened_at: now,
        });
        self.open_claims += 1;
        if self.open_claims == 1 {
            self.freeze_lockup(now);
        }

        self.events.push(StakeEvent::ClaimOpened { claim_id });
        tracing::debug!(stake = %self.id, claim_id, %amount, %fee, "claim opened");
        Ok(claim_id)
    }

    /// Declare off-protocol settlement failed, making the claim eligible
    /// for a ruling. Either the claimant or the staker may declare.
    ///
    /// # Errors
    ///
    /// - [`StakeError::InvalidClaim`] if no such claim exists.
    /// - [`StakeError::Unauthorized`] if the caller is neither party.
    /// - [`StakeError::InvalidState`] unless the claim is `Open`.
    pub fn settlement_failed(&mut self, caller: &Address, claim_id: u64) -> Result<(), StakeError> {
        let claim = self
            .claims
            .get(claim_id as usize)
            .ok_or(StakeError::InvalidClaim(claim_id))?;
        if caller != &claim.claimant && caller != &self.staker {
            return Err(StakeError::Unauthorized(
                "only the claimant or the staker may declare settlement failed".to_string(),
            ));
        }
        if claim.state != ClaimState::Open {
            return Err(StakeError::InvalidState(format!(
                "claim {claim_id} is {}, expected {}",
                claim.state,
                ClaimState::Open
            )));
        }
        self.claims[claim_id as usize].state = ClaimState::SettlementFailed;
        tracing::debug!(stake = %self.id, claim_id, "settlement failed");
        Ok(())
    }

    /// Rule on a claim whose settlement has failed. Only the designated
    /// arbiter may rule; the voting engine rules through this same path by
    /// being installed as the arbiter.
    ///
    /// Effects, applied atomically:
    /// - the escrowed fee is paid to the arbiter, whatever the ruling;
    /// - on [`Ruling::Rejected`], the reserved amount returns to the stake;
    ///   on [`Ruling::Accepted`] it stays forfeited toward the claimant
    ///   (payout mechanics are the host's concern);
    /// - the claim becomes `Ruled` and immutable;
    /// - the open-claims count decrements, resuming the lockup countdown if
    ///   this was the last unresolved claim and a withdrawal is pending.
    ///
    /// # Errors
    ///
    /// - [`StakeError::Unauthorized`] if the caller is not the arbiter.
    /// - [`StakeError::InvalidClaim`] if no such claim exists.
    /// - [`StakeError::InvalidState`] unless the claim is
    ///   `SettlementFailed` — ruling twice fails here.
    /// - [`StakeError::TransferFailed`] if the fee payout is rejected.
    pub fn rule_on_claim(
        &mut self,
        caller: &Address,
        claim_id: u64,
        ruling: Ruling,
        gateway: &mut dyn TokenGateway,
        now: Timestamp,
    ) -> Result<(), StakeError> {
        if caller != &self.arbiter {
            return Err(StakeError::Unauthorized(
                "only the designated arbiter may rule on claims".to_string(),
            ));
        }
        let claim = self
            .claims
            .get(claim_id as usize)
            .ok_or(StakeError::InvalidClaim(claim_id))?;
        if claim.state != ClaimState::SettlementFailed {
            return Err(StakeError::InvalidState(format!(
                "claim {claim_id} is {}, expected {}",
                claim.state,
                ClaimState::SettlementFailed
            )));
        }
        let (amount, fee) = (claim.amount, claim.fee);
        if !gateway.transfer(&self.arbiter, fee) {
            return Err(StakeError::TransferFailed(format!(
                "could not pay arbitration fee of {fee} to {}",
                self.arbiter
            )));
        }

        if ruling == Ruling::Rejected {
            // Cannot overflow: `amount` was reserved out of this balance
            // when the claim opened.
            self.claimable_stake = self.claimable_stake.saturating_add(amount);
        }
        let claim = &mut self.claims[claim_id as usize];
        claim.state = ClaimState::Ruled;
        claim.ruling = Some(ruling);
        self.open_claims = self.open_claims.saturating_sub(1);
        if self.open_claims == 0 && self.withdraw_initiated {
            self.lockup_ending = Some(now.plus_secs(self.lockup_remaining_secs));
        }

        self.events.push(StakeEvent::ClaimRuled { claim_id, ruling });
        tracing::info!(stake = %self.id, claim_id, %ruling, "claim ruled");
        Ok(())
    }

    // ── Lockup timer ───────────────────────────────────────────────────

    /// Request withdrawal of the stake. No-op if already requested.
    ///
    /// The countdown starts immediately when no claims are unresolved;
    /// otherwise it starts once the last unresolved claim closes.
    ///
    /// # Errors
    ///
    /// Returns [`StakeError::Unauthorized`] unless `caller` is the staker.
    pub fn initiate_withdraw_stake(
        &mut self,
        caller: &Address,
        now: Timestamp,
    ) -> Result<(), StakeError> {
        if caller != &self.staker {
            return Err(StakeError::Unauthorized(
                "only the staker may initiate withdrawal".to_string(),
            ));
        }
        if self.withdraw_initiated {
            return Ok(());
        }
        self.withdraw_initiated = true;
        if self.open_claims == 0 {
            self.lockup_ending = Some(now.plus_secs(self.lockup_remaining_secs));
        }
        self.events.push(StakeEvent::WithdrawInitiated);
        tracing::debug!(stake = %self.id, "withdrawal initiated");
        Ok(())
    }

    /// Release the claimable stake to the staker once the lockup deadline
    /// has passed.
    ///
    /// # Errors
    ///
    /// - [`StakeError::Unauthorized`] unless `caller` is the staker.
    /// - [`StakeError::InvalidState`] if withdrawal was never initiated or
    ///   the countdown is frozen behind unresolved claims.
    /// - [`StakeError::WindowOpen`] if the deadline has not passed.
    /// - [`StakeError::TransferFailed`] if the payout is rejected.
    pub fn withdraw_stake(
        &mut self,
        caller: &Address,
        gateway: &mut dyn TokenGateway,
        now: Timestamp,
    ) -> Result<TokenAmount, StakeError> {
        if caller != &self.staker {
            return Err(StakeError::Unauthorized(
                "only the staker may withdraw the stake".to_string(),
            ));
        }
        match self.lockup_ending {
            None => {
                return Err(StakeError::InvalidState(
                    "lockup countdown is not running; withdrawal not initiated or claims open"
                        .to_string(),
                ))
            }
            Some(ending) if now < ending => {
                return Err(StakeError::WindowOpen(ending.secs_since(&now)));
            }
            Some(_) => {}
        }
        let amount = self.claimable_stake;
        if !gateway.transfer(&self.staker, amount) {
            return Err(StakeError::TransferFailed(format!(
                "could not release stake of {amount} to {}",
                self.staker
            )));
        }
        self.claimable_stake = TokenAmount::ZERO;
        self.withdraw_initiated = false;
        self.lockup_ending = None;
        self.lockup_remaining_secs = self.lockup_duration_secs;
        self.events.push(StakeEvent::StakeWithdrawn { amount });
        tracing::info!(stake = %self.id, %amount, "stake withdrawn");
        Ok(amount)
    }

    /// Capture the unspent countdown and clear the deadline. Called when
    /// the first claim opens while the countdown runs.
    fn freeze_lockup(&mut self, now: Timestamp) {
        if let Some(ending) = self.lockup_ending.take() {
            // Time left on the clock, clamped at zero if the deadline had
            // already passed without a withdrawal.
            self.lockup_remaining_secs = ending.secs_since(&now).max(0) as u64;
        }
    }

    // ── Accessors ──────────────────────────────────────────────────────

    /// The account's opaque handle, used by the claim keying function.
    pub fn id(&self) -> StakeId {
        self.id
    }

    /// The staker who owns the collateral.
    pub fn staker(&self) -> &Address {
        &self.staker
    }

    /// The designated arbiter.
    pub fn arbiter(&self) -> &Address {
        &self.arbiter
    }

    /// The token the stake is denominated in.
    pub fn token(&self) -> &Address {
        &self.token
    }

    /// The arbitration agreement data supplied at creation.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// The reserved-adjusted stake balance.
    pub fn claimable_stake(&self) -> TokenAmount {
        self.claimable_stake
    }

    /// Number of claims in `Open` or `SettlementFailed` state.
    pub fn open_claims(&self) -> u64 {
        self.open_claims
    }

    /// Total number of claims ever opened; also the id the next claim will
    /// receive.
    pub fn num_claims(&self) -> u64 {
        self.claims.len() as u64
    }

    /// Look up a claim by id.
    pub fn claim(&self, claim_id: u64) -> Option<&Claim> {
        self.claims.get(claim_id as usize)
    }

    /// The absolute lockup deadline. `None` while frozen or not initiated.
    pub fn lockup_ending(&self) -> Option<Timestamp> {
        self.lockup_ending
    }

    /// Seconds of lockup countdown left to serve, meaningful while frozen.
    pub fn lockup_remaining_secs(&self) -> u64 {
        self.lockup_remaining_secs
    }

    /// Whether the staker has requested withdrawal.
    pub fn withdraw_initiated(&self) -> bool {
        self.withdraw_initiated
    }

    /// Whether `address` may open claims against this stake.
    pub fn is_claimant_whitelisted(&self, address: &Address) -> bool {
        self.whitelisted_claimants.contains(address)
    }

    /// When the account was created (ledger time).
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Events emitted so far, without draining them.
    pub fn events(&self) -> &[StakeEvent] {
        &self.events
    }

    /// Drain the pending event log for forwarding by the host.
    pub fn take_events(&mut self) -> Vec<StakeEvent> {
        std::mem::take(&mut self.events)
    }
}
