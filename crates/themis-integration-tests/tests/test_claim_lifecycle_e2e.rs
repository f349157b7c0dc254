//! End-to-end claim lifecycle against a single designated arbiter.
//!
//! Walks full scenarios through account creation, claim opening, settlement
//! failure, and ruling, checking token conservation and the emitted event
//! stream at each step.

use themis_core::{Address, Timestamp, TokenAmount};
use themis_stake::{
    ClaimState, InMemoryTokenLedger, Ruling, StakeAccount, StakeConfig, StakeError, StakeEvent,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const INITIAL_STAKE: u128 = 1000;
const LOCKUP_SECS: u64 = 3600;

fn addr(n: u8) -> Address {
    Address::new(format!("0x{:040x}", n)).unwrap()
}

fn staker() -> Address {
    addr(1)
}

fn claimant() -> Address {
    addr(2)
}

fn arbiter() -> Address {
    addr(3)
}

fn setup() -> (StakeAccount, InMemoryTokenLedger, Timestamp) {
    let mut ledger = InMemoryTokenLedger::new();
    ledger.credit(&staker(), TokenAmount::new(INITIAL_STAKE));
    ledger.credit(&claimant(), TokenAmount::new(500));
    let t0 = Timestamp::now();
    let mut account = StakeAccount::open(
        staker(),
        StakeConfig {
            initial_stake: TokenAmount::new(INITIAL_STAKE),
            token: addr(9),
            data: "service agreement v1".to_string(),
            lockup_period_secs: LOCKUP_SECS,
            arbiter: arbiter(),
        },
        &mut ledger,
        t0,
    )
    .unwrap();
    account.whitelist_claimant(&staker(), claimant()).unwrap();
    (account, ledger, t0)
}

// ---------------------------------------------------------------------------
// Rejected claim: full round trip
// ---------------------------------------------------------------------------

#[test]
fn rejected_claim_leaves_stake_whole_and_pays_arbiter() {
    let (mut account, mut ledger, t0) = setup();

    let id = account
        .open_claim(
            &claimant(),
            TokenAmount::new(1),
            TokenAmount::new(1),
            "late delivery".to_string(),
            &mut ledger,
            t0,
        )
        .unwrap();
    assert_eq!(id, 0);
    assert_eq!(account.claimable_stake(), TokenAmount::new(999));
    assert_eq!(ledger.balance_of(&claimant()), TokenAmount::new(499));

    account.settlement_failed(&claimant(), id).unwrap();
    account
        .rule_on_claim(&arbiter(), id, Ruling::Rejected, &mut ledger, t0)
        .unwrap();

    // The reserved amount is back, the fee went to the arbiter, and the
    // claimant's fee is gone for good.
    assert_eq!(account.claimable_stake(), TokenAmount::new(INITIAL_STAKE));
    assert_eq!(ledger.balance_of(&arbiter()), TokenAmount::new(1));
    assert_eq!(ledger.balance_of(&claimant()), TokenAmount::new(499));
    assert_eq!(account.open_claims(), 0);

    let claim = account.claim(id).unwrap();
    assert_eq!(claim.state, ClaimState::Ruled);
    assert_eq!(claim.ruling, Some(Ruling::Rejected));

    assert_eq!(
        account.take_events(),
        vec![
            StakeEvent::ClaimOpened { claim_id: 0 },
            StakeEvent::ClaimRuled {
                claim_id: 0,
                ruling: Ruling::Rejected,
            },
        ]
    );
}

// ---------------------------------------------------------------------------
// Accepted claim: amount forfeited
// ---------------------------------------------------------------------------

#[test]
fn accepted_claim_forfeits_amount_and_pays_arbiter() {
    let (mut account, mut ledger, t0) = setup();

    let id = account
        .open_claim(
            &claimant(),
            TokenAmount::new(250),
            TokenAmount::new(10),
            String::new(),
            &mut ledger,
            t0,
        )
        .unwrap();
    account.settlement_failed(&staker(), id).unwrap();
    account
        .rule_on_claim(&arbiter(), id, Ruling::Accepted, &mut ledger, t0)
        .unwrap();

    assert_eq!(account.claimable_stake(), TokenAmount::new(750));
    assert_eq!(ledger.balance_of(&arbiter()), TokenAmount::new(10));
    assert_eq!(account.claim(id).unwrap().ruling, Some(Ruling::Accepted));
}

// ---------------------------------------------------------------------------
// Multiple concurrent claims
// ---------------------------------------------------------------------------

#[test]
fn concurrent_claims_are_independent() {
    let (mut account, mut ledger, t0) = setup();

    let a = account
        .open_claim(
            &claimant(),
            TokenAmount::new(100),
            TokenAmount::new(1),
            String::new(),
            &mut ledger,
            t0,
        )
        .unwrap();
    let b = account
        .open_claim(
            &claimant(),
            TokenAmount::new(200),
            TokenAmount::new(2),
            String::new(),
            &mut ledger,
            t0,
        )
        .unwrap();
    assert_eq!((a, b), (0, 1));
    assert_eq!(account.claimable_stake(), TokenAmount::new(700));
    assert_eq!(account.open_claims(), 2);

    // Rule the second claim first; the first is untouched.
    account.settlement_failed(&claimant(), b).unwrap();
    account
        .rule_on_claim(&arbiter(), b, Ruling::Accepted, &mut ledger, t0)
        .unwrap();
    assert_eq!(account.claim(a).unwrap().state, ClaimState::Open);
    assert_eq!(account.claimable_stake(), TokenAmount::new(700));
    assert_eq!(account.open_claims(), 1);

    account.settlement_failed(&claimant(), a).unwrap();
    account
        .rule_on_claim(&arbiter(), a, Ruling::Rejected, &mut ledger, t0)
        .unwrap();
    // 1000 - 200 forfeited + 100 restored.
    assert_eq!(account.claimable_stake(), TokenAmount::new(800));
    assert_eq!(account.open_claims(), 0);
    // One fee per ruling.
    assert_eq!(ledger.balance_of(&arbiter()), TokenAmount::new(3));
}

// ---------------------------------------------------------------------------
// A whole-stake claim
// ---------------------------------------------------------------------------

#[test]
fn claim_may_reserve_the_entire_stake_but_not_more() {
    let (mut account, mut ledger, t0) = setup();

    let over = account.open_claim(
        &claimant(),
        TokenAmount::new(INITIAL_STAKE + 1),
        TokenAmount::new(1),
        String::new(),
        &mut ledger,
        t0,
    );
    assert!(matches!(over, Err(StakeError::InvalidState(_))));

    let id = account
        .open_claim(
            &claimant(),
            TokenAmount::new(INITIAL_STAKE),
            TokenAmount::new(1),
            String::new(),
            &mut ledger,
            t0,
        )
        .unwrap();
    assert_eq!(account.claimable_stake(), TokenAmount::ZERO);

    // With nothing left, a further claim for any positive amount fails.
    let another = account.open_claim(
        &claimant(),
        TokenAmount::new(1),
        TokenAmount::new(1),
        String::new(),
        &mut ledger,
        t0,
    );
    assert!(matches!(another, Err(StakeError::InvalidState(_))));

    account.settlement_failed(&claimant(), id).unwrap();
    account
        .rule_on_claim(&arbiter(), id, Ruling::Rejected, &mut ledger, t0)
        .unwrap();
    assert_eq!(account.claimable_stake(), TokenAmount::new(INITIAL_STAKE));
}

// ---------------------------------------------------------------------------
// Authorization boundaries across the lifecycle
// ---------------------------------------------------------------------------

#[test]
fn lifecycle_rejects_wrong_callers_at_every_step() {
    let (mut account, mut ledger, t0) = setup();
    let stranger = addr(42);

    let unlisted = account.open_claim(
        &stranger,
        TokenAmount::new(1),
        TokenAmount::new(1),
        String::new(),
        &mut ledger,
        t0,
    );
    assert!(matches!(unlisted, Err(StakeError::Unauthorized(_))));

    let id = account
        .open_claim(
            &claimant(),
            TokenAmount::new(1),
            TokenAmount::new(1),
            String::new(),
            &mut ledger,
            t0,
        )
        .unwrap();

    assert!(matches!(
        account.settlement_failed(&stranger, id),
        Err(StakeError::Unauthorized(_))
    ));
    account.settlement_failed(&claimant(), id).unwrap();

    // Neither the staker nor the claimant may rule.
    for caller in [staker(), claimant(), stranger] {
        let result = account.rule_on_claim(&caller, id, Ruling::Accepted, &mut ledger, t0);
        assert!(matches!(result, Err(StakeError::Unauthorized(_))));
    }
    // The claim is still rulable by the arbiter afterwards.
    account
        .rule_on_claim(&arbiter(), id, Ruling::Rejected, &mut ledger, t0)
        .unwrap();
}

// ---------------------------------------------------------------------------
// Ruled claims are immutable
// ---------------------------------------------------------------------------

#[test]
fn ruled_claim_accepts_no_further_transitions() {
    let (mut account, mut ledger, t0) = setup();
    let id = account
        .open_claim(
            &claimant(),
            TokenAmount::new(5),
            TokenAmount::new(1),
            String::new(),
            &mut ledger,
            t0,
        )
        .unwrap();
    account.settlement_failed(&claimant(), id).unwrap();
    account
        .rule_on_claim(&arbiter(), id, Ruling::Accepted, &mut ledger, t0)
        .unwrap();

    assert!(matches!(
        account.settlement_failed(&claimant(), id),
        Err(StakeError::InvalidState(_))
    ));
    assert!(matches!(
        account.rule_on_claim(&arbiter(), id, Ruling::Rejected, &mut ledger, t0),
        Err(StakeError::InvalidState(_))
    ));
    // No double fee payout happened.
    assert_eq!(ledger.balance_of(&arbiter()), TokenAmount::new(1));
}
