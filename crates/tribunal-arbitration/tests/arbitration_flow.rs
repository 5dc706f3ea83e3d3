//! # End-to-End Arbitration Flow Tests
//!
//! Exercises the full mechanism through the public service surface:
//! registration, case creation, voting, eager decision, settlement,
//! expiry, and reward claims. Each test builds a fresh store, so the
//! scenarios are fully isolated.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Duration;

use tribunal_arbitration::{
    ArbitrationConfig, ArbitrationError, ArbitrationService, ArbitrationStore, CaseState, Dispute,
    DisputeOutcome, DisputeResolver, DisputeState, ResolverError, WinningSide,
};
use tribunal_core::{Amount, ArbitratorAddress, DisputeId, Timestamp};

/// Collaborator double that records its calls.
#[derive(Default)]
struct RecordingResolver {
    calls: AtomicUsize,
    last: parking_lot::Mutex<Option<(DisputeId, DisputeOutcome, Option<Amount>)>>,
}

impl DisputeResolver for RecordingResolver {
    fn resolve_dispute(
        &self,
        dispute_id: &DisputeId,
        outcome: DisputeOutcome,
        refund_amount: Option<Amount>,
        _rationale: &str,
    ) -> Result<(), ResolverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock() = Some((dispute_id.clone(), outcome, refund_amount));
        Ok(())
    }
}

fn amt(s: &str) -> Amount {
    s.parse().unwrap()
}

fn addr(s: &str) -> ArbitratorAddress {
    ArbitratorAddress::new(s).unwrap()
}

fn t0() -> Timestamp {
    Timestamp::parse("2026-03-01T00:00:00Z").unwrap()
}

fn service_with(
    config: ArbitrationConfig,
) -> (ArbitrationService, Arc<RecordingResolver>) {
    let resolver = Arc::new(RecordingResolver::default());
    let svc = ArbitrationService::new(
        config,
        Arc::new(ArbitrationStore::new()),
        Arc::clone(&resolver) as Arc<dyn DisputeResolver>,
    )
    .unwrap();
    (svc, resolver)
}

fn escalated(id: &str, payment: &str) -> Dispute {
    Dispute {
        id: DisputeId::new(id).unwrap(),
        state: DisputeState::Escalated,
        payment_amount: amt(payment),
        escalation: None,
    }
}

/// Registered arbitrators X, Y, Z with stake 100 each; vote stake 10,
/// quorum 3, winner share 80%. The setup every scenario starts from.
fn three_arbitrators(svc: &ArbitrationService) -> [ArbitratorAddress; 3] {
    let xyz = [addr("0xx"), addr("0xy"), addr("0xz")];
    for a in &xyz {
        svc.register_arbitrator(a, amt("100"), t0()).unwrap();
    }
    xyz
}

#[test]
fn split_decision_rewards_majority_and_slashes_minority() {
    // X and Y side with the user, Z with the tool owner. The user wins
    // 2-1: Z is slashed the 10-point vote stake, and the 80% pool of 8
    // splits 4 apiece between X and Y.
    let (svc, resolver) = service_with(ArbitrationConfig::default());
    let [x, y, z] = three_arbitrators(&svc);
    let case = svc.create_case(&escalated("disp_a", "250"), t0()).unwrap();

    svc.cast_vote(case.id, &x, true, None, t0()).unwrap();
    svc.cast_vote(case.id, &y, true, Some("vendor never delivered".into()), t0())
        .unwrap();
    svc.cast_vote(case.id, &z, false, None, t0()).unwrap();

    let decided = svc.case(&case.id).unwrap();
    assert_eq!(decided.state, CaseState::Decided);
    assert_eq!(decided.winning_side, Some(WinningSide::User));
    assert_eq!(decided.outcome, Some(DisputeOutcome::FullRefund));

    for winner in [&x, &y] {
        let rec = svc.arbitrator(winner).unwrap();
        assert_eq!(rec.staked_amount, amt("100"));
        assert_eq!(rec.rewards_earned, amt("4"));
        assert_eq!(rec.cases_participated, 1);
        assert_eq!(rec.cases_won, 1);
        assert_eq!(svc.pending_rewards(winner), amt("4"));
    }
    let loser = svc.arbitrator(&z).unwrap();
    assert_eq!(loser.staked_amount, amt("90"));
    assert_eq!(loser.penalties_incurred, amt("10"));
    assert_eq!(loser.cases_won, 0);

    // The collaborator was told to refund the disputed payment in full.
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
    let (dispute_id, outcome, refund) = resolver.last.lock().clone().unwrap();
    assert_eq!(dispute_id, DisputeId::new("disp_a").unwrap());
    assert_eq!(outcome, DisputeOutcome::FullRefund);
    assert_eq!(refund, Some(amt("250")));
}

#[test]
fn conservation_holds_for_a_decided_case() {
    let (svc, _) = service_with(ArbitrationConfig::default());
    let [x, y, z] = three_arbitrators(&svc);
    let case = svc.create_case(&escalated("disp_a", "250"), t0()).unwrap();

    svc.cast_vote(case.id, &x, true, None, t0()).unwrap();
    svc.cast_vote(case.id, &y, true, None, t0()).unwrap();
    svc.cast_vote(case.id, &z, false, None, t0()).unwrap();

    let penalties = svc.arbitrator(&z).unwrap().penalties_incurred;
    let rewards = Amount::checked_sum(
        [&x, &y].iter().map(|a| svc.arbitrator(a).unwrap().rewards_earned),
    )
    .unwrap();
    assert_eq!(penalties.percent(80), rewards);
}

#[test]
fn exact_tie_resolves_for_tool_owner() {
    // With quorum 2, one vote each way is an exact tie; the mechanism
    // requires a strict user majority, so the tool owner prevails.
    let config = ArbitrationConfig {
        min_votes_required: 2,
        ..Default::default()
    };
    let (svc, resolver) = service_with(config);
    let [x, y, _] = three_arbitrators(&svc);
    let case = svc.create_case(&escalated("disp_b", "80"), t0()).unwrap();

    svc.cast_vote(case.id, &x, true, None, t0()).unwrap();
    svc.cast_vote(case.id, &y, false, None, t0()).unwrap();

    let decided = svc.case(&case.id).unwrap();
    assert_eq!(decided.winning_side, Some(WinningSide::ToolOwner));
    assert_eq!(decided.outcome, Some(DisputeOutcome::NoRefund));

    let (_, outcome, refund) = resolver.last.lock().clone().unwrap();
    assert_eq!(outcome, DisputeOutcome::NoRefund);
    assert_eq!(refund, None);

    // The tie's user-side voter is on the losing side and is slashed.
    assert_eq!(svc.arbitrator(&x).unwrap().staked_amount, amt("90"));
    assert_eq!(svc.arbitrator(&y).unwrap().rewards_earned, amt("8"));
}

#[test]
fn sub_quorum_case_expires_without_economic_effect() {
    let (svc, resolver) = service_with(ArbitrationConfig::default());
    let [x, _, _] = three_arbitrators(&svc);
    let case = svc.create_case(&escalated("disp_c", "40"), t0()).unwrap();

    svc.cast_vote(case.id, &x, true, None, t0()).unwrap();

    let sweep_at = t0().checked_add(Duration::days(4)).unwrap();
    assert_eq!(svc.process_expired_cases(sweep_at), 1);

    let expired = svc.case(&case.id).unwrap();
    assert_eq!(expired.state, CaseState::Expired);
    assert!(expired.outcome.is_none());
    assert!(expired.winning_side.is_none());

    // The lone vote is economically inert.
    let rec = svc.arbitrator(&x).unwrap();
    assert_eq!(rec.staked_amount, amt("100"));
    assert_eq!(rec.cases_participated, 0);
    assert_eq!(rec.rewards_earned, Amount::ZERO);
    assert_eq!(svc.pending_rewards(&x), Amount::ZERO);
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn withdrawal_blocked_while_vote_is_open_then_allowed() {
    let (svc, _) = service_with(ArbitrationConfig::default());
    let [x, y, z] = three_arbitrators(&svc);
    let case = svc.create_case(&escalated("disp_d", "120"), t0()).unwrap();

    svc.cast_vote(case.id, &x, true, None, t0()).unwrap();
    let err = svc.withdraw_stake(&x, amt("20")).unwrap_err();
    assert!(matches!(err, ArbitrationError::ActiveVoteConflict(_)));

    svc.cast_vote(case.id, &y, true, None, t0()).unwrap();
    svc.cast_vote(case.id, &z, false, None, t0()).unwrap();
    assert_eq!(svc.case(&case.id).unwrap().state, CaseState::Decided);

    // The same withdrawal now succeeds; dropping to 80 deactivates.
    let rec = svc.withdraw_stake(&x, amt("20")).unwrap();
    assert_eq!(rec.staked_amount, amt("80"));
    assert!(!rec.active);
}

#[test]
fn second_vote_by_same_arbitrator_always_fails() {
    let (svc, _) = service_with(ArbitrationConfig::default());
    let [x, _, _] = three_arbitrators(&svc);
    let case = svc.create_case(&escalated("disp_e", "60"), t0()).unwrap();

    svc.cast_vote(case.id, &x, true, None, t0()).unwrap();
    for flip in [true, false] {
        let err = svc.cast_vote(case.id, &x, flip, None, t0()).unwrap_err();
        assert!(matches!(err, ArbitrationError::DuplicateVote { .. }));
    }
    assert_eq!(svc.case(&case.id).unwrap().votes.len(), 1);
}

#[test]
fn decision_never_fires_below_quorum() {
    let (svc, resolver) = service_with(ArbitrationConfig::default());
    let [x, y, _] = three_arbitrators(&svc);
    let case = svc.create_case(&escalated("disp_f", "60"), t0()).unwrap();

    svc.cast_vote(case.id, &x, true, None, t0()).unwrap();
    svc.cast_vote(case.id, &y, true, None, t0()).unwrap();

    assert_eq!(svc.case(&case.id).unwrap().state, CaseState::Voting);
    let err = svc.decide_case(case.id, t0()).unwrap_err();
    assert!(matches!(err, ArbitrationError::QuorumNotMet { .. }));
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn slashed_out_arbitrator_reregisters_with_history() {
    // Run an arbitrator through two losing cases until deactivation,
    // then re-register and verify the scorecard carried over.
    let config = ArbitrationConfig {
        min_arbitrator_stake: amt("15"),
        ..Default::default()
    };
    let (svc, _) = service_with(config);
    let [x, y, z] = three_arbitrators(&svc);

    for (i, dispute) in ["disp_1", "disp_2"].iter().enumerate() {
        let case = svc.create_case(&escalated(dispute, "30"), t0()).unwrap();
        svc.cast_vote(case.id, &x, true, None, t0()).unwrap();
        svc.cast_vote(case.id, &y, true, None, t0()).unwrap();
        svc.cast_vote(case.id, &z, false, None, t0()).unwrap();
        assert_eq!(svc.arbitrator(&z).unwrap().cases_participated, (i + 1) as u64);
    }

    // 100 - 10 - 10 = 80, still above a 15 minimum; drain the rest.
    svc.withdraw_stake(&z, amt("70")).unwrap();
    let lapsed = svc.arbitrator(&z).unwrap();
    assert!(!lapsed.active);
    assert_eq!(lapsed.penalties_incurred, amt("20"));

    let back = svc.register_arbitrator(&z, amt("50"), t0()).unwrap();
    assert!(back.active);
    assert_eq!(back.staked_amount, amt("50"));
    assert_eq!(back.cases_participated, 2);
    assert_eq!(back.cases_won, 0);
    assert_eq!(back.penalties_incurred, amt("20"));
}

#[test]
fn leaderboard_reflects_decided_cases() {
    // Five decided cases: X votes with the user every time, Z against.
    // The user wins each 2-1, so X ends at 100% and Z at 0%.
    let config = ArbitrationConfig {
        min_arbitrator_stake: amt("10"),
        ..Default::default()
    };
    let (svc, _) = service_with(config);
    let [x, y, z] = three_arbitrators(&svc);

    for i in 0..5 {
        let case = svc
            .create_case(&escalated(&format!("disp_{i}"), "30"), t0())
            .unwrap();
        svc.cast_vote(case.id, &x, true, None, t0()).unwrap();
        svc.cast_vote(case.id, &y, true, None, t0()).unwrap();
        svc.cast_vote(case.id, &z, false, None, t0()).unwrap();
    }

    let board = svc.leaderboard(10);
    assert_eq!(board.len(), 3);
    assert_eq!(board[0].address, x.min(y.clone()));
    assert_eq!(board[0].win_rate_bps, 10_000);
    assert_eq!(board[2].address, z);
    assert_eq!(board[2].win_rate_bps, 0);

    let stats = svc.stats();
    assert_eq!(stats.total_cases, 5);
    assert_eq!(stats.decided_cases, 5);
    assert_eq!(stats.user_win_rate, 100.0);
    assert_eq!(stats.avg_votes_per_case, 3.0);
}

#[test]
fn rewards_accumulate_across_cases_until_claimed() {
    let (svc, _) = service_with(ArbitrationConfig::default());
    let [x, y, z] = three_arbitrators(&svc);

    for dispute in ["disp_1", "disp_2"] {
        let case = svc.create_case(&escalated(dispute, "30"), t0()).unwrap();
        svc.cast_vote(case.id, &x, true, None, t0()).unwrap();
        svc.cast_vote(case.id, &y, true, None, t0()).unwrap();
        svc.cast_vote(case.id, &z, false, None, t0()).unwrap();
        // Z keeps re-registering to stay votable after each slash.
        if svc.arbitrator(&z).map(|a| !a.active).unwrap_or(false) {
            svc.register_arbitrator(&z, amt("100"), t0()).unwrap();
        }
    }

    // Two wins at 4 each, claimed in one sweep.
    assert_eq!(svc.pending_rewards(&x), amt("8"));
    assert_eq!(svc.claim_rewards(&x).unwrap(), amt("8"));
    assert!(matches!(
        svc.claim_rewards(&x).unwrap_err(),
        ArbitrationError::NoPendingRewards(_)
    ));
    // The cumulative ledger survives the claim.
    assert_eq!(svc.arbitrator(&x).unwrap().rewards_earned, amt("8"));
}
