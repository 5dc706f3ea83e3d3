//! # Outcome & Settlement Engine
//!
//! Owns every stake and reward mutation that follows from a decided case.
//! A decision runs in four phases under the case's operation lock:
//!
//! 1. validate and tally (data locks held briefly);
//! 2. settle — slash losing stakes, credit winner rewards, update
//!    scorecards, all in one pass;
//! 3. notify the dispute collaborator (no data locks held);
//! 4. record the case as decided.
//!
//! The collaborator callback is best-effort: the tally and the stake
//! mutations are this mechanism's own source of truth and survive a
//! failed callback. Reconciliation of the external dispute happens
//! out-of-band.
//!
//! Expiry is the fallback path for cases whose window closes below
//! quorum; it carries no economic effect. A case that reached quorum by
//! its deadline is decided, never expired.

use tracing::{error, info, warn};

use tribunal_core::{Amount, ArbitratorAddress, CaseId, Timestamp};

use crate::case::{ArbitrationCase, CaseState, WinningSide};
use crate::dispute::DisputeOutcome;
use crate::error::ArbitrationError;
use crate::service::ArbitrationService;

impl ArbitrationService {
    /// Decide a case that has reached quorum.
    ///
    /// Tallies the votes, applies the reward/penalty distribution, and
    /// notifies the dispute collaborator. An exact tie resolves for the
    /// tool owner (see [`VoteTally::winning_side`](crate::case::VoteTally::winning_side)).
    ///
    /// # Errors
    ///
    /// - [`ArbitrationError::CaseNotFound`] for an unknown case.
    /// - [`ArbitrationError::CaseNotVotable`] outside the voting state.
    /// - [`ArbitrationError::QuorumNotMet`] below quorum.
    pub fn decide_case(
        &self,
        case_id: CaseId,
        now: Timestamp,
    ) -> Result<ArbitrationCase, ArbitrationError> {
        let op_lock = self.store.case_op_lock(case_id);
        let _serialized = op_lock.lock();
        self.decide_case_locked(case_id, now)
    }

    /// Expire a case whose voting window has closed.
    ///
    /// Expiry is a fallback, not a cutoff: a case that reached quorum by
    /// the deadline is decided through the normal path instead. A
    /// sub-quorum expiry has no economic effect — the votes cast are
    /// inert and no stake moves.
    ///
    /// # Errors
    ///
    /// - [`ArbitrationError::CaseNotFound`] for an unknown case.
    /// - [`ArbitrationError::CaseNotVotable`] outside the voting state.
    /// - [`ArbitrationError::DeadlineNotReached`] before the deadline.
    pub fn expire_case(
        &self,
        case_id: CaseId,
        now: Timestamp,
    ) -> Result<ArbitrationCase, ArbitrationError> {
        let op_lock = self.store.case_op_lock(case_id);
        let _serialized = op_lock.lock();

        let quorum_reached = {
            let cases = self.store.cases.read();
            let case = cases
                .get(&case_id)
                .ok_or(ArbitrationError::CaseNotFound(case_id))?;

            if case.state != CaseState::Voting {
                return Err(ArbitrationError::CaseNotVotable {
                    case_id,
                    state: case.state,
                });
            }
            if !case.past_deadline(now) {
                return Err(ArbitrationError::DeadlineNotReached {
                    case_id,
                    deadline: case.voting_deadline,
                });
            }
            case.quorum_reached()
        };

        if quorum_reached {
            return self.decide_case_locked(case_id, now);
        }

        let expired = {
            let mut cases = self.store.cases.write();
            let case = cases
                .get_mut(&case_id)
                .ok_or(ArbitrationError::CaseNotFound(case_id))?;
            case.mark_expired(now);
            case.clone()
        };

        info!(
            case_id = %case_id,
            votes = expired.votes.len(),
            required = expired.min_votes_required,
            "case expired below quorum"
        );
        Ok(expired)
    }

    /// Sweep all open cases past their deadline, deciding or expiring
    /// each. Returns the number of cases resolved.
    ///
    /// Each case is processed under its own operation lock, so the sweep
    /// serializes against concurrent votes and a case can never be
    /// decided twice. One case failing does not stop the sweep.
    pub fn process_expired_cases(&self, now: Timestamp) -> usize {
        let due: Vec<CaseId> = self
            .store
            .cases
            .read()
            .values()
            .filter(|c| c.state == CaseState::Voting && c.past_deadline(now))
            .map(|c| c.id)
            .collect();

        let mut processed = 0;
        for case_id in due {
            match self.expire_case(case_id, now) {
                Ok(_) => processed += 1,
                // A vote racing the scan may already have decided the
                // case; it no longer needs the sweep.
                Err(err) => {
                    warn!(case_id = %case_id, error = %err, "expiry sweep skipped case");
                }
            }
        }
        processed
    }

    /// Claim all pending rewards for an address, zeroing the ledger.
    ///
    /// The returned amount is what the caller is owed; moving actual
    /// tokens is the payment collaborator's concern.
    ///
    /// # Errors
    ///
    /// - [`ArbitrationError::NoPendingRewards`] when the ledger is empty.
    pub fn claim_rewards(
        &self,
        address: &ArbitratorAddress,
    ) -> Result<Amount, ArbitrationError> {
        let claimed = self
            .store
            .pending_rewards
            .write()
            .remove(address)
            .filter(|a| !a.is_zero())
            .ok_or_else(|| ArbitrationError::NoPendingRewards(address.clone()))?;

        info!(address = %address, amount = %claimed, "pending rewards claimed");
        Ok(claimed)
    }

    /// The transition check run after every case mutation. Decides the
    /// case when the vote count has reached quorum; otherwise a no-op.
    ///
    /// Caller must hold the case's operation lock. Eager decisions enter
    /// here; deadline-driven ones enter through
    /// [`expire_case`](Self::expire_case). Both paths converge on the
    /// same decision function, so a case settles by identical arithmetic
    /// either way.
    pub(crate) fn advance_case_locked(&self, case_id: CaseId, now: Timestamp) {
        let ready = self
            .store
            .cases
            .read()
            .get(&case_id)
            .is_some_and(|c| c.state == CaseState::Voting && c.quorum_reached());
        if !ready {
            return;
        }
        if let Err(err) = self.decide_case_locked(case_id, now) {
            error!(case_id = %case_id, error = %err, "quorum transition failed");
        }
    }

    /// The decision path proper. Caller must hold the case's operation
    /// lock; data locks are taken per phase and never held across the
    /// collaborator callback.
    fn decide_case_locked(
        &self,
        case_id: CaseId,
        now: Timestamp,
    ) -> Result<ArbitrationCase, ArbitrationError> {
        // Phase 1: validate and tally.
        let (dispute_id, payment_amount, votes, tally) = {
            let cases = self.store.cases.read();
            let case = cases
                .get(&case_id)
                .ok_or(ArbitrationError::CaseNotFound(case_id))?;

            if case.state != CaseState::Voting {
                return Err(ArbitrationError::CaseNotVotable {
                    case_id,
                    state: case.state,
                });
            }
            if !case.quorum_reached() {
                return Err(ArbitrationError::QuorumNotMet {
                    case_id,
                    votes: case.votes.len(),
                    required: case.min_votes_required,
                });
            }
            (
                case.dispute_id.clone(),
                case.payment_amount,
                case.votes.clone(),
                case.tally(),
            )
        };

        let side = tally.winning_side();
        let outcome = side.outcome();
        let user_won = side == WinningSide::User;
        let (winners, losers): (Vec<_>, Vec<_>) =
            votes.iter().partition(|v| v.vote_for_user == user_won);

        let losing_stake_total = Amount::checked_sum(losers.iter().map(|v| v.stake_amount))
            .ok_or(ArbitrationError::AmountOverflow)?;
        let reward_pool = losing_stake_total.percent(self.config.winner_reward_percent);
        let reward_per_winner = reward_pool.split_evenly(winners.len());

        // Phase 2: settle every voter in one pass. Lock order: arbitrators
        // before pending_rewards.
        {
            let mut arbitrators = self.store.arbitrators.write();
            let mut pending = self.store.pending_rewards.write();

            for vote in &winners {
                if let Some(arb) = arbitrators.get_mut(&vote.arbitrator) {
                    arb.record_win(reward_per_winner);
                }
                if !reward_per_winner.is_zero() {
                    let ledger = pending.entry(vote.arbitrator.clone()).or_insert(Amount::ZERO);
                    *ledger = ledger.checked_add(reward_per_winner).unwrap_or(*ledger);
                }
            }
            for vote in &losers {
                if let Some(arb) = arbitrators.get_mut(&vote.arbitrator) {
                    arb.record_loss(vote.stake_amount, self.config.min_arbitrator_stake);
                }
            }
        }

        // Phase 3: notify the collaborator. A failure is logged and
        // reconciled out-of-band; the tally and stake mutations above are
        // authoritative and never roll back.
        let refund_amount = match outcome {
            DisputeOutcome::FullRefund => Some(payment_amount),
            DisputeOutcome::NoRefund => None,
        };
        let rationale = format!(
            "arbitration ruled for the {side}: {} vote(s) for the user, {} for the tool owner",
            tally.for_user, tally.for_tool_owner
        );
        if let Err(err) = self
            .resolver
            .resolve_dispute(&dispute_id, outcome, refund_amount, &rationale)
        {
            error!(
                case_id = %case_id,
                dispute_id = %dispute_id,
                error = %err,
                "dispute finalization callback failed; case decided locally, reconciliation deferred"
            );
        }

        // Phase 4: record the decision.
        let decided = {
            let mut cases = self.store.cases.write();
            let case = cases
                .get_mut(&case_id)
                .ok_or(ArbitrationError::CaseNotFound(case_id))?;
            case.mark_decided(side, now);
            case.clone()
        };

        info!(
            case_id = %case_id,
            dispute_id = %dispute_id,
            winning_side = %side,
            outcome = %outcome,
            votes_for_user = tally.for_user,
            votes_for_tool_owner = tally.for_tool_owner,
            losing_stake_total = %losing_stake_total,
            reward_per_winner = %reward_per_winner,
            "case decided"
        );
        Ok(decided)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
