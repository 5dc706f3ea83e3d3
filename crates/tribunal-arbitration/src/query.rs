//! # Query & Stats Surface
//!
//! Read-only views over the store: case and arbitrator lookups, the
//! leaderboard, per-arbitrator case history, and aggregate statistics.
//! Everything here returns snapshots; nothing mutates.

use serde::{Deserialize, Serialize};

use tribunal_core::{Amount, ArbitratorAddress, CaseId, DisputeId};

use crate::arbitrator::Arbitrator;
use crate::case::{ArbitrationCase, CaseState, WinningSide};
use crate::service::ArbitrationService;

/// Decided-case participation needed to appear on the leaderboard.
const LEADERBOARD_MIN_CASES: u64 = 5;

/// Aggregate statistics over the whole mechanism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrationStats {
    /// Cases ever created.
    pub total_cases: usize,
    /// Cases currently open for voting.
    pub active_cases: usize,
    /// Cases decided by quorum.
    pub decided_cases: usize,
    /// Cases expired below quorum.
    pub expired_cases: usize,
    /// Arbitrators ever registered.
    pub total_arbitrators: usize,
    /// Arbitrators currently eligible to vote.
    pub active_arbitrators: usize,
    /// Mean votes per case, over all cases.
    pub avg_votes_per_case: f64,
    /// Share of decided cases won by the user side, in percent.
    pub user_win_rate: f64,
}

impl ArbitrationService {
    /// Snapshot of a case by id.
    pub fn case(&self, case_id: &CaseId) -> Option<ArbitrationCase> {
        self.store.case(case_id)
    }

    /// Snapshot of the case created for a dispute, if any.
    pub fn case_by_dispute(&self, dispute_id: &DisputeId) -> Option<ArbitrationCase> {
        self.store.case_by_dispute(dispute_id)
    }

    /// All cases currently open for voting, oldest first.
    pub fn active_cases(&self) -> Vec<ArbitrationCase> {
        let mut cases: Vec<_> = self
            .store
            .cases
            .read()
            .values()
            .filter(|c| c.state == CaseState::Voting)
            .cloned()
            .collect();
        cases.sort_by_key(|c| c.created_at);
        cases
    }

    /// Every case this arbitrator voted in, newest first.
    pub fn arbitrator_cases(&self, address: &ArbitratorAddress) -> Vec<ArbitrationCase> {
        let mut cases: Vec<_> = self
            .store
            .cases
            .read()
            .values()
            .filter(|c| c.has_voted(address))
            .cloned()
            .collect();
        cases.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        cases
    }

    /// Snapshot of an arbitrator record by address.
    pub fn arbitrator(&self, address: &ArbitratorAddress) -> Option<Arbitrator> {
        self.store.arbitrator(address)
    }

    /// All arbitrators currently eligible to vote, by address.
    pub fn active_arbitrators(&self) -> Vec<Arbitrator> {
        let mut arbitrators: Vec<_> = self
            .store
            .arbitrators
            .read()
            .values()
            .filter(|a| a.active)
            .cloned()
            .collect();
        arbitrators.sort_by(|a, b| a.address.cmp(&b.address));
        arbitrators
    }

    /// Unclaimed rewards for an address (zero when none).
    pub fn pending_rewards(&self, address: &ArbitratorAddress) -> Amount {
        self.store.pending_rewards(address)
    }

    /// The top arbitrators by track record.
    ///
    /// Only arbitrators with at least five decided cases qualify; ordering
    /// is win rate, then participation, then address as the total-order
    /// tiebreaker.
    pub fn leaderboard(&self, limit: usize) -> Vec<Arbitrator> {
        let mut ranked: Vec<_> = self
            .store
            .arbitrators
            .read()
            .values()
            .filter(|a| a.cases_participated >= LEADERBOARD_MIN_CASES)
            .cloned()
            .collect();
        ranked.sort_by(|a, b| {
            b.win_rate_bps
                .cmp(&a.win_rate_bps)
                .then(b.cases_participated.cmp(&a.cases_participated))
                .then(a.address.cmp(&b.address))
        });
        ranked.truncate(limit);
        ranked
    }

    /// Aggregate statistics over all cases and arbitrators.
    pub fn stats(&self) -> ArbitrationStats {
        let cases = self.store.cases.read();
        let arbitrators = self.store.arbitrators.read();

        let total_cases = cases.len();
        let mut active_cases = 0;
        let mut decided_cases = 0;
        let mut expired_cases = 0;
        let mut total_votes = 0usize;
        let mut user_wins = 0usize;
        for case in cases.values() {
            total_votes += case.votes.len();
            match case.state {
                CaseState::Voting => active_cases += 1,
                CaseState::Decided => {
                    decided_cases += 1;
                    if case.winning_side == Some(WinningSide::User) {
                        user_wins += 1;
                    }
                }
                CaseState::Expired => expired_cases += 1,
            }
        }

        let avg_votes_per_case = if total_cases == 0 {
            0.0
        } else {
            total_votes as f64 / total_cases as f64
        };
        let user_win_rate = if decided_cases == 0 {
            0.0
        } else {
            user_wins as f64 / decided_cases as f64 * 100.0
        };

        ArbitrationStats {
            total_cases,
            active_cases,
            decided_cases,
            expired_cases,
            total_arbitrators: arbitrators.len(),
            active_arbitrators: arbitrators.values().filter(|a| a.active).count(),
            avg_votes_per_case,
            user_win_rate,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
