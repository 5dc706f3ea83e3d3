//! # Arbitrator Records
//!
//! The per-participant record of the registry: current stake, activity
//! flag, and the historical scorecard (cases, wins, cumulative rewards
//! and penalties). Records are never deleted — a deactivated arbitrator
//! keeps their history, and re-registration resumes it.
//!
//! ## Invariant
//!
//! `active == true` implies `staked_amount >= min_arbitrator_stake`. The
//! registry and the settlement engine re-check activity after every stake
//! mutation, so the invariant can only be violated inside a single
//! mutation, never between calls.

use serde::{Deserialize, Serialize};

use tribunal_core::{Amount, ArbitratorAddress, Timestamp};

/// Basis points per whole percent, used for the stored win rate.
const BPS_PER_PERCENT: u64 = 100;

/// A registered arbitration participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arbitrator {
    /// Participant address (immutable identity key).
    pub address: ArbitratorAddress,
    /// Capital currently at stake.
    pub staked_amount: Amount,
    /// Decided cases this arbitrator voted in.
    pub cases_participated: u64,
    /// Decided cases where this arbitrator voted with the winning side.
    pub cases_won: u64,
    /// Win rate in basis points (`cases_won / cases_participated`),
    /// stored as an integer so ordering is total and deterministic.
    pub win_rate_bps: u64,
    /// Cumulative rewards earned across all decided cases.
    pub rewards_earned: Amount,
    /// Cumulative penalties incurred across all decided cases.
    pub penalties_incurred: Amount,
    /// Whether the arbitrator may currently vote.
    pub active: bool,
    /// First registration time; preserved across re-registration.
    pub registered_at: Timestamp,
}

impl Arbitrator {
    /// Create a fresh registration.
    pub fn new(address: ArbitratorAddress, stake: Amount, now: Timestamp) -> Self {
        Self {
            address,
            staked_amount: stake,
            cases_participated: 0,
            cases_won: 0,
            win_rate_bps: 0,
            rewards_earned: Amount::ZERO,
            penalties_incurred: Amount::ZERO,
            active: true,
            registered_at: now,
        }
    }

    /// Reactivate a lapsed registration with a new stake.
    ///
    /// The scorecard and `registered_at` carry over; only the stake and
    /// activity flag reset.
    pub fn reregister(&mut self, stake: Amount) {
        self.staked_amount = stake;
        self.active = true;
    }

    /// Record a winning vote: bump the scorecard and credit the reward.
    pub fn record_win(&mut self, reward: Amount) {
        self.cases_participated += 1;
        self.cases_won += 1;
        self.recompute_win_rate();
        self.rewards_earned = self
            .rewards_earned
            .checked_add(reward)
            .unwrap_or(self.rewards_earned);
    }

    /// Record a losing vote: bump the scorecard, slash the stake (floored
    /// at zero), and deactivate if the remainder falls below `min_stake`.
    pub fn record_loss(&mut self, penalty: Amount, min_stake: Amount) {
        self.cases_participated += 1;
        self.recompute_win_rate();
        self.penalties_incurred = self
            .penalties_incurred
            .checked_add(penalty)
            .unwrap_or(self.penalties_incurred);
        self.staked_amount = self.staked_amount.saturating_sub(penalty);
        if self.staked_amount < min_stake {
            self.active = false;
        }
    }

    /// Win rate as a percentage, for display surfaces.
    pub fn win_rate_percent(&self) -> f64 {
        self.win_rate_bps as f64 / BPS_PER_PERCENT as f64
    }

    fn recompute_win_rate(&mut self) {
        self.win_rate_bps = if self.cases_participated == 0 {
            0
        } else {
            self.cases_won * 100 * BPS_PER_PERCENT / self.cases_participated
        };
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
