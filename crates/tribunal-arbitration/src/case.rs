//! # Arbitration Case State Machine
//!
//! One case per escalated dispute, with the lifecycle
//!
//! ```text
//! VOTING ──quorum reached──▶ DECIDED
//!    │
//!    └──deadline, sub-quorum──▶ EXPIRED
//! ```
//!
//! Both terminal states are final. Votes are append-only while the case
//! is in `VOTING`; the tally rules live here so the voting engine and the
//! expiry sweep decide cases through the identical arithmetic.

use serde::{Deserialize, Serialize};

use tribunal_core::{Amount, ArbitratorAddress, CaseId, DisputeId, Timestamp, VoteId};

use crate::dispute::DisputeOutcome;

/// The lifecycle state of an arbitration case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseState {
    /// Votes are being collected.
    Voting,
    /// Quorum was reached and the case was settled (terminal).
    Decided,
    /// The deadline passed below quorum; no economic effect (terminal).
    Expired,
}

impl CaseState {
    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Decided | Self::Expired)
    }
}

impl std::fmt::Display for CaseState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Voting => "VOTING",
            Self::Decided => "DECIDED",
            Self::Expired => "EXPIRED",
        };
        f.write_str(s)
    }
}

/// The side a decided case ruled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinningSide {
    /// The disputing user.
    User,
    /// The tool owner.
    ToolOwner,
}

impl WinningSide {
    /// The dispute outcome this side's victory imposes.
    pub fn outcome(&self) -> DisputeOutcome {
        match self {
            Self::User => DisputeOutcome::FullRefund,
            Self::ToolOwner => DisputeOutcome::NoRefund,
        }
    }
}

impl std::fmt::Display for WinningSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::User => "user",
            Self::ToolOwner => "tool_owner",
        };
        f.write_str(s)
    }
}

/// One arbitrator's vote on one case. Immutable once cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrationVote {
    /// Unique vote identifier.
    pub id: VoteId,
    /// The case voted on.
    pub case_id: CaseId,
    /// The voter.
    pub arbitrator: ArbitratorAddress,
    /// `true` sides with the user, `false` with the tool owner.
    pub vote_for_user: bool,
    /// Stake put at risk by this vote.
    pub stake_amount: Amount,
    /// When the vote was cast.
    pub voted_at: Timestamp,
    /// Optional free-form justification.
    pub reasoning: Option<String>,
}

/// Vote counts for a case, split by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTally {
    /// Votes siding with the user.
    pub for_user: usize,
    /// Votes siding with the tool owner.
    pub for_tool_owner: usize,
}

impl VoteTally {
    /// Count votes by side.
    pub fn count(votes: &[ArbitrationVote]) -> Self {
        let for_user = votes.iter().filter(|v| v.vote_for_user).count();
        Self {
            for_user,
            for_tool_owner: votes.len() - for_user,
        }
    }

    /// Total votes cast.
    pub fn total(&self) -> usize {
        self.for_user + self.for_tool_owner
    }

    /// The winning side under the mechanism's tie-break rule.
    ///
    /// The user side must hold a strict majority; an exact tie resolves
    /// for the tool owner. This asymmetry is deliberate — the burden of
    /// proof sits with the party demanding the refund — and changing it
    /// (re-vote, split settlement) would be a policy change, not a fix.
    pub fn winning_side(&self) -> WinningSide {
        if self.for_user > self.for_tool_owner {
            WinningSide::User
        } else {
            WinningSide::ToolOwner
        }
    }
}

/// The voting instance created for one escalated dispute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrationCase {
    /// Unique case identifier.
    pub id: CaseId,
    /// The underlying dispute (1:1; enforced by the store's index).
    pub dispute_id: DisputeId,
    /// The disputed payment, captured at creation to size a full refund.
    pub payment_amount: Amount,
    /// When the case was opened.
    pub created_at: Timestamp,
    /// End of the voting window.
    pub voting_deadline: Timestamp,
    /// Stake each vote puts at risk (from config at creation).
    pub required_stake: Amount,
    /// Quorum for a decision (from config at creation).
    pub min_votes_required: usize,
    /// Votes cast so far; append-only while `Voting`.
    pub votes: Vec<ArbitrationVote>,
    /// Lifecycle state.
    pub state: CaseState,
    /// Outcome, set on transition to `Decided`.
    pub outcome: Option<DisputeOutcome>,
    /// Winning side, set on transition to `Decided`.
    pub winning_side: Option<WinningSide>,
    /// When the case reached a terminal state.
    pub resolved_at: Option<Timestamp>,
}

impl ArbitrationCase {
    /// Open a new case for a dispute.
    pub fn new(
        dispute_id: DisputeId,
        payment_amount: Amount,
        required_stake: Amount,
        min_votes_required: usize,
        created_at: Timestamp,
        voting_deadline: Timestamp,
    ) -> Self {
        Self {
            id: CaseId::new(),
            dispute_id,
            payment_amount,
            created_at,
            voting_deadline,
            required_stake,
            min_votes_required,
            votes: Vec::new(),
            state: CaseState::Voting,
            outcome: None,
            winning_side: None,
            resolved_at: None,
        }
    }

    /// Whether this arbitrator has already voted.
    pub fn has_voted(&self, address: &ArbitratorAddress) -> bool {
        self.votes.iter().any(|v| &v.arbitrator == address)
    }

    /// Whether the vote count has reached quorum.
    pub fn quorum_reached(&self) -> bool {
        self.votes.len() >= self.min_votes_required
    }

    /// Whether the voting window has closed at `now`.
    pub fn past_deadline(&self, now: Timestamp) -> bool {
        now > self.voting_deadline
    }

    /// Current tally.
    pub fn tally(&self) -> VoteTally {
        VoteTally::count(&self.votes)
    }

    /// Append a vote. The caller (the voting engine) has already run the
    /// validation chain; this only guards the append-only rule.
    pub(crate) fn push_vote(&mut self, vote: ArbitrationVote) {
        debug_assert_eq!(self.state, CaseState::Voting);
        self.votes.push(vote);
    }

    /// Transition to `Decided` with the settled outcome.
    pub(crate) fn mark_decided(&mut self, side: WinningSide, resolved_at: Timestamp) {
        self.state = CaseState::Decided;
        self.winning_side = Some(side);
        self.outcome = Some(side.outcome());
        self.resolved_at = Some(resolved_at);
    }

    /// Transition to `Expired`.
    pub(crate) fn mark_expired(&mut self, resolved_at: Timestamp) {
        self.state = CaseState::Expired;
        self.resolved_at = Some(resolved_at);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
