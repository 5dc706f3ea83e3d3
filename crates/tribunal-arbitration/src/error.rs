//! # Arbitration Error Types
//!
//! Every operational failure of the mechanism is a typed variant here,
//! split into two categories:
//!
//! - **Validation** — the caller supplied something wrong. Surfaced
//!   immediately; retrying the identical call will fail identically.
//! - **State** — the call was well-formed but mistimed. The caller may
//!   retry once the described condition changes (a case decides, a
//!   deadline passes, a stake is topped up).
//!
//! Collaborator failures ([`ResolverError`](crate::dispute::ResolverError))
//! are deliberately absent: the dispute-finalization callback is
//! best-effort, its failures are logged and reconciled out-of-band, and
//! they never surface through this enum nor roll back local state.

use thiserror::Error;

use tribunal_core::{Amount, ArbitratorAddress, CaseId, DisputeId, Timestamp};

use crate::case::CaseState;

/// How an error should be handled by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Caller mistake; never retried automatically.
    Validation,
    /// Timing/sequencing conflict; retry after the condition changes.
    State,
}

/// Operational errors of the arbitration mechanism.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArbitrationError {
    /// A stake was below the required threshold.
    #[error("stake {offered} is below the required {required}")]
    InsufficientStake {
        /// The stake the caller offered (or holds).
        offered: Amount,
        /// The threshold that applies to this operation.
        required: Amount,
    },

    /// An active registration already exists for this address.
    #[error("arbitrator {0} is already registered and active")]
    AlreadyActive(ArbitratorAddress),

    /// No registration exists for this address.
    #[error("arbitrator {0} is not registered")]
    ArbitratorNotFound(ArbitratorAddress),

    /// The address is unknown or its registration is inactive.
    #[error("arbitrator {0} is not a registered active arbitrator")]
    NotRegisteredOrInactive(ArbitratorAddress),

    /// The arbitrator holds an undecided vote in an open case.
    #[error("arbitrator {0} has an undecided vote in an open case")]
    ActiveVoteConflict(ArbitratorAddress),

    /// No case exists with this identifier.
    #[error("arbitration case {0} not found")]
    CaseNotFound(CaseId),

    /// The case is not open for voting.
    #[error("case {case_id} is {state}, not open for voting")]
    CaseNotVotable {
        /// The case in question.
        case_id: CaseId,
        /// Its current state.
        state: CaseState,
    },

    /// The dispute has not been escalated to arbitration.
    #[error("dispute {0} is not escalated")]
    NotEscalated(DisputeId),

    /// A case already exists for this dispute.
    #[error("an arbitration case already exists for dispute {0}")]
    DuplicateCase(DisputeId),

    /// The voting window has closed.
    #[error("voting deadline {deadline} has passed for case {case_id}")]
    VotingDeadlinePassed {
        /// The case in question.
        case_id: CaseId,
        /// The deadline that has passed.
        deadline: Timestamp,
    },

    /// This arbitrator has already voted on this case.
    #[error("arbitrator {address} has already voted on case {case_id}")]
    DuplicateVote {
        /// The voter.
        address: ArbitratorAddress,
        /// The case in question.
        case_id: CaseId,
    },

    /// The case has fewer votes than the quorum requires.
    #[error("case {case_id} has {votes} of {required} required votes")]
    QuorumNotMet {
        /// The case in question.
        case_id: CaseId,
        /// Votes received so far.
        votes: usize,
        /// The configured quorum.
        required: usize,
    },

    /// The voting deadline has not been reached yet.
    #[error("case {case_id} deadline {deadline} has not been reached")]
    DeadlineNotReached {
        /// The case in question.
        case_id: CaseId,
        /// The pending deadline.
        deadline: Timestamp,
    },

    /// The pending-rewards ledger for this address is empty.
    #[error("no pending rewards for {0}")]
    NoPendingRewards(ArbitratorAddress),

    /// Stake arithmetic overflowed.
    #[error("stake arithmetic overflow")]
    AmountOverflow,
}

impl ArbitrationError {
    /// The handling category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InsufficientStake { .. }
            | Self::AlreadyActive(_)
            | Self::ArbitratorNotFound(_)
            | Self::NotRegisteredOrInactive(_)
            | Self::CaseNotFound(_)
            | Self::NotEscalated(_)
            | Self::DuplicateCase(_)
            | Self::DuplicateVote { .. }
            | Self::NoPendingRewards(_)
            | Self::AmountOverflow => ErrorCategory::Validation,

            Self::ActiveVoteConflict(_)
            | Self::CaseNotVotable { .. }
            | Self::VotingDeadlinePassed { .. }
            | Self::QuorumNotMet { .. }
            | Self::DeadlineNotReached { .. } => ErrorCategory::State,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
