//! # Voting Engine
//!
//! Validates and records votes, enforcing exactly-once voting per
//! `(case, arbitrator)` pair, then runs the case's transition check.
//! Voting is eager: the moment the vote count reaches quorum the case is
//! decided, without waiting for the voting window to close.

use tracing::info;

use tribunal_core::{ArbitratorAddress, CaseId, Timestamp, VoteId};

use crate::case::{ArbitrationVote, CaseState};
use crate::error::ArbitrationError;
use crate::service::ArbitrationService;

impl ArbitrationService {
    /// Cast a vote on an open case.
    ///
    /// Validation order: case existence and votability, then the voting
    /// deadline, then the voter's registration and activity, then the
    /// duplicate check, then the stake check against the per-vote stake
    /// (an arbitrator can be active yet unable to afford this vote).
    ///
    /// On success the vote is recorded and the quorum transition runs
    /// synchronously — the returned vote may therefore belong to an
    /// already-decided case.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::CaseNotFound`] / [`CaseNotVotable`](ArbitrationError::CaseNotVotable) /
    /// [`VotingDeadlinePassed`](ArbitrationError::VotingDeadlinePassed) /
    /// [`NotRegisteredOrInactive`](ArbitrationError::NotRegisteredOrInactive) /
    /// [`DuplicateVote`](ArbitrationError::DuplicateVote) /
    /// [`InsufficientStake`](ArbitrationError::InsufficientStake).
    pub fn cast_vote(
        &self,
        case_id: CaseId,
        address: &ArbitratorAddress,
        vote_for_user: bool,
        reasoning: Option<String>,
        now: Timestamp,
    ) -> Result<ArbitrationVote, ArbitrationError> {
        let op_lock = self.store.case_op_lock(case_id);
        let _serialized = op_lock.lock();

        let vote = {
            // Lock order: cases (write) before arbitrators (read).
            let mut cases = self.store.cases.write();
            let arbitrators = self.store.arbitrators.read();

            let case = cases
                .get_mut(&case_id)
                .ok_or(ArbitrationError::CaseNotFound(case_id))?;

            if case.state != CaseState::Voting {
                return Err(ArbitrationError::CaseNotVotable {
                    case_id,
                    state: case.state,
                });
            }
            if case.past_deadline(now) {
                return Err(ArbitrationError::VotingDeadlinePassed {
                    case_id,
                    deadline: case.voting_deadline,
                });
            }

            let arbitrator = arbitrators
                .get(address)
                .filter(|a| a.active)
                .ok_or_else(|| ArbitrationError::NotRegisteredOrInactive(address.clone()))?;

            if case.has_voted(address) {
                return Err(ArbitrationError::DuplicateVote {
                    address: address.clone(),
                    case_id,
                });
            }
            if arbitrator.staked_amount < case.required_stake {
                return Err(ArbitrationError::InsufficientStake {
                    offered: arbitrator.staked_amount,
                    required: case.required_stake,
                });
            }

            let vote = ArbitrationVote {
                id: VoteId::new(),
                case_id,
                arbitrator: address.clone(),
                vote_for_user,
                stake_amount: case.required_stake,
                voted_at: now,
                reasoning,
            };
            case.push_vote(vote.clone());
            vote
        };

        info!(
            case_id = %case_id,
            address = %address,
            vote_for_user,
            "vote cast"
        );

        // Quorum check; the operation lock is still held, so the eager
        // decision cannot interleave with another operation on this case.
        self.advance_case_locked(case_id, now);

        Ok(vote)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
