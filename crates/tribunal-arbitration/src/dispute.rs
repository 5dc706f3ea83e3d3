//! # Dispute Collaborator Boundary
//!
//! The arbitration mechanism does not own disputes. An external
//! collaborator decides when a dispute escalates, holds the escrowed
//! payment, and moves tokens. This module defines the two halves of that
//! boundary:
//!
//! - **Inbound**: [`Dispute`] — the snapshot handed to
//!   [`ArbitrationService::create_case`](crate::ArbitrationService::create_case).
//!   Only a dispute in the [`DisputeState::Escalated`] state is arbitrable.
//!
//! - **Outbound**: [`DisputeResolver`] — the callback through which a
//!   decided case finalizes the underlying dispute. The call is
//!   best-effort: the tally and stake mutations are this mechanism's own
//!   source of truth and are never rolled back when the collaborator
//!   fails; reconciliation happens out-of-band.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tribunal_core::{Amount, DisputeId, Timestamp};

/// Lifecycle state of a dispute, as reported by the collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisputeState {
    /// Dispute is open between the two parties.
    Open,
    /// Dispute has been escalated to arbitration.
    Escalated,
    /// Dispute has been resolved (terminal on the collaborator's side).
    Resolved,
}

/// Escalation details recorded by the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Escalation {
    /// When the dispute was escalated.
    pub escalated_at: Timestamp,
    /// The collaborator's stated reason for escalation.
    pub reason: String,
}

/// Snapshot of a dispute at escalation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispute {
    /// Collaborator-owned identifier.
    pub id: DisputeId,
    /// Current state on the collaborator's side.
    pub state: DisputeState,
    /// The disputed payment, used to size a full refund.
    pub payment_amount: Amount,
    /// Escalation details, if recorded.
    pub escalation: Option<Escalation>,
}

/// The outcome a decided case imposes on the underlying dispute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisputeOutcome {
    /// The user prevailed; the disputed payment is refunded in full.
    FullRefund,
    /// The tool owner prevailed; no refund is issued.
    NoRefund,
}

impl std::fmt::Display for DisputeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::FullRefund => "full_refund",
            Self::NoRefund => "no_refund",
        };
        f.write_str(s)
    }
}

/// Failure reported by the dispute collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("dispute resolution callback failed: {message}")]
pub struct ResolverError {
    /// The collaborator's description of the failure.
    pub message: String,
}

impl ResolverError {
    /// Wrap a collaborator failure message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Outbound interface to the dispute collaborator.
///
/// Called exactly once per case, after the tally, when the case decides.
/// Implementations must bound their own execution time: the mechanism
/// invokes this without holding store locks, but a hung implementation
/// still stalls the deciding call.
pub trait DisputeResolver: Send + Sync {
    /// Finalize the underlying dispute with the arbitration outcome.
    fn resolve_dispute(
        &self,
        dispute_id: &DisputeId,
        outcome: DisputeOutcome,
        refund_amount: Option<Amount>,
        rationale: &str,
    ) -> Result<(), ResolverError>;
}

// ─── Tests ───────────────────────────────────────────────────────────
