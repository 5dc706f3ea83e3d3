//! # Arbitration Service
//!
//! The single logical authority over arbitration state. Constructed
//! explicitly from configuration, an injected store, and the dispute
//! collaborator — there is no module-level singleton, so one process can
//! run independently configured instances side by side.
//!
//! The service's operations are grouped by concern across the sibling
//! modules: `registry` (stake lifecycle), `voting` (vote casting),
//! `settlement` (decisions, expiry, rewards), and `query` (read surface).
//! Case creation lives here because it is the entry point of the case
//! lifecycle.

use std::sync::Arc;

use tracing::info;

use tribunal_core::Timestamp;

use crate::case::ArbitrationCase;
use crate::config::{ArbitrationConfig, ConfigError};
use crate::dispute::{Dispute, DisputeResolver, DisputeState};
use crate::error::ArbitrationError;
use crate::store::ArbitrationStore;

/// The staked-arbitrator dispute resolution mechanism.
pub struct ArbitrationService {
    pub(crate) config: ArbitrationConfig,
    pub(crate) store: Arc<ArbitrationStore>,
    pub(crate) resolver: Arc<dyn DisputeResolver>,
}

impl ArbitrationService {
    /// Construct a service instance.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the configuration fails validation.
    /// Sanity findings that are legal but suspicious (a reward split not
    /// summing to 100%) are logged during validation instead.
    pub fn new(
        config: ArbitrationConfig,
        store: Arc<ArbitrationStore>,
        resolver: Arc<dyn DisputeResolver>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            min_arbitrator_stake = %config.min_arbitrator_stake,
            vote_stake = %config.vote_stake,
            voting_period_secs = config.voting_period.num_seconds(),
            min_votes_required = config.min_votes_required,
            "arbitration service initialized"
        );
        Ok(Self {
            config,
            store,
            resolver,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &ArbitrationConfig {
        &self.config
    }

    /// The injected store, for read-side sharing.
    pub fn store(&self) -> &Arc<ArbitrationStore> {
        &self.store
    }

    /// Open an arbitration case for an escalated dispute.
    ///
    /// The voting deadline is `now + voting_period`. Exactly one case may
    /// exist per dispute; the secondary index enforces the 1:1 mapping.
    ///
    /// # Errors
    ///
    /// - [`ArbitrationError::NotEscalated`] unless the dispute is in the
    ///   escalated state.
    /// - [`ArbitrationError::DuplicateCase`] if a case already exists for
    ///   this dispute.
    pub fn create_case(
        &self,
        dispute: &Dispute,
        now: Timestamp,
    ) -> Result<ArbitrationCase, ArbitrationError> {
        if dispute.state != DisputeState::Escalated {
            return Err(ArbitrationError::NotEscalated(dispute.id.clone()));
        }

        let deadline = now
            .checked_add(self.config.voting_period)
            .ok_or(ArbitrationError::AmountOverflow)?;

        // Reserve the dispute slot and insert the case under the same
        // index guard so the 1:1 mapping cannot race.
        let mut index = self.store.dispute_index.write();
        if index.contains_key(&dispute.id) {
            return Err(ArbitrationError::DuplicateCase(dispute.id.clone()));
        }

        let case = ArbitrationCase::new(
            dispute.id.clone(),
            dispute.payment_amount,
            self.config.vote_stake,
            self.config.min_votes_required,
            now,
            deadline,
        );
        index.insert(dispute.id.clone(), case.id);
        self.store.cases.write().insert(case.id, case.clone());
        drop(index);

        info!(
            case_id = %case.id,
            dispute_id = %case.dispute_id,
            voting_deadline = %case.voting_deadline,
            "arbitration case created"
        );
        Ok(case)
    }
}

impl std::fmt::Debug for ArbitrationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArbitrationService")
            .field("config", &self.config)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
