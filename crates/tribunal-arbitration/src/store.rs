//! # Arbitration Store
//!
//! The injected, in-memory home of all arbitration state. The mechanism
//! performs no I/O of its own: callers construct a store, hand it to the
//! service, and may hold their own reference for read-side queries. A
//! fresh store per test isolates every scenario.
//!
//! ## Locking discipline
//!
//! Entity maps sit behind `parking_lot::RwLock`s, taken briefly and in a
//! fixed order when an operation needs more than one: `cases` before
//! `arbitrators` before `pending_rewards` (`dispute_index` pairs only
//! with `cases`, taken first). No data lock is ever held across the
//! dispute-collaborator callback.
//!
//! On top of the data locks, each case has an *operation lock*. Every
//! case-mutating operation (vote, decide, expire, the expiry sweep) holds
//! it end-to-end, so the `cast_vote → eager decide → settlement` chain on
//! one case never interleaves with another operation on the same case and
//! a case can never be decided twice.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use tribunal_core::{Amount, ArbitratorAddress, CaseId, DisputeId};

use crate::arbitrator::Arbitrator;
use crate::case::ArbitrationCase;

/// In-memory storage for arbitration state, shared behind `Arc`.
#[derive(Default)]
pub struct ArbitrationStore {
    pub(crate) cases: RwLock<HashMap<CaseId, ArbitrationCase>>,
    pub(crate) dispute_index: RwLock<HashMap<DisputeId, CaseId>>,
    pub(crate) arbitrators: RwLock<HashMap<ArbitratorAddress, Arbitrator>>,
    pub(crate) pending_rewards: RwLock<HashMap<ArbitratorAddress, Amount>>,
    case_ops: Mutex<HashMap<CaseId, Arc<Mutex<()>>>>,
}

impl ArbitrationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a case by id.
    pub fn case(&self, case_id: &CaseId) -> Option<ArbitrationCase> {
        self.cases.read().get(case_id).cloned()
    }

    /// Snapshot of the case created for a dispute, if any.
    pub fn case_by_dispute(&self, dispute_id: &DisputeId) -> Option<ArbitrationCase> {
        let case_id = *self.dispute_index.read().get(dispute_id)?;
        self.case(&case_id)
    }

    /// Snapshot of an arbitrator record by address.
    pub fn arbitrator(&self, address: &ArbitratorAddress) -> Option<Arbitrator> {
        self.arbitrators.read().get(address).cloned()
    }

    /// Unclaimed rewards for an address (zero when none).
    pub fn pending_rewards(&self, address: &ArbitratorAddress) -> Amount {
        self.pending_rewards
            .read()
            .get(address)
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// The operation lock for a case.
    ///
    /// Lock handles are created on demand and live for the store's
    /// lifetime; cases are never deleted, so the map only grows with the
    /// case population.
    pub(crate) fn case_op_lock(&self, case_id: CaseId) -> Arc<Mutex<()>> {
        Arc::clone(
            self.case_ops
                .lock()
                .entry(case_id)
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }
}

impl std::fmt::Debug for ArbitrationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArbitrationStore")
            .field("cases", &self.cases.read().len())
            .field("arbitrators", &self.arbitrators.read().len())
            .finish_non_exhaustive()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
