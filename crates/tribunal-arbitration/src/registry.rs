//! # Arbitrator Registry Operations
//!
//! Stake lifecycle for arbitration participants: registration, top-up,
//! and withdrawal. The registry owns the `active` flag; the settlement
//! engine mutates stakes only through [`Arbitrator`] record methods
//! during case decisions.
//!
//! Withdrawal is refused while the arbitrator holds an undecided vote in
//! any open case: that stake is at risk until the case decides or
//! expires.

use tracing::info;

use tribunal_core::{Amount, ArbitratorAddress, Timestamp};

use crate::arbitrator::Arbitrator;
use crate::case::CaseState;
use crate::error::ArbitrationError;
use crate::service::ArbitrationService;

impl ArbitrationService {
    /// Register as an arbitrator with an initial stake.
    ///
    /// Re-registration after deactivation is allowed and preserves the
    /// historical scorecard; an *active* registration cannot be replaced.
    ///
    /// # Errors
    ///
    /// - [`ArbitrationError::InsufficientStake`] below the registration
    ///   minimum.
    /// - [`ArbitrationError::AlreadyActive`] when an active registration
    ///   exists.
    pub fn register_arbitrator(
        &self,
        address: &ArbitratorAddress,
        stake: Amount,
        now: Timestamp,
    ) -> Result<Arbitrator, ArbitrationError> {
        if stake < self.config.min_arbitrator_stake {
            return Err(ArbitrationError::InsufficientStake {
                offered: stake,
                required: self.config.min_arbitrator_stake,
            });
        }

        let mut arbitrators = self.store.arbitrators.write();
        let record = match arbitrators.get_mut(address) {
            Some(existing) if existing.active => {
                return Err(ArbitrationError::AlreadyActive(address.clone()));
            }
            Some(lapsed) => {
                lapsed.reregister(stake);
                lapsed.clone()
            }
            None => {
                let arbitrator = Arbitrator::new(address.clone(), stake, now);
                arbitrators.insert(address.clone(), arbitrator.clone());
                arbitrator
            }
        };
        drop(arbitrators);

        info!(address = %address, stake = %stake, "arbitrator registered");
        Ok(record)
    }

    /// Add stake to an existing registration. Additive, no upper bound.
    ///
    /// Topping up does not reactivate a lapsed registration; the path
    /// back to voting is [`register_arbitrator`](Self::register_arbitrator).
    ///
    /// # Errors
    ///
    /// - [`ArbitrationError::ArbitratorNotFound`] without a prior
    ///   registration.
    pub fn increase_stake(
        &self,
        address: &ArbitratorAddress,
        amount: Amount,
    ) -> Result<Arbitrator, ArbitrationError> {
        let mut arbitrators = self.store.arbitrators.write();
        let arbitrator = arbitrators
            .get_mut(address)
            .ok_or_else(|| ArbitrationError::ArbitratorNotFound(address.clone()))?;

        arbitrator.staked_amount = arbitrator
            .staked_amount
            .checked_add(amount)
            .ok_or(ArbitrationError::AmountOverflow)?;
        let record = arbitrator.clone();
        drop(arbitrators);

        info!(address = %address, added = %amount, total = %record.staked_amount, "stake increased");
        Ok(record)
    }

    /// Withdraw stake, deactivating the registration if the remainder
    /// falls below the minimum.
    ///
    /// # Errors
    ///
    /// - [`ArbitrationError::ActiveVoteConflict`] while the arbitrator
    ///   holds an undecided vote in a case still open for voting.
    /// - [`ArbitrationError::ArbitratorNotFound`] without a registration.
    /// - [`ArbitrationError::InsufficientStake`] when `amount` exceeds the
    ///   current stake.
    pub fn withdraw_stake(
        &self,
        address: &ArbitratorAddress,
        amount: Amount,
    ) -> Result<Arbitrator, ArbitrationError> {
        // Lock order: cases (read) before arbitrators (write) — the same
        // order settlement uses, and holding both makes the conflict
        // check and the stake mutation one atomic step.
        let cases = self.store.cases.read();
        let mut arbitrators = self.store.arbitrators.write();

        let has_open_vote = cases
            .values()
            .any(|c| c.state == CaseState::Voting && c.has_voted(address));
        if has_open_vote {
            return Err(ArbitrationError::ActiveVoteConflict(address.clone()));
        }

        let arbitrator = arbitrators
            .get_mut(address)
            .ok_or_else(|| ArbitrationError::ArbitratorNotFound(address.clone()))?;

        if amount > arbitrator.staked_amount {
            return Err(ArbitrationError::InsufficientStake {
                offered: arbitrator.staked_amount,
                required: amount,
            });
        }

        arbitrator.staked_amount = arbitrator.staked_amount.saturating_sub(amount);
        if arbitrator.staked_amount < self.config.min_arbitrator_stake {
            arbitrator.active = false;
        }
        let record = arbitrator.clone();
        drop(arbitrators);
        drop(cases);

        info!(
            address = %address,
            withdrawn = %amount,
            remaining = %record.staked_amount,
            active = record.active,
            "stake withdrawn"
        );
        Ok(record)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tribunal_core::DisputeId;

    use crate::config::ArbitrationConfig;
    use crate::dispute::{Dispute, DisputeOutcome, DisputeResolver, DisputeState, ResolverError};
    use crate::store::ArbitrationStore;

    use super::*;

    struct NullResolver;

    impl DisputeResolver for NullResolver {
        fn resolve_dispute(
            &self,
            _dispute_id: &DisputeId,
            _outcome: DisputeOutcome,
            _refund_amount: Option<Amount>,
            _rationale: &str,
        ) -> Result<(), ResolverError> {
            Ok(())
        }
    }

    fn amt(s: &str) -> Amount {
        s.parse().unwrap()
    }

    fn service() -> ArbitrationService {
        ArbitrationService::new(
            ArbitrationConfig::default(),
            Arc::new(ArbitrationStore::new()),
            Arc::new(NullResolver),
        )
        .unwrap()
    }

    fn addr(s: &str) -> ArbitratorAddress {
        ArbitratorAddress::new(s).unwrap()
    }

    fn now() -> Timestamp {
        Timestamp::parse("2026-03-01T00:00:00Z").unwrap()
    }

    // ---- registration ----

    #[test]
    fn test_register_below_minimum_rejected() {
        let svc = service();
        let err = svc
            .register_arbitrator(&addr("0xa"), amt("99.9999"), now())
            .unwrap_err();
        assert!(matches!(err, ArbitrationError::InsufficientStake { .. }));
    }

    #[test]
    fn test_register_then_duplicate_rejected() {
        let svc = service();
        svc.register_arbitrator(&addr("0xa"), amt("100"), now()).unwrap();
        let err = svc
            .register_arbitrator(&addr("0xA"), amt("150"), now())
            .unwrap_err();
        assert!(matches!(err, ArbitrationError::AlreadyActive(_)));
    }

    #[test]
    fn test_reregistration_after_deactivation_keeps_history() {
        let svc = service();
        let a = addr("0xa");
        svc.register_arbitrator(&a, amt("100"), now()).unwrap();

        // Deactivate by withdrawing below the minimum.
        svc.withdraw_stake(&a, amt("50")).unwrap();
        assert!(!svc.store().arbitrator(&a).unwrap().active);

        // Simulate history so re-registration has something to preserve.
        svc.store()
            .arbitrators
            .write()
            .get_mut(&a)
            .unwrap()
            .cases_participated = 7;

        let rec = svc.register_arbitrator(&a, amt("120"), now()).unwrap();
        assert!(rec.active);
        assert_eq!(rec.staked_amount, amt("120"));
        assert_eq!(rec.cases_participated, 7);
    }

    // ---- top-up ----

    #[test]
    fn test_increase_stake_requires_registration() {
        let svc = service();
        let err = svc.increase_stake(&addr("0xa"), amt("10")).unwrap_err();
        assert!(matches!(err, ArbitrationError::ArbitratorNotFound(_)));
    }

    #[test]
    fn test_increase_stake_is_additive() {
        let svc = service();
        let a = addr("0xa");
        svc.register_arbitrator(&a, amt("100"), now()).unwrap();
        let rec = svc.increase_stake(&a, amt("25.5")).unwrap();
        assert_eq!(rec.staked_amount, amt("125.5"));
    }

    #[test]
    fn test_increase_stake_does_not_reactivate() {
        let svc = service();
        let a = addr("0xa");
        svc.register_arbitrator(&a, amt("100"), now()).unwrap();
        svc.withdraw_stake(&a, amt("80")).unwrap();
        assert!(!svc.store().arbitrator(&a).unwrap().active);

        let rec = svc.increase_stake(&a, amt("500")).unwrap();
        assert_eq!(rec.staked_amount, amt("520"));
        assert!(!rec.active);
    }

    // ---- withdrawal ----

    #[test]
    fn test_withdraw_more_than_staked_rejected() {
        let svc = service();
        let a = addr("0xa");
        svc.register_arbitrator(&a, amt("100"), now()).unwrap();
        let err = svc.withdraw_stake(&a, amt("100.0001")).unwrap_err();
        assert!(matches!(err, ArbitrationError::InsufficientStake { .. }));
    }

    #[test]
    fn test_withdraw_below_minimum_deactivates() {
        let svc = service();
        let a = addr("0xa");
        svc.register_arbitrator(&a, amt("150"), now()).unwrap();

        let rec = svc.withdraw_stake(&a, amt("50")).unwrap();
        assert_eq!(rec.staked_amount, amt("100"));
        assert!(rec.active);

        let rec = svc.withdraw_stake(&a, amt("0.0001")).unwrap();
        assert!(!rec.active);
    }

    #[test]
    fn test_withdraw_blocked_by_open_vote() {
        let svc = service();
        let a = addr("0xa");
        svc.register_arbitrator(&a, amt("100"), now()).unwrap();

        let dispute = Dispute {
            id: DisputeId::new("disp_1").unwrap(),
            state: DisputeState::Escalated,
            payment_amount: amt("50"),
            escalation: None,
        };
        let case = svc.create_case(&dispute, now()).unwrap();
        svc.cast_vote(case.id, &a, true, None, now()).unwrap();

        let err = svc.withdraw_stake(&a, amt("10")).unwrap_err();
        assert!(matches!(err, ArbitrationError::ActiveVoteConflict(_)));
    }
}
