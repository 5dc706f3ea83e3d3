//! # Arbitration Configuration
//!
//! Static parameters for the arbitration mechanism, fixed at construction
//! time. There is no hot reload: a running service answers every case
//! under the parameters it started with, so two votes on the same case can
//! never be priced differently.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use tribunal_core::Amount;

/// Configuration errors that reject a service at construction time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A stake parameter that must be positive was zero.
    #[error("{parameter} must be greater than zero")]
    ZeroAmount {
        /// The offending parameter name.
        parameter: &'static str,
    },

    /// The quorum was zero — no case could ever be decided.
    #[error("min_votes_required must be at least 1")]
    ZeroQuorum,

    /// The voting window was zero or negative.
    #[error("voting_period must be positive, got {seconds}s")]
    NonPositiveVotingPeriod {
        /// The configured period in seconds.
        seconds: i64,
    },

    /// A percentage parameter exceeded 100.
    #[error("{parameter} is {value}%, must not exceed 100")]
    PercentOutOfRange {
        /// The offending parameter name.
        parameter: &'static str,
        /// The configured value.
        value: u8,
    },
}

/// Static parameters of the arbitration mechanism.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrationConfig {
    /// Minimum stake required to register (and stay active) as an arbitrator.
    pub min_arbitrator_stake: Amount,
    /// Stake put at risk by each vote. Distinct from the registration
    /// minimum — an arbitrator can be active yet unable to afford a vote.
    pub vote_stake: Amount,
    /// Length of the voting window for each case.
    #[serde(with = "voting_period_secs")]
    pub voting_period: Duration,
    /// Minimum number of votes needed to decide a case.
    pub min_votes_required: usize,
    /// Percentage of the losing stake distributed to winning voters.
    pub winner_reward_percent: u8,
    /// Percentage of the losing stake retained by the protocol.
    pub dao_burn_percent: u8,
}

impl Default for ArbitrationConfig {
    fn default() -> Self {
        Self {
            min_arbitrator_stake: Amount::from_whole(100),
            vote_stake: Amount::from_whole(10),
            voting_period: Duration::days(3),
            min_votes_required: 3,
            winner_reward_percent: 80,
            dao_burn_percent: 20,
        }
    }
}

impl ArbitrationConfig {
    /// Validate the configuration.
    ///
    /// Hard violations (zero stakes, zero quorum, out-of-range percents)
    /// are errors. A winner/burn split that does not sum to 100 is legal
    /// but suspicious — the unaccounted remainder of the losing stake is
    /// retained by the protocol — so it is logged as a warning rather than
    /// rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_arbitrator_stake.is_zero() {
            return Err(ConfigError::ZeroAmount {
                parameter: "min_arbitrator_stake",
            });
        }
        if self.vote_stake.is_zero() {
            return Err(ConfigError::ZeroAmount {
                parameter: "vote_stake",
            });
        }
        if self.min_votes_required == 0 {
            return Err(ConfigError::ZeroQuorum);
        }
        if self.voting_period <= Duration::zero() {
            return Err(ConfigError::NonPositiveVotingPeriod {
                seconds: self.voting_period.num_seconds(),
            });
        }
        if self.winner_reward_percent > 100 {
            return Err(ConfigError::PercentOutOfRange {
                parameter: "winner_reward_percent",
                value: self.winner_reward_percent,
            });
        }
        if self.dao_burn_percent > 100 {
            return Err(ConfigError::PercentOutOfRange {
                parameter: "dao_burn_percent",
                value: self.dao_burn_percent,
            });
        }

        let split = self.winner_reward_percent as u16 + self.dao_burn_percent as u16;
        if split != 100 {
            warn!(
                winner_reward_percent = self.winner_reward_percent,
                dao_burn_percent = self.dao_burn_percent,
                "reward split sums to {split}%, not 100%; the remainder of \
                 the losing stake is retained and never disbursed"
            );
        }

        Ok(())
    }
}

/// Serde representation of the voting period as whole seconds.
mod voting_period_secs {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        d.num_seconds().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::seconds(i64::deserialize(d)?))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ArbitrationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_vote_stake_rejected() {
        let cfg = ArbitrationConfig {
            vote_stake: Amount::ZERO,
            ..Default::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ZeroAmount {
                parameter: "vote_stake"
            })
        );
    }

    #[test]
    fn test_zero_min_stake_rejected() {
        let cfg = ArbitrationConfig {
            min_arbitrator_stake: Amount::ZERO,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_zero_quorum_rejected() {
        let cfg = ArbitrationConfig {
            min_votes_required: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroQuorum));
    }

    #[test]
    fn test_non_positive_voting_period_rejected() {
        let cfg = ArbitrationConfig {
            voting_period: Duration::zero(),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_percent_above_100_rejected() {
        let cfg = ArbitrationConfig {
            winner_reward_percent: 101,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_split_not_summing_to_100_is_allowed() {
        // Warned about, not rejected: the remainder is simply retained.
        let cfg = ArbitrationConfig {
            winner_reward_percent: 70,
            dao_burn_percent: 20,
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_serde_roundtrip() {
        let cfg = ArbitrationConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let parsed: ArbitrationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, parsed);
        assert_eq!(parsed.voting_period, Duration::days(3));
    }
}
