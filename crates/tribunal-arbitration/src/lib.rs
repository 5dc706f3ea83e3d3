//! # tribunal-arbitration — Staked-Arbitrator Dispute Resolution
//!
//! Implements the arbitration mechanism of the Tribunal stack: registered,
//! capital-at-risk arbitrators vote on escalated disputes, and stakes are
//! redistributed based on the outcome.
//!
//! - **Configuration** (`config.rs`): static mechanism parameters with
//!   load-time validation.
//!
//! - **Dispute boundary** (`dispute.rs`): the types and outbound trait
//!   shared with the external dispute collaborator. Escalation, escrow,
//!   and actual token movement live on the other side of this boundary.
//!
//! - **Arbitrator registry** (`arbitrator.rs`, `registry.rs`): stake
//!   lifecycle — register, top-up, withdraw, activate/deactivate — and the
//!   per-arbitrator scorecard.
//!
//! - **Case lifecycle** (`case.rs`): the `Voting → Decided | Expired`
//!   state machine, vote records, and the tally rules.
//!
//! - **Voting engine** (`voting.rs`): vote validation, exactly-once
//!   enforcement, and the eager quorum transition.
//!
//! - **Settlement** (`settlement.rs`): outcome determination, reward and
//!   penalty distribution, reward claims, and the expiry sweep.
//!
//! - **Queries** (`query.rs`): case and arbitrator lookups, the
//!   leaderboard, and aggregate statistics.
//!
//! ## Crate Policy
//!
//! - The mechanism performs no I/O. State lives in an injected
//!   [`ArbitrationStore`]; the only outward call is the best-effort
//!   [`DisputeResolver`] notification.
//! - No `unwrap()`/`expect()` outside tests; every failure is a typed
//!   [`ArbitrationError`].
//! - Time enters through explicit `now` parameters, never from ambient
//!   clocks, so deadline behavior is deterministic under test.

pub mod arbitrator;
pub mod case;
pub mod config;
pub mod dispute;
pub mod error;
pub mod query;
pub mod registry;
pub mod service;
pub mod settlement;
pub mod store;
pub mod voting;

pub use arbitrator::Arbitrator;
pub use case::{ArbitrationCase, ArbitrationVote, CaseState, VoteTally, WinningSide};
pub use config::{ArbitrationConfig, ConfigError};
pub use dispute::{Dispute, DisputeOutcome, DisputeResolver, DisputeState, Escalation, ResolverError};
pub use error::{ArbitrationError, ErrorCategory};
pub use query::ArbitrationStats;
pub use service::ArbitrationService;
pub use store::ArbitrationStore;
