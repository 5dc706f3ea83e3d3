//! # tribunal-core — Foundational Types for the Tribunal Stack
//!
//! This crate is the bedrock of the Tribunal arbitration stack. It defines
//! the type-system primitives every other crate in the workspace builds on;
//! it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `ArbitratorAddress`,
//!    `DisputeId`, `CaseId`, `VoteId` — all newtypes with validated
//!    constructors. No bare strings for identifiers.
//!
//! 2. **No floats in money.** `Amount` is a fixed-point integer type with
//!    four fractional decimal digits. Stake arithmetic is exact, floored,
//!    and non-negative by construction.
//!
//! 3. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision. Non-UTC inputs are rejected at
//!    construction, never silently converted.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tribunal-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod amount;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use amount::Amount;
pub use error::CoreError;
pub use identity::{ArbitratorAddress, CaseId, DisputeId, VoteId};
pub use temporal::Timestamp;
