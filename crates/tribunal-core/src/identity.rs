//! # Domain Identity Newtypes
//!
//! Newtype wrappers for all identifiers in the Tribunal stack. These
//! prevent accidental identifier confusion — you cannot pass a `DisputeId`
//! where a `CaseId` is expected.
//!
//! Internally-minted identifiers (`CaseId`, `VoteId`) are UUID-backed.
//! Externally-owned identifiers (`ArbitratorAddress`, `DisputeId`) are
//! validated string newtypes: the dispute collaborator and the payment
//! layer own their formats, this crate only enforces that they are
//! well-formed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// The on-ledger address of an arbitration participant.
///
/// Addresses are case-insensitive; the constructor normalizes to lowercase
/// so that equality, map keys, and duplicate-vote checks agree regardless
/// of the casing a caller supplies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArbitratorAddress(String);

impl ArbitratorAddress {
    /// Validate and normalize an address.
    ///
    /// # Errors
    ///
    /// Rejects empty input and input containing whitespace.
    pub fn new(address: impl Into<String>) -> Result<Self, CoreError> {
        let address = address.into();
        if address.is_empty() {
            return Err(CoreError::InvalidIdentifier {
                input: address,
                reason: "address must not be empty".to_string(),
            });
        }
        if address.chars().any(char::is_whitespace) {
            return Err(CoreError::InvalidIdentifier {
                input: address,
                reason: "address must not contain whitespace".to_string(),
            });
        }
        Ok(Self(address.to_lowercase()))
    }

    /// The normalized address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ArbitratorAddress {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ArbitratorAddress> for String {
    fn from(value: ArbitratorAddress) -> Self {
        value.0
    }
}

impl std::fmt::Display for ArbitratorAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a dispute owned by the external dispute collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisputeId(String);

impl DisputeId {
    /// Validate a collaborator-supplied dispute identifier.
    ///
    /// # Errors
    ///
    /// Rejects empty input.
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CoreError::InvalidIdentifier {
                input: id,
                reason: "dispute id must not be empty".to_string(),
            });
        }
        Ok(Self(id))
    }

    /// The identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DisputeId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DisputeId> for String {
    fn from(value: DisputeId) -> Self {
        value.0
    }
}

impl std::fmt::Display for DisputeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for an arbitration case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseId(pub Uuid);

impl CaseId {
    /// Generate a new random case identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CaseId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "case:{}", self.0)
    }
}

/// Unique identifier for a cast vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoteId(pub Uuid);

impl VoteId {
    /// Generate a new random vote identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for VoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for VoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "vote:{}", self.0)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
