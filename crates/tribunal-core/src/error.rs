//! # Core Error Types
//!
//! Construction and parse failures for the foundational types. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Higher-level crates define their own operational error types; this enum
//! only covers rejection at the type boundary (malformed amounts,
//! identifiers, and timestamps).

use thiserror::Error;

/// Errors raised when constructing a foundational type from external input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A decimal amount string could not be parsed.
    #[error("invalid amount {input:?}: {reason}")]
    InvalidAmount {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An identifier failed validation.
    #[error("invalid identifier {input:?}: {reason}")]
    InvalidIdentifier {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A timestamp string failed validation.
    #[error("invalid timestamp {input:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },
}
