//! Contract error types
//!
//! Validation errors come from untrusted project input and are meant to be
//! caught, formatted, and shown to the user by the caller. Encode errors are
//! programmer errors: a well-formed contract value always serializes.

use thiserror::Error;

/// Errors produced by contract decode, encode, and patch operations
#[derive(Debug, Error)]
pub enum ContractError {
    /// Input mapping failed validation: missing required field, type
    /// mismatch, enum-membership violation, or no matching union variant.
    /// The message carries the serde field-path context.
    #[error("validation error: {0}")]
    Validation(String),

    /// A field-level check failed outside of serde's shape validation
    #[error("invalid value for {field}: expected {expected}, got {actual}")]
    InvalidValue {
        field: &'static str,
        expected: String,
        actual: String,
    },

    /// A contract value failed to serialize
    #[error("failed to encode contract: {0}")]
    Encode(String),
}

impl ContractError {
    /// True for errors caused by untrusted input rather than a bug
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ContractError::Validation(_) | ContractError::InvalidValue { .. }
        )
    }
}
