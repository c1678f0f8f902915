//! Error taxonomy shared by the order lifecycle, balance engine and
//! resource repositories.
//!
//! Policies and transitions return these explicitly; nothing in the core
//! throws to signal a denial. The gateway decides the HTTP mapping.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarketError {
    /// User input malformed or out of range. Field-level detail survives to
    /// the API response.
    #[error("validation failed on '{field}': {reason}")]
    Validation { field: &'static str, reason: String },

    /// Policy denied the action. Never retried.
    #[error("operation not permitted")]
    Forbidden,

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// Expected-state mismatch on a conditional update. The caller may
    /// re-fetch and decide whether to retry.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance {
        available: Decimal,
        requested: Decimal,
    },

    /// Invariant violated (e.g. a commission split that doesn't sum to the
    /// order price). Fatal to the operation; the surrounding transaction
    /// must roll back.
    #[error("integrity violation: {0}")]
    Integrity(String),

    /// File storage collaborator failed; propagates as a failed operation.
    #[error("storage error: {0}")]
    Storage(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl MarketError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        MarketError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        MarketError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        MarketError::Conflict(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_field_detail() {
        let err = MarketError::validation("reason", "too short (min 10 chars)");
        assert!(err.to_string().contains("'reason'"));
        assert!(err.to_string().contains("too short"));
    }

    #[test]
    fn test_not_found_formats_id() {
        let err = MarketError::not_found("order", 42);
        assert_eq!(err.to_string(), "order 42 not found");
    }
}
