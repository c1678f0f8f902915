//! HTTP handlers, grouped by resource.
//!
//! Handlers stay thin: build the actor from the verified claims, call into
//! the domain, map `MarketError` onto the HTTP surface. The error-to-status
//! mapping lives here and nowhere else — the core never sees HTTP.

pub mod account;
pub mod admin;
pub mod disputes;
pub mod files;
pub mod health;
pub mod messages;
pub mod orders;
pub mod reviews;
pub mod services;
pub mod webhook;

pub use health::{HealthResponse, health_check};

use axum::{Json, http::StatusCode};

use super::types::{ApiResponse, error_codes};
use crate::error::MarketError;
use crate::policy::Actor;
use crate::user_auth::Claims;

pub(crate) type ErrorResponse = (StatusCode, Json<ApiResponse<()>>);

/// Map a domain error to the wire
pub(crate) fn error_response(err: MarketError) -> ErrorResponse {
    match &err {
        MarketError::Validation { .. } => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(
                error_codes::INVALID_PARAMETER,
                err.to_string(),
            )),
        ),
        MarketError::Forbidden => (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<()>::error(
                error_codes::FORBIDDEN,
                "operation not permitted",
            )),
        ),
        MarketError::NotFound { .. } => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error(error_codes::NOT_FOUND, err.to_string())),
        ),
        MarketError::Conflict(_) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::<()>::error(error_codes::CONFLICT, err.to_string())),
        ),
        MarketError::InsufficientBalance { .. } => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(
                error_codes::INSUFFICIENT_BALANCE,
                err.to_string(),
            )),
        ),
        MarketError::Integrity(msg) => {
            // Must reach the log for manual reconciliation
            tracing::error!("integrity violation: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(
                    error_codes::INTEGRITY_ERROR,
                    "internal integrity error",
                )),
            )
        }
        MarketError::Storage(msg) => {
            tracing::error!("storage collaborator failed: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(
                    error_codes::INTERNAL_ERROR,
                    "file storage failed",
                )),
            )
        }
        MarketError::Database(e) => {
            tracing::error!("database error: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(
                    error_codes::INTERNAL_ERROR,
                    "internal error",
                )),
            )
        }
    }
}

/// Build the request actor from verified JWT claims
pub(crate) fn actor_from(claims: &Claims) -> Result<Actor, ErrorResponse> {
    Actor::from_claims(claims).ok_or((
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::error(
            error_codes::AUTH_FAILED,
            "Malformed token claims",
        )),
    ))
}

/// Reject invalid request bodies with field detail
pub(crate) fn validate_body<T: validator::Validate>(body: &T) -> Result<(), ErrorResponse> {
    body.validate().map_err(|errs| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(
                error_codes::INVALID_PARAMETER,
                format!("Invalid input: {}", errs),
            )),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping_statuses() {
        let cases: Vec<(MarketError, StatusCode)> = vec![
            (
                MarketError::validation("f", "bad"),
                StatusCode::BAD_REQUEST,
            ),
            (MarketError::Forbidden, StatusCode::FORBIDDEN),
            (MarketError::not_found("order", 1), StatusCode::NOT_FOUND),
            (MarketError::conflict("raced"), StatusCode::CONFLICT),
            (
                MarketError::Integrity("bad sum".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                MarketError::Storage("disk".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            let (status, _) = error_response(err);
            assert_eq!(status, expected);
        }
    }
}
