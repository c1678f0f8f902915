//! Payment-gateway webhook.
//!
//! The gateway calls us with "payment succeeded" notifications; delivery
//! may be duplicated or arrive after the order already completed, so the
//! whole path is idempotent by payment. Authenticated by shared secret,
//! not user JWT.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::{ErrorResponse, error_response};
use crate::balance::{BalanceEngine, PaymentConfirmOutcome};
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiResponse, error_codes};

const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// Webhook payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentConfirmedPayload {
    pub order_id: i64,
    #[schema(value_type = String, example = "100.00")]
    pub amount: Decimal,
}

/// Payment confirmed notification
///
/// POST /api/v1/webhooks/payment
#[utoipa::path(
    post,
    path = "/api/v1/webhooks/payment",
    request_body = PaymentConfirmedPayload,
    responses(
        (status = 200, description = "Processed (idempotent)", body = ApiResponse<String>),
        (status = 401, description = "Bad webhook secret"),
        (status = 409, description = "Payment not confirmable"),
        (status = 500, description = "Amount mismatch or internal error")
    ),
    tag = "Webhooks"
)]
pub async fn payment_confirmed(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<PaymentConfirmedPayload>,
) -> Result<(StatusCode, Json<ApiResponse<String>>), ErrorResponse> {
    let presented = headers
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();

    if presented != state.config.market.webhook_secret {
        tracing::warn!(order_id = payload.order_id, "webhook with bad secret rejected");
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<()>::error(
                error_codes::AUTH_FAILED,
                "Invalid webhook secret",
            )),
        ));
    }

    let outcome =
        BalanceEngine::on_payment_confirmed(state.db.pool(), payload.order_id, payload.amount)
            .await
            .map_err(error_response)?;

    let msg = match outcome {
        PaymentConfirmOutcome::Confirmed => "confirmed",
        PaymentConfirmOutcome::AlreadyConfirmed => "already confirmed",
        PaymentConfirmOutcome::ConfirmedAndSettled => "confirmed and settled",
    };

    tracing::info!(order_id = payload.order_id, outcome = msg, "payment webhook processed");
    Ok((StatusCode::OK, Json(ApiResponse::success(msg.to_string()))))
}

/// Dev-only mock confirmation, bypassing the secret check.
/// Compiled only with the `mock-webhook` feature; production builds use
/// `--no-default-features`.
#[cfg(feature = "mock-webhook")]
pub async fn mock_payment_confirmed(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PaymentConfirmedPayload>,
) -> Result<(StatusCode, Json<ApiResponse<String>>), ErrorResponse> {
    let outcome =
        BalanceEngine::on_payment_confirmed(state.db.pool(), payload.order_id, payload.amount)
            .await
            .map_err(error_response)?;

    tracing::info!(
        order_id = payload.order_id,
        ?outcome,
        "mock payment confirmation applied"
    );
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(format!("{:?}", outcome))),
    ))
}
