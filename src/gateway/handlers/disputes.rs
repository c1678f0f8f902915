//! Dispute handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{ErrorResponse, actor_from, error_response, validate_body};
use crate::disputes::models::{DisputeApiData, OpenDisputeRequest, ResolveDisputeRequest};
use crate::disputes::repository::DisputeRepository;
use crate::disputes::DisputeStatus;
use crate::error::MarketError;
use crate::gateway::state::AppState;
use crate::gateway::types::ApiResponse;
use crate::policy::message::{MessageAction, allows};
use crate::user_auth::Claims;

/// Open a dispute against an order (parties only, non-terminal orders)
///
/// POST /api/v1/disputes
#[utoipa::path(
    post,
    path = "/api/v1/disputes",
    request_body = OpenDisputeRequest,
    responses(
        (status = 201, description = "Dispute opened", body = ApiResponse<DisputeApiData>),
        (status = 403, description = "Not a party to this order"),
        (status = 409, description = "Order already settled")
    ),
    tag = "Disputes"
)]
pub async fn open_dispute(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<OpenDisputeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DisputeApiData>>), ErrorResponse> {
    let actor = actor_from(&claims)?;
    validate_body(&req)?;

    let order = crate::orders::repository::OrderRepository::get(state.db.pool(), req.order_id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| error_response(MarketError::not_found("order", req.order_id)))?;

    // Same audience as the message thread: the two parties (or admin)
    if !allows(&actor, &order, MessageAction::Send) {
        return Err(error_response(MarketError::Forbidden));
    }
    if order.status.is_terminal() {
        return Err(error_response(MarketError::conflict(format!(
            "order {} is {}, disputes apply to open orders",
            order.order_id, order.status
        ))));
    }

    let dispute =
        DisputeRepository::create(state.db.pool(), req.order_id, actor.user_id, &req.reason)
            .await
            .map_err(error_response)?;

    tracing::info!(
        dispute_id = dispute.dispute_id,
        order_id = req.order_id,
        opened_by = actor.user_id,
        "dispute opened"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(dispute.into())),
    ))
}

/// Admin: list open disputes
///
/// GET /api/v1/admin/disputes
#[utoipa::path(
    get,
    path = "/api/v1/admin/disputes",
    responses(
        (status = 200, description = "Open disputes", body = ApiResponse<Vec<DisputeApiData>>)
    ),
    tag = "Admin"
)]
pub async fn list_open_disputes(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<DisputeApiData>>>), ErrorResponse> {
    let disputes = DisputeRepository::list_open(state.db.pool(), 100)
        .await
        .map_err(error_response)?;

    let data = disputes.into_iter().map(DisputeApiData::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

/// Admin: resolve a dispute. "cancel" runs the admin cancel transition on
/// the order; "uphold" leaves the order as it stands.
///
/// POST /api/v1/admin/disputes/{dispute_id}/resolve
#[utoipa::path(
    post,
    path = "/api/v1/admin/disputes/{dispute_id}/resolve",
    params(("dispute_id" = i64, Path, description = "Dispute ID")),
    request_body = ResolveDisputeRequest,
    responses(
        (status = 200, description = "Resolved", body = ApiResponse<DisputeApiData>),
        (status = 400, description = "Unknown resolution"),
        (status = 409, description = "Already resolved")
    ),
    tag = "Admin"
)]
pub async fn resolve_dispute(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(dispute_id): Path<i64>,
    Json(req): Json<ResolveDisputeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DisputeApiData>>), ErrorResponse> {
    let actor = actor_from(&claims)?;
    validate_body(&req)?;

    let resolution = match req.resolution.as_str() {
        "cancel" => DisputeStatus::ResolvedCancelled,
        "uphold" => DisputeStatus::ResolvedUpheld,
        other => {
            return Err(error_response(MarketError::validation(
                "resolution",
                format!("unknown resolution '{}', expected cancel|uphold", other),
            )));
        }
    };

    let dispute = DisputeRepository::get(state.db.pool(), dispute_id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| error_response(MarketError::not_found("dispute", dispute_id)))?;

    // Cancel the order first; if the order already reached a terminal
    // state the cancel conflicts and the dispute stays open for review.
    if resolution == DisputeStatus::ResolvedCancelled {
        state
            .lifecycle
            .cancel(&actor, dispute.order_id, req.note.as_deref())
            .await
            .map_err(error_response)?;
    }

    let resolved = DisputeRepository::resolve_if_open(
        state.db.pool(),
        dispute_id,
        resolution,
        actor.user_id,
        req.note.as_deref(),
    )
    .await
    .map_err(error_response)?;

    if !resolved {
        return Err(error_response(MarketError::conflict(format!(
            "dispute {} already resolved",
            dispute_id
        ))));
    }

    let dispute = DisputeRepository::get(state.db.pool(), dispute_id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| error_response(MarketError::not_found("dispute", dispute_id)))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(dispute.into()))))
}
