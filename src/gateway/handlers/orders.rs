//! Order lifecycle handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ErrorResponse, actor_from, error_response, validate_body};
use crate::account::Role;
use crate::audit::{AuditEntry, AuditRepository};
use crate::gateway::state::AppState;
use crate::gateway::types::ApiResponse;
use crate::orders::models::{
    CancelRequest, DeliverRequest, OrderApiData, PlaceOrderRequest, RevisionRequest,
};
use crate::orders::repository::OrderRepository;
use crate::user_auth::Claims;

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub limit: Option<i64>,
}

impl ListOrdersQuery {
    fn limit(&self) -> i64 {
        self.limit.unwrap_or(50).clamp(1, 200)
    }
}

/// Place an order
///
/// POST /api/v1/orders
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = ApiResponse<OrderApiData>),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Only clients place orders"),
        (status = 409, description = "Service not orderable")
    ),
    tag = "Orders"
)]
pub async fn place_order(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderApiData>>), ErrorResponse> {
    let actor = actor_from(&claims)?;
    validate_body(&req)?;

    let order = state
        .lifecycle
        .place(&actor, &req)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(order.into())),
    ))
}

/// List the caller's orders (client or student side per role)
///
/// GET /api/v1/orders
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    params(("limit" = Option<i64>, Query, description = "Max rows (default 50)")),
    responses(
        (status = 200, description = "Orders", body = ApiResponse<Vec<OrderApiData>>)
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<OrderApiData>>>), ErrorResponse> {
    let actor = actor_from(&claims)?;
    let pool = state.db.pool();

    let orders = match actor.role {
        Role::Client => OrderRepository::list_by_client(pool, actor.user_id, query.limit()).await,
        Role::Student => OrderRepository::list_by_student(pool, actor.user_id, query.limit()).await,
        Role::Admin => OrderRepository::list_all(pool, None, query.limit()).await,
    }
    .map_err(error_response)?;

    let data = orders.into_iter().map(OrderApiData::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

/// Get one order (parties and admin only)
///
/// GET /api/v1/orders/{order_id}
#[utoipa::path(
    get,
    path = "/api/v1/orders/{order_id}",
    params(("order_id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order", body = ApiResponse<OrderApiData>),
        (status = 403, description = "Not a party to this order"),
        (status = 404, description = "No such order")
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(order_id): Path<i64>,
) -> Result<(StatusCode, Json<ApiResponse<OrderApiData>>), ErrorResponse> {
    let actor = actor_from(&claims)?;
    let order = state
        .lifecycle
        .get_checked(&actor, order_id)
        .await
        .map_err(error_response)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(order.into()))))
}

/// Student accepts a pending order
///
/// POST /api/v1/orders/{order_id}/accept
#[utoipa::path(
    post,
    path = "/api/v1/orders/{order_id}/accept",
    params(("order_id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order accepted", body = ApiResponse<OrderApiData>),
        (status = 403, description = "Not the assigned student"),
        (status = 409, description = "Order not pending")
    ),
    tag = "Orders"
)]
pub async fn accept_order(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(order_id): Path<i64>,
) -> Result<(StatusCode, Json<ApiResponse<OrderApiData>>), ErrorResponse> {
    let actor = actor_from(&claims)?;
    let order = state
        .lifecycle
        .accept(&actor, order_id)
        .await
        .map_err(error_response)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(order.into()))))
}

/// Student delivers work
///
/// POST /api/v1/orders/{order_id}/deliver
#[utoipa::path(
    post,
    path = "/api/v1/orders/{order_id}/deliver",
    params(("order_id" = i64, Path, description = "Order ID")),
    request_body = DeliverRequest,
    responses(
        (status = 200, description = "Delivered", body = ApiResponse<OrderApiData>),
        (status = 400, description = "Missing message or files"),
        (status = 409, description = "Order not in a deliverable state")
    ),
    tag = "Orders"
)]
pub async fn deliver_order(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(order_id): Path<i64>,
    Json(req): Json<DeliverRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderApiData>>), ErrorResponse> {
    let actor = actor_from(&claims)?;
    validate_body(&req)?;

    let order = state
        .lifecycle
        .deliver(&actor, order_id, &req.message, &req.files)
        .await
        .map_err(error_response)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(order.into()))))
}

/// Client requests a revision
///
/// POST /api/v1/orders/{order_id}/request-revision
#[utoipa::path(
    post,
    path = "/api/v1/orders/{order_id}/request-revision",
    params(("order_id" = i64, Path, description = "Order ID")),
    request_body = RevisionRequest,
    responses(
        (status = 200, description = "Revision requested", body = ApiResponse<OrderApiData>),
        (status = 400, description = "Reason too short or budget exhausted"),
        (status = 409, description = "Order not delivered")
    ),
    tag = "Orders"
)]
pub async fn request_revision(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(order_id): Path<i64>,
    Json(req): Json<RevisionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderApiData>>), ErrorResponse> {
    let actor = actor_from(&claims)?;
    validate_body(&req)?;

    let order = state
        .lifecycle
        .request_revision(&actor, order_id, &req.reason)
        .await
        .map_err(error_response)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(order.into()))))
}

/// Client completes a delivered order (triggers the commission split and
/// the student's balance credit, atomically)
///
/// POST /api/v1/orders/{order_id}/complete
#[utoipa::path(
    post,
    path = "/api/v1/orders/{order_id}/complete",
    params(("order_id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Completed", body = ApiResponse<OrderApiData>),
        (status = 409, description = "Order not delivered or payment not confirmed")
    ),
    tag = "Orders"
)]
pub async fn complete_order(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(order_id): Path<i64>,
) -> Result<(StatusCode, Json<ApiResponse<OrderApiData>>), ErrorResponse> {
    let actor = actor_from(&claims)?;
    let order = state
        .lifecycle
        .complete(&actor, order_id)
        .await
        .map_err(error_response)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(order.into()))))
}

/// Admin cancels an order (also mounted under /admin)
pub async fn cancel_order(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(order_id): Path<i64>,
    Json(req): Json<CancelRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderApiData>>), ErrorResponse> {
    let actor = actor_from(&claims)?;
    let order = state
        .lifecycle
        .cancel(&actor, order_id, req.reason.as_deref())
        .await
        .map_err(error_response)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(order.into()))))
}

/// Transition history of an order (parties and admin)
///
/// GET /api/v1/orders/{order_id}/audit
#[utoipa::path(
    get,
    path = "/api/v1/orders/{order_id}/audit",
    params(("order_id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Audit trail", body = ApiResponse<Vec<AuditEntry>>),
        (status = 403, description = "Not a party to this order")
    ),
    tag = "Orders"
)]
pub async fn get_order_audit(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(order_id): Path<i64>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<AuditEntry>>>), ErrorResponse> {
    let actor = actor_from(&claims)?;
    state
        .lifecycle
        .get_checked(&actor, order_id)
        .await
        .map_err(error_response)?;

    let entries = AuditRepository::list_for_order(state.db.pool(), order_id)
        .await
        .map_err(error_response)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(entries))))
}
