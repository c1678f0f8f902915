//! Order messaging handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ErrorResponse, actor_from, error_response, validate_body};
use crate::error::MarketError;
use crate::gateway::state::AppState;
use crate::gateway::types::ApiResponse;
use crate::messages::models::{Message, SendMessageRequest};
use crate::messages::repository::MessageRepository;
use crate::orders::repository::OrderRepository;
use crate::policy::message::{MessageAction, allows};
use crate::user_auth::Claims;

#[derive(Debug, Deserialize)]
pub struct ThreadQuery {
    pub limit: Option<i64>,
}

/// Send a message on an order thread (parties and admin)
///
/// POST /api/v1/orders/{order_id}/messages
#[utoipa::path(
    post,
    path = "/api/v1/orders/{order_id}/messages",
    params(("order_id" = i64, Path, description = "Order ID")),
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = ApiResponse<Message>),
        (status = 403, description = "Not a party to this order"),
        (status = 404, description = "No such order")
    ),
    tag = "Messages"
)]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(order_id): Path<i64>,
    Json(req): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Message>>), ErrorResponse> {
    let actor = actor_from(&claims)?;
    validate_body(&req)?;

    let order = OrderRepository::get(state.db.pool(), order_id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| error_response(MarketError::not_found("order", order_id)))?;

    if !allows(&actor, &order, MessageAction::Send) {
        return Err(error_response(MarketError::Forbidden));
    }

    let message = MessageRepository::create(
        state.db.pool(),
        order_id,
        actor.user_id,
        &req.body,
        req.attachment.as_deref(),
    )
    .await
    .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(message))))
}

/// Read an order's message thread (parties and admin)
///
/// GET /api/v1/orders/{order_id}/messages
#[utoipa::path(
    get,
    path = "/api/v1/orders/{order_id}/messages",
    params(
        ("order_id" = i64, Path, description = "Order ID"),
        ("limit" = Option<i64>, Query, description = "Max rows (default 100)")
    ),
    responses(
        (status = 200, description = "Messages", body = ApiResponse<Vec<Message>>),
        (status = 403, description = "Not a party to this order")
    ),
    tag = "Messages"
)]
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(order_id): Path<i64>,
    Query(query): Query<ThreadQuery>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<Message>>>), ErrorResponse> {
    let actor = actor_from(&claims)?;

    let order = OrderRepository::get(state.db.pool(), order_id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| error_response(MarketError::not_found("order", order_id)))?;

    if !allows(&actor, &order, MessageAction::View) {
        return Err(error_response(MarketError::Forbidden));
    }

    let limit = query.limit.unwrap_or(100).clamp(1, 500);
    let messages = MessageRepository::list_by_order(state.db.pool(), order_id, limit)
        .await
        .map_err(error_response)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(messages))))
}
