//! Review handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ErrorResponse, actor_from, error_response, validate_body};
use crate::account::Role;
use crate::error::MarketError;
use crate::gateway::state::AppState;
use crate::gateway::types::ApiResponse;
use crate::reviews::models::{CreateReviewRequest, Review, UpdateReviewRequest};
use crate::reviews::repository::ReviewRepository;
use crate::user_auth::Claims;

#[derive(Debug, Deserialize)]
pub struct ReviewListQuery {
    pub limit: Option<i64>,
}

/// Post a review for a completed order (client only, one per order)
///
/// POST /api/v1/orders/{order_id}/review
#[utoipa::path(
    post,
    path = "/api/v1/orders/{order_id}/review",
    params(("order_id" = i64, Path, description = "Order ID")),
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review posted", body = ApiResponse<Review>),
        (status = 403, description = "Not the ordering client"),
        (status = 409, description = "Order not completed or already reviewed")
    ),
    tag = "Reviews"
)]
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(order_id): Path<i64>,
    Json(req): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Review>>), ErrorResponse> {
    let actor = actor_from(&claims)?;
    validate_body(&req)?;

    let order = state
        .lifecycle
        .get_checked(&actor, order_id)
        .await
        .map_err(error_response)?;

    // Only the ordering client reviews; viewing rights aren't enough
    if actor.role != Role::Client || order.client_id != actor.user_id {
        return Err(error_response(MarketError::Forbidden));
    }

    let review = ReviewRepository::create(state.db.pool(), &order, req.rating, &req.comment)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(review)),
    ))
}

/// Edit an own review within the edit window
///
/// PUT /api/v1/reviews/{review_id}
#[utoipa::path(
    put,
    path = "/api/v1/reviews/{review_id}",
    params(("review_id" = i64, Path, description = "Review ID")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ApiResponse<Review>),
        (status = 409, description = "Window expired or not the author")
    ),
    tag = "Reviews"
)]
pub async fn update_review(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(review_id): Path<i64>,
    Json(req): Json<UpdateReviewRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Review>>), ErrorResponse> {
    let actor = actor_from(&claims)?;
    validate_body(&req)?;

    let updated = ReviewRepository::update_within_window(
        state.db.pool(),
        review_id,
        actor.user_id,
        req.rating,
        &req.comment,
        state.config.market.review_edit_window_hours,
    )
    .await
    .map_err(error_response)?;

    match updated {
        Some(review) => Ok((StatusCode::OK, Json(ApiResponse::success(review)))),
        None => Err(error_response(MarketError::conflict(
            "review not editable: window expired, or not the author",
        ))),
    }
}

/// Public reviews for a service
///
/// GET /api/v1/services/{service_id}/reviews
#[utoipa::path(
    get,
    path = "/api/v1/services/{service_id}/reviews",
    params(
        ("service_id" = i64, Path, description = "Service ID"),
        ("limit" = Option<i64>, Query, description = "Max rows (default 50)")
    ),
    responses(
        (status = 200, description = "Reviews", body = ApiResponse<Vec<Review>>)
    ),
    tag = "Reviews"
)]
pub async fn list_service_reviews(
    State(state): State<Arc<AppState>>,
    Path(service_id): Path<i64>,
    Query(query): Query<ReviewListQuery>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<Review>>>), ErrorResponse> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let reviews = ReviewRepository::list_by_service(state.db.pool(), service_id, limit)
        .await
        .map_err(error_response)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(reviews))))
}
