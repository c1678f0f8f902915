//! Account handlers: profile, balance, withdrawals

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

use super::{ErrorResponse, actor_from, error_response, validate_body};
use crate::account::{Role, StudentProfile, StudentProfileRepository};
use crate::balance::BalanceEngine;
use crate::error::MarketError;
use crate::gateway::state::AppState;
use crate::gateway::types::ApiResponse;
use crate::user_auth::Claims;

/// Request body for a withdrawal
#[derive(Debug, Deserialize, ToSchema)]
pub struct WithdrawRequest {
    #[schema(value_type = String, example = "40.00")]
    pub amount: Decimal,
}

/// Request body for profile updates
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 2000))]
    pub skills: String,
    pub portfolio_files: Vec<String>,
}

/// Withdrawal history entry
#[derive(Debug, serde::Serialize, ToSchema)]
pub struct WithdrawalApiData {
    pub withdrawal_id: i64,
    #[schema(value_type = String, example = "40.00")]
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

fn require_student(actor: &crate::policy::Actor) -> Result<(), ErrorResponse> {
    if actor.role != Role::Student {
        return Err(error_response(MarketError::Forbidden));
    }
    Ok(())
}

/// Student earnings profile (balance, skills, portfolio)
///
/// GET /api/v1/account/profile
#[utoipa::path(
    get,
    path = "/api/v1/account/profile",
    responses(
        (status = 200, description = "Profile", body = ApiResponse<StudentProfile>),
        (status = 403, description = "Students only"),
        (status = 404, description = "No profile")
    ),
    tag = "Account"
)]
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<(StatusCode, Json<ApiResponse<StudentProfile>>), ErrorResponse> {
    let actor = actor_from(&claims)?;
    require_student(&actor)?;

    let profile = StudentProfileRepository::get(state.db.pool(), actor.user_id)
        .await
        .map_err(|e| error_response(e.into()))?
        .ok_or_else(|| error_response(MarketError::not_found("student profile", actor.user_id)))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(profile))))
}

/// Update skills / portfolio
///
/// PUT /api/v1/account/profile
#[utoipa::path(
    put,
    path = "/api/v1/account/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<StudentProfile>),
        (status = 403, description = "Students only")
    ),
    tag = "Account"
)]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<(StatusCode, Json<ApiResponse<StudentProfile>>), ErrorResponse> {
    let actor = actor_from(&claims)?;
    require_student(&actor)?;
    validate_body(&req)?;

    let updated = StudentProfileRepository::update_profile(
        state.db.pool(),
        actor.user_id,
        &req.skills,
        &req.portfolio_files,
    )
    .await
    .map_err(|e| error_response(e.into()))?;

    if !updated {
        return Err(error_response(MarketError::not_found(
            "student profile",
            actor.user_id,
        )));
    }

    let profile = StudentProfileRepository::get(state.db.pool(), actor.user_id)
        .await
        .map_err(|e| error_response(e.into()))?
        .ok_or_else(|| error_response(MarketError::not_found("student profile", actor.user_id)))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(profile))))
}

/// Withdraw from the available balance
///
/// POST /api/v1/account/withdrawals
#[utoipa::path(
    post,
    path = "/api/v1/account/withdrawals",
    request_body = WithdrawRequest,
    responses(
        (status = 201, description = "Withdrawal recorded", body = ApiResponse<WithdrawalApiData>),
        (status = 400, description = "Invalid amount or insufficient balance"),
        (status = 403, description = "Students only")
    ),
    tag = "Account"
)]
pub async fn request_withdrawal(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<WithdrawRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WithdrawalApiData>>), ErrorResponse> {
    let actor = actor_from(&claims)?;
    require_student(&actor)?;

    let withdrawal = BalanceEngine::request_withdrawal(state.db.pool(), actor.user_id, req.amount)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(WithdrawalApiData {
            withdrawal_id: withdrawal.withdrawal_id,
            amount: withdrawal.amount,
            created_at: withdrawal.created_at,
        })),
    ))
}

/// Withdrawal history
///
/// GET /api/v1/account/withdrawals
#[utoipa::path(
    get,
    path = "/api/v1/account/withdrawals",
    params(("limit" = Option<i64>, Query, description = "Max rows (default 50)")),
    responses(
        (status = 200, description = "Withdrawals", body = ApiResponse<Vec<WithdrawalApiData>>),
        (status = 403, description = "Students only")
    ),
    tag = "Account"
)]
pub async fn list_withdrawals(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<HistoryQuery>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<WithdrawalApiData>>>), ErrorResponse> {
    let actor = actor_from(&claims)?;
    require_student(&actor)?;

    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let rows = BalanceEngine::list_withdrawals(state.db.pool(), actor.user_id, limit)
        .await
        .map_err(error_response)?;

    let data = rows
        .into_iter()
        .map(|(withdrawal_id, amount, created_at)| WithdrawalApiData {
            withdrawal_id,
            amount,
            created_at,
        })
        .collect();

    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}
