//! Service catalog handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ErrorResponse, actor_from, error_response, validate_body};
use crate::catalog::models::{
    CreateServiceRequest, ServiceApiData, ServiceStatus, ServiceStatusRequest,
    UpdateServiceRequest,
};
use crate::catalog::repository::ServiceRepository;
use crate::error::MarketError;
use crate::gateway::state::AppState;
use crate::gateway::types::ApiResponse;
use crate::policy::service::{ServiceAction, allows, allows_create};
use crate::user_auth::Claims;

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub limit: Option<i64>,
}

impl CatalogQuery {
    fn limit(&self) -> i64 {
        self.limit.unwrap_or(50).clamp(1, 200)
    }
}

/// Create a listing (students only, starts as DRAFT)
///
/// POST /api/v1/services
#[utoipa::path(
    post,
    path = "/api/v1/services",
    request_body = CreateServiceRequest,
    responses(
        (status = 201, description = "Listing created", body = ApiResponse<ServiceApiData>),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Only students create listings")
    ),
    tag = "Services"
)]
pub async fn create_service(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ServiceApiData>>), ErrorResponse> {
    let actor = actor_from(&claims)?;
    validate_body(&req)?;

    if !allows_create(&actor) {
        return Err(error_response(MarketError::Forbidden));
    }
    if req.price <= rust_decimal::Decimal::ZERO || req.price.round_dp(2) != req.price {
        return Err(error_response(MarketError::validation(
            "price",
            "price must be positive with at most 2 decimals",
        )));
    }

    let service = ServiceRepository::create(
        state.db.pool(),
        actor.user_id,
        &req,
        state.config.market.default_max_revisions,
    )
    .await
    .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(service.into())),
    ))
}

/// Public catalog of active listings
///
/// GET /api/v1/services
#[utoipa::path(
    get,
    path = "/api/v1/services",
    params(
        ("category" = Option<String>, Query, description = "Filter by category"),
        ("limit" = Option<i64>, Query, description = "Max rows (default 50)")
    ),
    responses(
        (status = 200, description = "Active listings", body = ApiResponse<Vec<ServiceApiData>>)
    ),
    tag = "Services"
)]
pub async fn list_services(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CatalogQuery>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<ServiceApiData>>>), ErrorResponse> {
    let services =
        ServiceRepository::list_active(state.db.pool(), query.category.as_deref(), query.limit())
            .await
            .map_err(error_response)?;

    let data = services.into_iter().map(ServiceApiData::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

/// Get one listing (public)
///
/// GET /api/v1/services/{service_id}
#[utoipa::path(
    get,
    path = "/api/v1/services/{service_id}",
    params(("service_id" = i64, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Listing", body = ApiResponse<ServiceApiData>),
        (status = 404, description = "No such listing")
    ),
    tag = "Services"
)]
pub async fn get_service(
    State(state): State<Arc<AppState>>,
    Path(service_id): Path<i64>,
) -> Result<(StatusCode, Json<ApiResponse<ServiceApiData>>), ErrorResponse> {
    let service = ServiceRepository::get(state.db.pool(), service_id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| error_response(MarketError::not_found("service", service_id)))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(service.into()))))
}

/// The caller's own listings, any status
///
/// GET /api/v1/services/mine
#[utoipa::path(
    get,
    path = "/api/v1/services/mine",
    responses(
        (status = 200, description = "Own listings", body = ApiResponse<Vec<ServiceApiData>>)
    ),
    tag = "Services"
)]
pub async fn list_my_services(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<ServiceApiData>>>), ErrorResponse> {
    let actor = actor_from(&claims)?;
    let services = ServiceRepository::list_by_student(state.db.pool(), actor.user_id)
        .await
        .map_err(error_response)?;

    let data = services.into_iter().map(ServiceApiData::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

/// Update a listing (owner or admin)
///
/// PUT /api/v1/services/{service_id}
#[utoipa::path(
    put,
    path = "/api/v1/services/{service_id}",
    params(("service_id" = i64, Path, description = "Service ID")),
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<ServiceApiData>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "No such listing")
    ),
    tag = "Services"
)]
pub async fn update_service(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(service_id): Path<i64>,
    Json(req): Json<UpdateServiceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ServiceApiData>>), ErrorResponse> {
    let actor = actor_from(&claims)?;
    validate_body(&req)?;

    let service = ServiceRepository::get(state.db.pool(), service_id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| error_response(MarketError::not_found("service", service_id)))?;

    if !allows(&actor, &service, ServiceAction::Edit) {
        return Err(error_response(MarketError::Forbidden));
    }
    if let Some(price) = req.price {
        if price <= rust_decimal::Decimal::ZERO || price.round_dp(2) != price {
            return Err(error_response(MarketError::validation(
                "price",
                "price must be positive with at most 2 decimals",
            )));
        }
    }

    let updated = ServiceRepository::update(state.db.pool(), service_id, &req)
        .await
        .map_err(error_response)?
        .ok_or_else(|| error_response(MarketError::not_found("service", service_id)))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(updated.into()))))
}

/// Change a listing's status (owner or admin)
///
/// POST /api/v1/services/{service_id}/status
#[utoipa::path(
    post,
    path = "/api/v1/services/{service_id}/status",
    params(("service_id" = i64, Path, description = "Service ID")),
    request_body = ServiceStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<ServiceApiData>),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Not the owner")
    ),
    tag = "Services"
)]
pub async fn set_service_status(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(service_id): Path<i64>,
    Json(req): Json<ServiceStatusRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ServiceApiData>>), ErrorResponse> {
    let actor = actor_from(&claims)?;

    let new_status = match req.status.as_str() {
        "DRAFT" => ServiceStatus::Draft,
        "ACTIVE" => ServiceStatus::Active,
        "PAUSED" => ServiceStatus::Paused,
        "RETIRED" => ServiceStatus::Retired,
        other => {
            return Err(error_response(MarketError::validation(
                "status",
                format!("unknown status '{}'", other),
            )));
        }
    };

    let service = ServiceRepository::get(state.db.pool(), service_id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| error_response(MarketError::not_found("service", service_id)))?;

    let action = if new_status == ServiceStatus::Active {
        ServiceAction::Activate
    } else {
        ServiceAction::Edit
    };
    if !allows(&actor, &service, action) {
        return Err(error_response(MarketError::Forbidden));
    }

    ServiceRepository::set_status(state.db.pool(), service_id, new_status)
        .await
        .map_err(error_response)?;

    let updated = ServiceRepository::get(state.db.pool(), service_id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| error_response(MarketError::not_found("service", service_id)))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(updated.into()))))
}
