//! Admin handlers: moderation and the reconciliation report

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ErrorResponse, error_response};
use crate::audit::{BalanceDiscrepancy, reconcile_balances};
use crate::error::MarketError;
use crate::gateway::state::AppState;
use crate::gateway::types::ApiResponse;
use crate::orders::models::OrderApiData;
use crate::orders::repository::OrderRepository;
use crate::orders::status::OrderStatus;

#[derive(Debug, Deserialize)]
pub struct AdminOrdersQuery {
    /// Status name, e.g. DELIVERED
    pub status: Option<String>,
    pub limit: Option<i64>,
}

/// Admin: list orders across the platform
///
/// GET /api/v1/admin/orders
#[utoipa::path(
    get,
    path = "/api/v1/admin/orders",
    params(
        ("status" = Option<String>, Query, description = "Filter by status name"),
        ("limit" = Option<i64>, Query, description = "Max rows (default 100)")
    ),
    responses(
        (status = 200, description = "Orders", body = ApiResponse<Vec<OrderApiData>>),
        (status = 400, description = "Unknown status name")
    ),
    tag = "Admin"
)]
pub async fn list_all_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AdminOrdersQuery>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<OrderApiData>>>), ErrorResponse> {
    let status = match query.status.as_deref() {
        None => None,
        Some(name) => Some(parse_status(name).map_err(error_response)?),
    };

    let limit = query.limit.unwrap_or(100).clamp(1, 500);
    let orders = OrderRepository::list_all(state.db.pool(), status, limit)
        .await
        .map_err(error_response)?;

    let data = orders.into_iter().map(OrderApiData::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

/// Admin: run the read-only balance reconciliation audit.
///
/// Reports every student whose `available_balance + total_withdrawn`
/// disagrees with their settled earnings. An empty list is the healthy
/// answer; discrepancies are for manual follow-up, never auto-repaired.
///
/// GET /api/v1/admin/reconciliation
#[utoipa::path(
    get,
    path = "/api/v1/admin/reconciliation",
    responses(
        (status = 200, description = "Discrepancies (empty when healthy)", body = ApiResponse<Vec<BalanceDiscrepancy>>)
    ),
    tag = "Admin"
)]
pub async fn reconciliation_report(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<BalanceDiscrepancy>>>), ErrorResponse> {
    let discrepancies = reconcile_balances(state.db.pool())
        .await
        .map_err(error_response)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(discrepancies))))
}

fn parse_status(name: &str) -> Result<OrderStatus, MarketError> {
    match name {
        "PENDING" => Ok(OrderStatus::Pending),
        "IN_PROGRESS" => Ok(OrderStatus::InProgress),
        "DELIVERED" => Ok(OrderStatus::Delivered),
        "REVISION_REQUESTED" => Ok(OrderStatus::RevisionRequested),
        "COMPLETED" => Ok(OrderStatus::Completed),
        "CANCELLED" => Ok(OrderStatus::Cancelled),
        other => Err(MarketError::validation(
            "status",
            format!("unknown status '{}'", other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_names() {
        assert_eq!(parse_status("PENDING").unwrap(), OrderStatus::Pending);
        assert_eq!(
            parse_status("REVISION_REQUESTED").unwrap(),
            OrderStatus::RevisionRequested
        );
        assert!(parse_status("pending").is_err());
        assert!(parse_status("NOPE").is_err());
    }
}
