//! Upload handler: stores raw bytes through the file-storage collaborator
//! and hands back the reference the order endpoints expect.

use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::{ErrorResponse, actor_from, error_response};
use crate::gateway::state::AppState;
use crate::gateway::types::ApiResponse;
use crate::user_auth::Claims;

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub filename: String,
}

/// Upload response
#[derive(Debug, serde::Serialize, ToSchema)]
pub struct UploadResponse {
    /// Opaque reference to pass in deliver/message payloads
    #[schema(example = "2c7a4fd0-...-delivery.zip")]
    pub file_ref: String,
}

/// Upload a file (any authenticated user)
///
/// POST /api/v1/files?filename=delivery.zip  (raw body)
#[utoipa::path(
    post,
    path = "/api/v1/files",
    params(("filename" = String, Query, description = "Original filename")),
    request_body(content = Vec<u8>, description = "Raw file bytes", content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "Stored", body = ApiResponse<UploadResponse>),
        (status = 400, description = "Empty or oversized upload")
    ),
    tag = "Files"
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<(StatusCode, Json<ApiResponse<UploadResponse>>), ErrorResponse> {
    let actor = actor_from(&claims)?;

    let file_ref = state
        .file_store
        .store(&query.filename, &body)
        .await
        .map_err(error_response)?;

    tracing::debug!(
        user_id = actor.user_id,
        filename = %query.filename,
        bytes = body.len(),
        "file stored"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UploadResponse {
            file_ref: file_ref.0,
        })),
    ))
}
