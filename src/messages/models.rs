//! Message models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// One message in an order's thread
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Message {
    pub message_id: i64,
    pub order_id: i64,
    pub sender_id: i64,
    pub body: String,
    /// Optional stored file reference
    pub attachment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request body for sending a message
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendMessageRequest {
    #[schema(example = "Could you use the darker blue from the brief?")]
    #[validate(length(min = 1, max = 5000))]
    pub body: String,
    pub attachment: Option<String>,
}
