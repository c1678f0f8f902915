//! Order data models and request DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::status::OrderStatus;

/// An order joining a client to a student for one service.
///
/// `commission_rate` is frozen at creation time; the live platform rate is
/// never consulted again for this order.
#[derive(Debug, Clone)]
pub struct Order {
    pub order_id: i64,
    pub client_id: i64,
    pub student_id: i64,
    pub service_id: i64,
    pub status: OrderStatus,
    pub price: Decimal,
    pub commission_rate: Decimal,
    pub revision_count: i32,
    pub max_revisions: i32,
    pub deadline: Option<DateTime<Utc>>,
    pub requirements: String,
    pub delivery_message: Option<String>,
    pub delivery_files: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for placing an order
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PlaceOrderRequest {
    #[schema(example = 12)]
    pub service_id: i64,
    #[schema(example = "A 2-page landing site, copy attached.")]
    #[validate(length(min = 10, max = 5000))]
    pub requirements: String,
}

/// Request body for a delivery
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DeliverRequest {
    #[schema(example = "Final files attached, let me know!")]
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
    /// References previously returned by the upload endpoint
    #[validate(length(min = 1))]
    pub files: Vec<String>,
}

/// Request body for a revision request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RevisionRequest {
    #[schema(example = "The header color is wrong, see brief section 2.")]
    #[validate(length(min = 10, max = 2000))]
    pub reason: String,
}

/// Request body for an admin cancellation
#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelRequest {
    #[schema(example = "Chargeback received")]
    pub reason: Option<String>,
}

/// Order as returned by the API
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderApiData {
    pub order_id: i64,
    pub client_id: i64,
    pub student_id: i64,
    pub service_id: i64,
    #[schema(example = "IN_PROGRESS")]
    pub status: String,
    #[schema(value_type = String, example = "100.00")]
    pub price: Decimal,
    #[schema(value_type = String, example = "15")]
    pub commission_rate: Decimal,
    pub revision_count: i32,
    pub max_revisions: i32,
    pub deadline: Option<DateTime<Utc>>,
    pub requirements: String,
    pub delivery_message: Option<String>,
    pub delivery_files: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderApiData {
    fn from(o: Order) -> Self {
        Self {
            order_id: o.order_id,
            client_id: o.client_id,
            student_id: o.student_id,
            service_id: o.service_id,
            status: o.status.as_str().to_string(),
            price: o.price,
            commission_rate: o.commission_rate,
            revision_count: o.revision_count,
            max_revisions: o.max_revisions,
            deadline: o.deadline,
            requirements: o.requirements,
            delivery_message: o.delivery_message,
            delivery_files: o.delivery_files,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deliver_request_validation() {
        let req = DeliverRequest {
            message: String::new(),
            files: vec![],
        };
        let errs = req.validate().unwrap_err();
        assert!(errs.field_errors().contains_key("message"));
        assert!(errs.field_errors().contains_key("files"));

        let req = DeliverRequest {
            message: "done".to_string(),
            files: vec!["ref-1".to_string()],
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_revision_reason_min_length() {
        let req = RevisionRequest {
            reason: "too short".to_string(), // 9 chars
        };
        assert!(req.validate().is_err());

        let req = RevisionRequest {
            reason: "long enough reason".to_string(),
        };
        assert!(req.validate().is_ok());
    }
}
