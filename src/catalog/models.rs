//! Service listing models and DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use validator::Validate;

/// Listing states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum ServiceStatus {
    Draft = 0,
    Active = 1,
    Paused = 2,
    Retired = 3,
}

impl ServiceStatus {
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(ServiceStatus::Draft),
            1 => Some(ServiceStatus::Active),
            2 => Some(ServiceStatus::Paused),
            3 => Some(ServiceStatus::Retired),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Draft => "DRAFT",
            ServiceStatus::Active => "ACTIVE",
            ServiceStatus::Paused => "PAUSED",
            ServiceStatus::Retired => "RETIRED",
        }
    }

    /// Only active listings are orderable
    #[inline]
    pub fn is_orderable(&self) -> bool {
        *self == ServiceStatus::Active
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A service a student offers
#[derive(Debug, Clone)]
pub struct Service {
    pub service_id: i64,
    pub student_id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub delivery_days: i32,
    pub max_revisions: i32,
    pub status: ServiceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a listing
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateServiceRequest {
    #[schema(example = "Logo design")]
    #[validate(length(min = 4, max = 160))]
    pub title: String,
    #[schema(example = "Three concepts, vector source files included.")]
    #[validate(length(min = 20, max = 10000))]
    pub description: String,
    #[schema(example = "design")]
    #[validate(length(min = 2, max = 64))]
    pub category: String,
    #[schema(value_type = String, example = "50.00")]
    pub price: Decimal,
    #[schema(example = 3)]
    #[validate(range(min = 1, max = 90))]
    pub delivery_days: i32,
    /// Optional; platform default applies when omitted
    pub max_revisions: Option<i32>,
}

/// Request body for updating a listing
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateServiceRequest {
    #[validate(length(min = 4, max = 160))]
    pub title: Option<String>,
    #[validate(length(min = 20, max = 10000))]
    pub description: Option<String>,
    #[validate(length(min = 2, max = 64))]
    pub category: Option<String>,
    #[schema(value_type = Option<String>, example = "60.00")]
    pub price: Option<Decimal>,
    #[validate(range(min = 1, max = 90))]
    pub delivery_days: Option<i32>,
    #[validate(range(min = 0, max = 10))]
    pub max_revisions: Option<i32>,
}

/// Request body for changing a listing's status
#[derive(Debug, Deserialize, ToSchema)]
pub struct ServiceStatusRequest {
    /// One of: DRAFT, ACTIVE, PAUSED, RETIRED
    #[schema(example = "ACTIVE")]
    pub status: String,
}

/// Listing as returned by the API
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceApiData {
    pub service_id: i64,
    pub student_id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    #[schema(value_type = String, example = "50.00")]
    pub price: Decimal,
    pub delivery_days: i32,
    pub max_revisions: i32,
    #[schema(example = "ACTIVE")]
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Service> for ServiceApiData {
    fn from(s: Service) -> Self {
        Self {
            service_id: s.service_id,
            student_id: s.student_id,
            title: s.title,
            description: s.description,
            category: s.category,
            price: s.price,
            delivery_days: s.delivery_days,
            max_revisions: s.max_revisions,
            status: s.status.as_str().to_string(),
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_id_roundtrip() {
        for status in [
            ServiceStatus::Draft,
            ServiceStatus::Active,
            ServiceStatus::Paused,
            ServiceStatus::Retired,
        ] {
            assert_eq!(ServiceStatus::from_id(status.id()), Some(status));
        }
        assert!(ServiceStatus::from_id(9).is_none());
    }

    #[test]
    fn test_only_active_is_orderable() {
        assert!(ServiceStatus::Active.is_orderable());
        assert!(!ServiceStatus::Draft.is_orderable());
        assert!(!ServiceStatus::Paused.is_orderable());
        assert!(!ServiceStatus::Retired.is_orderable());
    }
}
