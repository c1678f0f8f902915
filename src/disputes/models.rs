//! Dispute models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use validator::Validate;

/// Dispute states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum DisputeStatus {
    Open = 0,
    /// Admin sided with the complainant; the order was cancelled
    ResolvedCancelled = 1,
    /// Admin upheld the order as-is
    ResolvedUpheld = 2,
}

impl DisputeStatus {
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(DisputeStatus::Open),
            1 => Some(DisputeStatus::ResolvedCancelled),
            2 => Some(DisputeStatus::ResolvedUpheld),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisputeStatus::Open => "OPEN",
            DisputeStatus::ResolvedCancelled => "RESOLVED_CANCELLED",
            DisputeStatus::ResolvedUpheld => "RESOLVED_UPHELD",
        }
    }
}

impl fmt::Display for DisputeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dispute raised against an order
#[derive(Debug, Clone)]
pub struct Dispute {
    pub dispute_id: i64,
    pub order_id: i64,
    pub opened_by: i64,
    pub reason: String,
    pub status: DisputeStatus,
    pub resolved_by: Option<i64>,
    pub resolution_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Request body for opening a dispute
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct OpenDisputeRequest {
    pub order_id: i64,
    #[schema(example = "Delivery does not match the agreed brief.")]
    #[validate(length(min = 10, max = 2000))]
    pub reason: String,
}

/// Request body for resolving a dispute
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResolveDisputeRequest {
    /// "cancel" cancels the order, "uphold" leaves it standing
    #[schema(example = "cancel")]
    pub resolution: String,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

/// Dispute as returned by the API
#[derive(Debug, Serialize, ToSchema)]
pub struct DisputeApiData {
    pub dispute_id: i64,
    pub order_id: i64,
    pub opened_by: i64,
    pub reason: String,
    #[schema(example = "OPEN")]
    pub status: String,
    pub resolved_by: Option<i64>,
    pub resolution_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl From<Dispute> for DisputeApiData {
    fn from(d: Dispute) -> Self {
        Self {
            dispute_id: d.dispute_id,
            order_id: d.order_id,
            opened_by: d.opened_by,
            reason: d.reason,
            status: d.status.as_str().to_string(),
            resolved_by: d.resolved_by,
            resolution_note: d.resolution_note,
            created_at: d.created_at,
            resolved_at: d.resolved_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_id_roundtrip() {
        for status in [
            DisputeStatus::Open,
            DisputeStatus::ResolvedCancelled,
            DisputeStatus::ResolvedUpheld,
        ] {
            assert_eq!(DisputeStatus::from_id(status.id()), Some(status));
        }
        assert!(DisputeStatus::from_id(7).is_none());
    }
}
