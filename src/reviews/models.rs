//! Review models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A client's review of a completed order
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Review {
    pub review_id: i64,
    pub order_id: i64,
    pub service_id: i64,
    pub client_id: i64,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for posting a review
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReviewRequest {
    #[schema(example = 5)]
    #[validate(range(min = 1, max = 5))]
    pub rating: i16,
    #[schema(example = "Fast turnaround, exactly the brief.")]
    #[validate(length(min = 1, max = 2000))]
    pub comment: String,
}

/// Request body for editing a review (within the edit window)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReviewRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: i16,
    #[validate(length(min = 1, max = 2000))]
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_range() {
        for rating in 1..=5 {
            let req = CreateReviewRequest {
                rating,
                comment: "fine".to_string(),
            };
            assert!(req.validate().is_ok(), "rating {} should pass", rating);
        }
        for rating in [0, 6, -1] {
            let req = CreateReviewRequest {
                rating,
                comment: "fine".to_string(),
            };
            assert!(req.validate().is_err(), "rating {} should fail", rating);
        }
    }
}
