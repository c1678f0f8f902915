//! Review persistence
//!
//! The edit path is a conditional update carrying the ownership and the
//! edit window in its WHERE clause, so an expired or foreign edit affects
//! zero rows and surfaces as a conflict.

use sqlx::{PgPool, Row};

use super::models::Review;
use crate::error::MarketError;
use crate::orders::models::Order;
use crate::orders::status::OrderStatus;

const REVIEW_COLUMNS: &str =
    r#"review_id, order_id, service_id, client_id, rating, comment, created_at, updated_at"#;

pub struct ReviewRepository;

impl ReviewRepository {
    /// Post a review for a completed order.
    ///
    /// The UNIQUE(order_id) constraint enforces the 1:1 with the order; a
    /// second attempt conflicts.
    pub async fn create(
        pool: &PgPool,
        order: &Order,
        rating: i16,
        comment: &str,
    ) -> Result<Review, MarketError> {
        if order.status != OrderStatus::Completed {
            return Err(MarketError::conflict(format!(
                "order {} is {}, only completed orders can be reviewed",
                order.order_id, order.status
            )));
        }

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO reviews_tb (order_id, service_id, client_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (order_id) DO NOTHING
            RETURNING {REVIEW_COLUMNS}
            "#
        ))
        .bind(order.order_id)
        .bind(order.service_id)
        .bind(order.client_id)
        .bind(rating)
        .bind(comment)
        .fetch_optional(pool)
        .await?;

        match row {
            Some(row) => Ok(row_to_review(&row)),
            None => Err(MarketError::conflict(format!(
                "order {} already has a review",
                order.order_id
            ))),
        }
    }

    /// Edit a review within the window. The WHERE clause owns all the
    /// rules: right author, clock still inside the window.
    pub async fn update_within_window(
        pool: &PgPool,
        review_id: i64,
        client_id: i64,
        rating: i16,
        comment: &str,
        window_hours: i64,
    ) -> Result<Option<Review>, MarketError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE reviews_tb
            SET rating = $1, comment = $2, updated_at = NOW()
            WHERE review_id = $3
              AND client_id = $4
              AND created_at > NOW() - INTERVAL '1 hour' * $5
            RETURNING {REVIEW_COLUMNS}
            "#
        ))
        .bind(rating)
        .bind(comment)
        .bind(review_id)
        .bind(client_id)
        .bind(window_hours as f64)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|r| row_to_review(&r)))
    }

    /// Get the review for an order
    pub async fn get_by_order(pool: &PgPool, order_id: i64) -> Result<Option<Review>, MarketError> {
        let row = sqlx::query(&format!(
            r#"SELECT {REVIEW_COLUMNS} FROM reviews_tb WHERE order_id = $1"#
        ))
        .bind(order_id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|r| row_to_review(&r)))
    }

    /// Public listing for a service, newest first
    pub async fn list_by_service(
        pool: &PgPool,
        service_id: i64,
        limit: i64,
    ) -> Result<Vec<Review>, MarketError> {
        let rows = sqlx::query(&format!(
            r#"SELECT {REVIEW_COLUMNS} FROM reviews_tb
               WHERE service_id = $1 ORDER BY created_at DESC LIMIT $2"#
        ))
        .bind(service_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(rows.iter().map(row_to_review).collect())
    }
}

fn row_to_review(row: &sqlx::postgres::PgRow) -> Review {
    Review {
        review_id: row.get("review_id"),
        order_id: row.get("order_id"),
        service_id: row.get("service_id"),
        client_id: row.get("client_id"),
        rating: row.get("rating"),
        comment: row.get("comment"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
