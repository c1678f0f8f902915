//! Message persistence

use sqlx::{PgPool, Row};

use super::models::Message;
use crate::error::MarketError;

pub struct MessageRepository;

impl MessageRepository {
    /// Append a message to an order's thread
    pub async fn create(
        pool: &PgPool,
        order_id: i64,
        sender_id: i64,
        body: &str,
        attachment: Option<&str>,
    ) -> Result<Message, MarketError> {
        let row = sqlx::query(
            r#"
            INSERT INTO messages_tb (order_id, sender_id, body, attachment)
            VALUES ($1, $2, $3, $4)
            RETURNING message_id, order_id, sender_id, body, attachment, created_at
            "#,
        )
        .bind(order_id)
        .bind(sender_id)
        .bind(body)
        .bind(attachment)
        .fetch_one(pool)
        .await?;

        Ok(row_to_message(&row))
    }

    /// Thread for an order, oldest first
    pub async fn list_by_order(
        pool: &PgPool,
        order_id: i64,
        limit: i64,
    ) -> Result<Vec<Message>, MarketError> {
        let rows = sqlx::query(
            r#"
            SELECT message_id, order_id, sender_id, body, attachment, created_at
            FROM messages_tb
            WHERE order_id = $1
            ORDER BY created_at ASC
            LIMIT $2
            "#,
        )
        .bind(order_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(rows.iter().map(row_to_message).collect())
    }
}

fn row_to_message(row: &sqlx::postgres::PgRow) -> Message {
    Message {
        message_id: row.get("message_id"),
        order_id: row.get("order_id"),
        sender_id: row.get("sender_id"),
        body: row.get("body"),
        attachment: row.get("attachment"),
        created_at: row.get("created_at"),
    }
}
