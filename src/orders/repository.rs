//! Order persistence
//!
//! All state updates are atomic CAS (Compare-And-Swap) operations: the
//! UPDATE carries the expected pre-state in its WHERE clause, so a losing
//! concurrent writer observes zero rows affected and reports a conflict
//! instead of double-applying a transition.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Row, Transaction};

use super::models::Order;
use super::status::OrderStatus;
use crate::error::MarketError;

/// Fields needed to insert a new order
#[derive(Debug)]
pub struct NewOrder {
    pub client_id: i64,
    pub student_id: i64,
    pub service_id: i64,
    pub price: Decimal,
    pub commission_rate: Decimal,
    pub max_revisions: i32,
    pub deadline: Option<DateTime<Utc>>,
    pub requirements: String,
}

const ORDER_COLUMNS: &str = r#"order_id, client_id, student_id, service_id, status, price,
       commission_rate, revision_count, max_revisions, deadline,
       requirements, delivery_message, delivery_files, created_at, updated_at"#;

pub struct OrderRepository;

impl OrderRepository {
    /// Insert a new order in PENDING state
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        new: &NewOrder,
    ) -> Result<Order, MarketError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO orders_tb
                (client_id, student_id, service_id, status, price, commission_rate,
                 max_revisions, deadline, requirements)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(new.client_id)
        .bind(new.student_id)
        .bind(new.service_id)
        .bind(OrderStatus::Pending.id())
        .bind(new.price)
        .bind(new.commission_rate)
        .bind(new.max_revisions)
        .bind(new.deadline)
        .bind(&new.requirements)
        .fetch_one(&mut **tx)
        .await?;

        row_to_order(&row)
    }

    /// Get an order by id
    pub async fn get(pool: &PgPool, order_id: i64) -> Result<Option<Order>, MarketError> {
        let row = sqlx::query(&format!(
            r#"SELECT {ORDER_COLUMNS} FROM orders_tb WHERE order_id = $1"#
        ))
        .bind(order_id)
        .fetch_optional(pool)
        .await?;

        match row {
            Some(row) => Ok(Some(row_to_order(&row)?)),
            None => Ok(None),
        }
    }

    /// Get an order by id with a row lock, inside a transaction
    pub async fn get_for_update(
        tx: &mut Transaction<'_, Postgres>,
        order_id: i64,
    ) -> Result<Option<Order>, MarketError> {
        let row = sqlx::query(&format!(
            r#"SELECT {ORDER_COLUMNS} FROM orders_tb WHERE order_id = $1 FOR UPDATE"#
        ))
        .bind(order_id)
        .fetch_optional(&mut **tx)
        .await?;

        match row {
            Some(row) => Ok(Some(row_to_order(&row)?)),
            None => Ok(None),
        }
    }

    /// Atomic CAS update: move to `new_status` only if the row currently sits
    /// in one of `expected`.
    ///
    /// Returns true if the transition was applied, false if the pre-state no
    /// longer matched (another writer got there first).
    pub async fn update_status_if(
        tx: &mut Transaction<'_, Postgres>,
        order_id: i64,
        expected: &[OrderStatus],
        new_status: OrderStatus,
    ) -> Result<bool, MarketError> {
        let expected_ids: Vec<i16> = expected.iter().map(|s| s.id()).collect();
        let result = sqlx::query(
            r#"
            UPDATE orders_tb
            SET status = $1, updated_at = NOW()
            WHERE order_id = $2 AND status = ANY($3)
            "#,
        )
        .bind(new_status.id())
        .bind(order_id)
        .bind(&expected_ids)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// CAS delivery: record message and files while moving to DELIVERED,
    /// valid from IN_PROGRESS or REVISION_REQUESTED.
    pub async fn set_delivery_if(
        tx: &mut Transaction<'_, Postgres>,
        order_id: i64,
        message: &str,
        files: &[String],
    ) -> Result<bool, MarketError> {
        let result = sqlx::query(
            r#"
            UPDATE orders_tb
            SET status = $1, delivery_message = $2, delivery_files = $3, updated_at = NOW()
            WHERE order_id = $4 AND status = ANY($5)
            "#,
        )
        .bind(OrderStatus::Delivered.id())
        .bind(message)
        .bind(files)
        .bind(order_id)
        .bind(&[
            OrderStatus::InProgress.id(),
            OrderStatus::RevisionRequested.id(),
        ][..])
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// CAS revision request: increment the counter while moving to
    /// REVISION_REQUESTED, guarded by the revision budget so a racing
    /// request can never push the counter past `max_revisions`.
    pub async fn increment_revision_if(
        tx: &mut Transaction<'_, Postgres>,
        order_id: i64,
    ) -> Result<bool, MarketError> {
        let result = sqlx::query(
            r#"
            UPDATE orders_tb
            SET status = $1, revision_count = revision_count + 1, updated_at = NOW()
            WHERE order_id = $2 AND status = $3 AND revision_count < max_revisions
            "#,
        )
        .bind(OrderStatus::RevisionRequested.id())
        .bind(order_id)
        .bind(OrderStatus::Delivered.id())
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List a client's orders, newest first
    pub async fn list_by_client(
        pool: &PgPool,
        client_id: i64,
        limit: i64,
    ) -> Result<Vec<Order>, MarketError> {
        let rows = sqlx::query(&format!(
            r#"SELECT {ORDER_COLUMNS} FROM orders_tb
               WHERE client_id = $1 ORDER BY created_at DESC LIMIT $2"#
        ))
        .bind(client_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        rows.iter().map(row_to_order).collect()
    }

    /// List a student's orders, newest first
    pub async fn list_by_student(
        pool: &PgPool,
        student_id: i64,
        limit: i64,
    ) -> Result<Vec<Order>, MarketError> {
        let rows = sqlx::query(&format!(
            r#"SELECT {ORDER_COLUMNS} FROM orders_tb
               WHERE student_id = $1 ORDER BY created_at DESC LIMIT $2"#
        ))
        .bind(student_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        rows.iter().map(row_to_order).collect()
    }

    /// Admin listing across all orders, optionally filtered by status
    pub async fn list_all(
        pool: &PgPool,
        status: Option<OrderStatus>,
        limit: i64,
    ) -> Result<Vec<Order>, MarketError> {
        let rows = match status {
            Some(status) => {
                sqlx::query(&format!(
                    r#"SELECT {ORDER_COLUMNS} FROM orders_tb
                       WHERE status = $1 ORDER BY created_at DESC LIMIT $2"#
                ))
                .bind(status.id())
                .bind(limit)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    r#"SELECT {ORDER_COLUMNS} FROM orders_tb
                       ORDER BY created_at DESC LIMIT $1"#
                ))
                .bind(limit)
                .fetch_all(pool)
                .await?
            }
        };

        rows.iter().map(row_to_order).collect()
    }
}

/// Convert database row to Order
fn row_to_order(row: &sqlx::postgres::PgRow) -> Result<Order, MarketError> {
    let status_id: i16 = row.get("status");
    let status = OrderStatus::from_id(status_id)
        .ok_or_else(|| MarketError::Integrity(format!("Invalid order state ID: {}", status_id)))?;

    Ok(Order {
        order_id: row.get("order_id"),
        client_id: row.get("client_id"),
        student_id: row.get("student_id"),
        service_id: row.get("service_id"),
        status,
        price: row.get("price"),
        commission_rate: row.get("commission_rate"),
        revision_count: row.get("revision_count"),
        max_revisions: row.get("max_revisions"),
        deadline: row.get("deadline"),
        requirements: row.get("requirements"),
        delivery_message: row.get("delivery_message"),
        delivery_files: row.get("delivery_files"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
