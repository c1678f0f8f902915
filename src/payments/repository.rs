//! Payment persistence
//!
//! The settlement update is a CAS on `settled = FALSE`, which is what makes
//! the balance credit idempotent per payment: a retried settlement sees zero
//! rows affected and applies nothing.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use super::models::{Payment, PaymentStatus};
use crate::error::MarketError;

const PAYMENT_COLUMNS: &str = r#"payment_id, order_id, amount, commission_rate,
       commission_amount, student_amount, status, settled, created_at, updated_at"#;

pub struct PaymentRepository;

impl PaymentRepository {
    /// Create the escrow payment row for a freshly placed order.
    ///
    /// Idempotent per order: the UNIQUE(order_id) constraint plus
    /// ON CONFLICT DO NOTHING means a duplicate placement attempt leaves
    /// the original row untouched.
    pub async fn create_pending(
        tx: &mut Transaction<'_, Postgres>,
        order_id: i64,
        amount: Decimal,
        commission_rate: Decimal,
    ) -> Result<String, MarketError> {
        let payment_id = Uuid::new_v4().to_string();
        let result = sqlx::query(
            r#"
            INSERT INTO payments_tb (payment_id, order_id, amount, commission_rate, status)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (order_id) DO NOTHING
            "#,
        )
        .bind(&payment_id)
        .bind(order_id)
        .bind(amount)
        .bind(commission_rate)
        .bind(PaymentStatus::Pending.id())
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(MarketError::conflict(format!(
                "order {} already has a payment",
                order_id
            )));
        }

        Ok(payment_id)
    }

    /// Get the payment for an order
    pub async fn get_by_order(
        pool: &PgPool,
        order_id: i64,
    ) -> Result<Option<Payment>, MarketError> {
        let row = sqlx::query(&format!(
            r#"SELECT {PAYMENT_COLUMNS} FROM payments_tb WHERE order_id = $1"#
        ))
        .bind(order_id)
        .fetch_optional(pool)
        .await?;

        match row {
            Some(row) => Ok(Some(row_to_payment(&row)?)),
            None => Ok(None),
        }
    }

    /// Get the payment for an order with a row lock, inside a transaction
    pub async fn get_by_order_for_update(
        tx: &mut Transaction<'_, Postgres>,
        order_id: i64,
    ) -> Result<Option<Payment>, MarketError> {
        let row = sqlx::query(&format!(
            r#"SELECT {PAYMENT_COLUMNS} FROM payments_tb WHERE order_id = $1 FOR UPDATE"#
        ))
        .bind(order_id)
        .fetch_optional(&mut **tx)
        .await?;

        match row {
            Some(row) => Ok(Some(row_to_payment(&row)?)),
            None => Ok(None),
        }
    }

    /// Atomic CAS: move the payment between states.
    pub async fn update_status_if(
        tx: &mut Transaction<'_, Postgres>,
        order_id: i64,
        expected: PaymentStatus,
        new_status: PaymentStatus,
    ) -> Result<bool, MarketError> {
        let result = sqlx::query(
            r#"
            UPDATE payments_tb
            SET status = $1, updated_at = NOW()
            WHERE order_id = $2 AND status = $3
            "#,
        )
        .bind(new_status.id())
        .bind(order_id)
        .bind(expected.id())
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Mark an order's escrow payment refunded after an admin cancel.
    ///
    /// Guarded on `settled = FALSE`: a settled payment means the credit was
    /// applied and is never reversed here.
    pub async fn mark_refunded_if_unsettled(
        tx: &mut Transaction<'_, Postgres>,
        order_id: i64,
    ) -> Result<bool, MarketError> {
        let result = sqlx::query(
            r#"
            UPDATE payments_tb
            SET status = $1, updated_at = NOW()
            WHERE order_id = $2 AND settled = FALSE AND status = ANY($3)
            "#,
        )
        .bind(PaymentStatus::Refunded.id())
        .bind(order_id)
        .bind(&[PaymentStatus::Pending.id(), PaymentStatus::Succeeded.id()][..])
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// One-shot settlement: record the computed split and flip the processed
    /// flag. Returns false when the payment was already settled.
    pub async fn settle_if_unsettled(
        tx: &mut Transaction<'_, Postgres>,
        order_id: i64,
        commission_amount: Decimal,
        student_amount: Decimal,
    ) -> Result<bool, MarketError> {
        let result = sqlx::query(
            r#"
            UPDATE payments_tb
            SET commission_amount = $1, student_amount = $2, settled = TRUE, updated_at = NOW()
            WHERE order_id = $3 AND status = $4 AND settled = FALSE
            "#,
        )
        .bind(commission_amount)
        .bind(student_amount)
        .bind(order_id)
        .bind(PaymentStatus::Succeeded.id())
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Convert database row to Payment
fn row_to_payment(row: &sqlx::postgres::PgRow) -> Result<Payment, MarketError> {
    let status_id: i16 = row.get("status");
    let status = PaymentStatus::from_id(status_id).ok_or_else(|| {
        MarketError::Integrity(format!("Invalid payment state ID: {}", status_id))
    })?;

    Ok(Payment {
        payment_id: row.get("payment_id"),
        order_id: row.get("order_id"),
        amount: row.get("amount"),
        commission_rate: row.get("commission_rate"),
        commission_amount: row.get("commission_amount"),
        student_amount: row.get("student_amount"),
        status,
        settled: row.get("settled"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
