//! Commission & balance engine
//!
//! The single place where student balances change. Every mutation is either
//! a one-shot settlement (CAS on the payment's processed flag) or a guarded
//! withdrawal; both run inside the caller's transaction so a status update
//! and its balance effect commit together or not at all.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Row, Transaction};

use crate::commission::compute_split;
use crate::error::MarketError;
use crate::orders::models::Order;
use crate::orders::repository::OrderRepository;
use crate::orders::status::OrderStatus;
use crate::payments::models::PaymentStatus;
use crate::payments::repository::PaymentRepository;

/// Outcome of a payment-gateway confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentConfirmOutcome {
    /// Payment moved to SUCCEEDED
    Confirmed,
    /// Duplicate delivery; nothing changed
    AlreadyConfirmed,
    /// Confirmation for an already-completed order also settled it
    ConfirmedAndSettled,
}

/// A withdrawal receipt
#[derive(Debug, Clone)]
pub struct Withdrawal {
    pub withdrawal_id: i64,
    pub student_id: i64,
    pub amount: Decimal,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub struct BalanceEngine;

impl BalanceEngine {
    /// Settle an order's payment: compute the split from the rate frozen on
    /// the order and credit the student's available balance.
    ///
    /// Idempotent per payment: the CAS on `settled = FALSE` means a retry
    /// (or a webhook racing a user action) credits exactly once. Returns
    /// whether this call applied the credit.
    ///
    /// # Errors
    /// * `Integrity` - split does not reproduce the payment amount, or the
    ///   payment amount drifted from the order price; the caller must roll
    ///   the transaction back
    pub async fn settle(
        tx: &mut Transaction<'_, Postgres>,
        order: &Order,
    ) -> Result<bool, MarketError> {
        let payment = PaymentRepository::get_by_order_for_update(tx, order.order_id)
            .await?
            .ok_or_else(|| MarketError::not_found("payment for order", order.order_id))?;

        if payment.status != PaymentStatus::Succeeded {
            return Err(MarketError::conflict(format!(
                "payment for order {} is {}, expected SUCCEEDED",
                order.order_id, payment.status
            )));
        }

        if payment.amount != order.price {
            return Err(MarketError::Integrity(format!(
                "payment amount {} does not match order price {} on order {}",
                payment.amount, order.price, order.order_id
            )));
        }

        let split = compute_split(payment.amount, order.commission_rate)?;

        let applied = PaymentRepository::settle_if_unsettled(
            tx,
            order.order_id,
            split.commission,
            split.student,
        )
        .await?;

        if !applied {
            tracing::info!(
                order_id = order.order_id,
                "payment already settled, skipping credit"
            );
            return Ok(false);
        }

        let credited = sqlx::query(
            r#"
            UPDATE student_profiles_tb
            SET available_balance = available_balance + $1
            WHERE user_id = $2
            "#,
        )
        .bind(split.student)
        .bind(order.student_id)
        .execute(&mut **tx)
        .await?;

        if credited.rows_affected() == 0 {
            // Settling without a profile row would strand the student's
            // earnings; abort so the transaction rolls back the flag too.
            return Err(MarketError::Integrity(format!(
                "student {} has no profile to credit",
                order.student_id
            )));
        }

        tracing::info!(
            order_id = order.order_id,
            student_id = order.student_id,
            student_amount = %split.student,
            commission = %split.commission,
            "credited student balance"
        );

        Ok(true)
    }

    /// Inbound contract for the payment-gateway webhook.
    ///
    /// Marks the order's payment SUCCEEDED; safe against duplicate delivery.
    /// If the order has already completed (confirmation raced completion),
    /// settlement runs through the same idempotent path.
    pub async fn on_payment_confirmed(
        pool: &PgPool,
        order_id: i64,
        amount: Decimal,
    ) -> Result<PaymentConfirmOutcome, MarketError> {
        let mut tx = pool.begin().await?;

        // Lock order then payment, same order as complete(), so the two
        // paths can't deadlock each other.
        let order = OrderRepository::get_for_update(&mut tx, order_id)
            .await?
            .ok_or_else(|| MarketError::not_found("order", order_id))?;

        let payment = PaymentRepository::get_by_order_for_update(&mut tx, order_id)
            .await?
            .ok_or_else(|| MarketError::not_found("payment for order", order_id))?;

        if payment.amount != amount {
            return Err(MarketError::Integrity(format!(
                "gateway confirmed {} but order {} escrowed {}",
                amount, order_id, payment.amount
            )));
        }

        let moved = PaymentRepository::update_status_if(
            &mut tx,
            order_id,
            PaymentStatus::Pending,
            PaymentStatus::Succeeded,
        )
        .await?;

        if !moved {
            // Duplicate webhook delivery; confirm idempotently as long as
            // the payment isn't in a refund/failure state.
            if payment.status == PaymentStatus::Succeeded {
                tx.commit().await?;
                return Ok(PaymentConfirmOutcome::AlreadyConfirmed);
            }
            return Err(MarketError::conflict(format!(
                "payment for order {} is {}, cannot confirm",
                order_id, payment.status
            )));
        }

        let outcome = if order.status == OrderStatus::Completed {
            Self::settle(&mut tx, &order).await?;
            PaymentConfirmOutcome::ConfirmedAndSettled
        } else {
            PaymentConfirmOutcome::Confirmed
        };

        tx.commit().await?;
        Ok(outcome)
    }

    /// Move funds from available balance to withdrawn.
    ///
    /// The guarded UPDATE keeps `available_balance + total_withdrawn`
    /// constant, so the reconciliation invariant holds continuously; a
    /// request exceeding the available balance affects zero rows.
    pub async fn request_withdrawal(
        pool: &PgPool,
        student_id: i64,
        amount: Decimal,
    ) -> Result<Withdrawal, MarketError> {
        if amount <= Decimal::ZERO || amount.round_dp(2) != amount {
            return Err(MarketError::validation(
                "amount",
                "withdrawal amount must be a positive value with at most 2 decimals",
            ));
        }

        let mut tx = pool.begin().await?;

        let moved = sqlx::query(
            r#"
            UPDATE student_profiles_tb
            SET available_balance = available_balance - $1,
                total_withdrawn = total_withdrawn + $1
            WHERE user_id = $2 AND available_balance >= $1
            "#,
        )
        .bind(amount)
        .bind(student_id)
        .execute(&mut *tx)
        .await?;

        if moved.rows_affected() == 0 {
            let available = sqlx::query(
                r#"SELECT available_balance FROM student_profiles_tb WHERE user_id = $1"#,
            )
            .bind(student_id)
            .fetch_optional(&mut *tx)
            .await?
            .map(|r| r.get::<Decimal, _>("available_balance"))
            .ok_or_else(|| MarketError::not_found("student profile", student_id))?;

            return Err(MarketError::InsufficientBalance {
                available,
                requested: amount,
            });
        }

        let row = sqlx::query(
            r#"
            INSERT INTO withdrawals_tb (student_id, amount)
            VALUES ($1, $2)
            RETURNING withdrawal_id, created_at
            "#,
        )
        .bind(student_id)
        .bind(amount)
        .fetch_one(&mut *tx)
        .await?;

        let withdrawal_id: i64 = row.get("withdrawal_id");
        let created_at = row.get("created_at");
        tx.commit().await?;

        tracing::info!(student_id, %amount, withdrawal_id, "withdrawal recorded");

        Ok(Withdrawal {
            withdrawal_id,
            student_id,
            amount,
            created_at,
        })
    }

    /// Withdrawal history for a student, newest first
    pub async fn list_withdrawals(
        pool: &PgPool,
        student_id: i64,
        limit: i64,
    ) -> Result<Vec<(i64, Decimal, chrono::DateTime<chrono::Utc>)>, MarketError> {
        let rows = sqlx::query(
            r#"
            SELECT withdrawal_id, amount, created_at
            FROM withdrawals_tb
            WHERE student_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(student_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| (r.get("withdrawal_id"), r.get("amount"), r.get("created_at")))
            .collect())
    }
}
