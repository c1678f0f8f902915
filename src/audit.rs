//! Transition audit log and balance reconciliation.
//!
//! Every lifecycle transition writes one audit row inside its own
//! transaction. The reconciliation pass is strictly read-only: it reports
//! violations of the balance invariant for manual follow-up and never
//! repairs data.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{PgPool, Postgres, Row, Transaction};
use utoipa::ToSchema;

use crate::error::MarketError;
use crate::orders::status::OrderStatus;

pub struct AuditRepository;

impl AuditRepository {
    /// Record an order transition (runs in the transition's transaction)
    pub async fn record_transition(
        tx: &mut Transaction<'_, Postgres>,
        order_id: i64,
        actor_id: i64,
        action: &str,
        from_status: OrderStatus,
        to_status: OrderStatus,
        detail: Option<&str>,
    ) -> Result<(), MarketError> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs_tb (order_id, actor_id, action, from_status, to_status, detail)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(order_id)
        .bind(actor_id)
        .bind(action)
        .bind(from_status.id())
        .bind(to_status.id())
        .bind(detail)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Audit trail for one order, oldest first
    pub async fn list_for_order(
        pool: &PgPool,
        order_id: i64,
    ) -> Result<Vec<AuditEntry>, MarketError> {
        let rows = sqlx::query(
            r#"
            SELECT audit_id, order_id, actor_id, action, from_status, to_status, detail, created_at
            FROM audit_logs_tb
            WHERE order_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(order_id)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| AuditEntry {
                audit_id: r.get("audit_id"),
                order_id: r.get("order_id"),
                actor_id: r.get("actor_id"),
                action: r.get("action"),
                from_status: r.get("from_status"),
                to_status: r.get("to_status"),
                detail: r.get("detail"),
                created_at: r.get("created_at"),
            })
            .collect())
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuditEntry {
    pub audit_id: i64,
    pub order_id: i64,
    pub actor_id: i64,
    pub action: String,
    pub from_status: Option<i16>,
    pub to_status: Option<i16>,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One student whose balances disagree with their settled payments
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BalanceDiscrepancy {
    pub student_id: i64,
    #[schema(value_type = String, example = "85.00")]
    pub available_balance: Decimal,
    #[schema(value_type = String, example = "0.00")]
    pub total_withdrawn: Decimal,
    /// Sum of student_amount over settled payments of completed orders
    #[schema(value_type = String, example = "170.00")]
    pub earned: Decimal,
    /// (available + withdrawn) - earned
    #[schema(value_type = String, example = "-85.00")]
    pub delta: Decimal,
}

/// Independent read-only audit of the balance invariant:
/// for every student, `available_balance + total_withdrawn` must equal the
/// sum of `student_amount` over settled, succeeded payments of completed
/// orders. Returns only the students where it doesn't.
pub async fn reconcile_balances(pool: &PgPool) -> Result<Vec<BalanceDiscrepancy>, MarketError> {
    let rows = sqlx::query(
        r#"
        SELECT sp.user_id,
               sp.available_balance,
               sp.total_withdrawn,
               COALESCE(SUM(p.student_amount), 0) AS earned
        FROM student_profiles_tb sp
        LEFT JOIN orders_tb o
               ON o.student_id = sp.user_id AND o.status = $1
        LEFT JOIN payments_tb p
               ON p.order_id = o.order_id AND p.status = $2 AND p.settled = TRUE
        GROUP BY sp.user_id, sp.available_balance, sp.total_withdrawn
        "#,
    )
    .bind(OrderStatus::Completed.id())
    .bind(crate::payments::PaymentStatus::Succeeded.id())
    .fetch_all(pool)
    .await?;

    let mut discrepancies = Vec::new();
    for row in rows {
        let student_id: i64 = row.get("user_id");
        let available_balance: Decimal = row.get("available_balance");
        let total_withdrawn: Decimal = row.get("total_withdrawn");
        let earned: Decimal = row.get("earned");

        let delta = available_balance + total_withdrawn - earned;
        if !delta.is_zero() {
            tracing::warn!(
                student_id,
                %available_balance,
                %total_withdrawn,
                %earned,
                %delta,
                "balance reconciliation mismatch"
            );
            discrepancies.push(BalanceDiscrepancy {
                student_id,
                available_balance,
                total_withdrawn,
                earned,
                delta,
            });
        }
    }

    Ok(discrepancies)
}
