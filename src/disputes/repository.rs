//! Dispute persistence
//!
//! Resolution is a CAS on OPEN, so two admins racing to resolve the same
//! dispute cannot both win.

use sqlx::{PgPool, Row};

use super::models::{Dispute, DisputeStatus};
use crate::error::MarketError;

const DISPUTE_COLUMNS: &str = r#"dispute_id, order_id, opened_by, reason, status,
       resolved_by, resolution_note, created_at, resolved_at"#;

pub struct DisputeRepository;

impl DisputeRepository {
    /// Open a dispute against an order
    pub async fn create(
        pool: &PgPool,
        order_id: i64,
        opened_by: i64,
        reason: &str,
    ) -> Result<Dispute, MarketError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO disputes_tb (order_id, opened_by, reason)
            VALUES ($1, $2, $3)
            RETURNING {DISPUTE_COLUMNS}
            "#
        ))
        .bind(order_id)
        .bind(opened_by)
        .bind(reason)
        .fetch_one(pool)
        .await?;

        row_to_dispute(&row)
    }

    /// Get a dispute by id
    pub async fn get(pool: &PgPool, dispute_id: i64) -> Result<Option<Dispute>, MarketError> {
        let row = sqlx::query(&format!(
            r#"SELECT {DISPUTE_COLUMNS} FROM disputes_tb WHERE dispute_id = $1"#
        ))
        .bind(dispute_id)
        .fetch_optional(pool)
        .await?;

        match row {
            Some(row) => Ok(Some(row_to_dispute(&row)?)),
            None => Ok(None),
        }
    }

    /// Atomic CAS: resolve an OPEN dispute. Returns false if it was already
    /// resolved.
    pub async fn resolve_if_open(
        pool: &PgPool,
        dispute_id: i64,
        resolution: DisputeStatus,
        resolved_by: i64,
        note: Option<&str>,
    ) -> Result<bool, MarketError> {
        let result = sqlx::query(
            r#"
            UPDATE disputes_tb
            SET status = $1, resolved_by = $2, resolution_note = $3, resolved_at = NOW()
            WHERE dispute_id = $4 AND status = $5
            "#,
        )
        .bind(resolution.id())
        .bind(resolved_by)
        .bind(note)
        .bind(dispute_id)
        .bind(DisputeStatus::Open.id())
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Admin listing of open disputes, oldest first
    pub async fn list_open(pool: &PgPool, limit: i64) -> Result<Vec<Dispute>, MarketError> {
        let rows = sqlx::query(&format!(
            r#"SELECT {DISPUTE_COLUMNS} FROM disputes_tb
               WHERE status = $1 ORDER BY created_at ASC LIMIT $2"#
        ))
        .bind(DisputeStatus::Open.id())
        .bind(limit)
        .fetch_all(pool)
        .await?;

        rows.iter().map(row_to_dispute).collect()
    }
}

fn row_to_dispute(row: &sqlx::postgres::PgRow) -> Result<Dispute, MarketError> {
    let status_id: i16 = row.get("status");
    let status = DisputeStatus::from_id(status_id).ok_or_else(|| {
        MarketError::Integrity(format!("Invalid dispute state ID: {}", status_id))
    })?;

    Ok(Dispute {
        dispute_id: row.get("dispute_id"),
        order_id: row.get("order_id"),
        opened_by: row.get("opened_by"),
        reason: row.get("reason"),
        status,
        resolved_by: row.get("resolved_by"),
        resolution_note: row.get("resolution_note"),
        created_at: row.get("created_at"),
        resolved_at: row.get("resolved_at"),
    })
}
