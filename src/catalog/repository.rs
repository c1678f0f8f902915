//! Service listing persistence

use sqlx::{PgPool, Row};

use super::models::{CreateServiceRequest, Service, ServiceStatus, UpdateServiceRequest};
use crate::error::MarketError;

const SERVICE_COLUMNS: &str = r#"service_id, student_id, title, description, category, price,
       delivery_days, max_revisions, status, created_at, updated_at"#;

pub struct ServiceRepository;

impl ServiceRepository {
    /// Create a listing in DRAFT state
    pub async fn create(
        pool: &PgPool,
        student_id: i64,
        req: &CreateServiceRequest,
        default_max_revisions: i32,
    ) -> Result<Service, MarketError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO services_tb
                (student_id, title, description, category, price, delivery_days, max_revisions, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {SERVICE_COLUMNS}
            "#
        ))
        .bind(student_id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(&req.category)
        .bind(req.price)
        .bind(req.delivery_days)
        .bind(req.max_revisions.unwrap_or(default_max_revisions))
        .bind(ServiceStatus::Draft.id())
        .fetch_one(pool)
        .await?;

        row_to_service(&row)
    }

    /// Get a listing by id
    pub async fn get(pool: &PgPool, service_id: i64) -> Result<Option<Service>, MarketError> {
        let row = sqlx::query(&format!(
            r#"SELECT {SERVICE_COLUMNS} FROM services_tb WHERE service_id = $1"#
        ))
        .bind(service_id)
        .fetch_optional(pool)
        .await?;

        match row {
            Some(row) => Ok(Some(row_to_service(&row)?)),
            None => Ok(None),
        }
    }

    /// Apply a partial update (COALESCE keeps unset fields)
    pub async fn update(
        pool: &PgPool,
        service_id: i64,
        req: &UpdateServiceRequest,
    ) -> Result<Option<Service>, MarketError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE services_tb
            SET title = COALESCE($1, title),
                description = COALESCE($2, description),
                category = COALESCE($3, category),
                price = COALESCE($4, price),
                delivery_days = COALESCE($5, delivery_days),
                max_revisions = COALESCE($6, max_revisions),
                updated_at = NOW()
            WHERE service_id = $7
            RETURNING {SERVICE_COLUMNS}
            "#
        ))
        .bind(&req.title)
        .bind(&req.description)
        .bind(&req.category)
        .bind(req.price)
        .bind(req.delivery_days)
        .bind(req.max_revisions)
        .bind(service_id)
        .fetch_optional(pool)
        .await?;

        match row {
            Some(row) => Ok(Some(row_to_service(&row)?)),
            None => Ok(None),
        }
    }

    /// Change listing status
    pub async fn set_status(
        pool: &PgPool,
        service_id: i64,
        status: ServiceStatus,
    ) -> Result<bool, MarketError> {
        let result = sqlx::query(
            r#"UPDATE services_tb SET status = $1, updated_at = NOW() WHERE service_id = $2"#,
        )
        .bind(status.id())
        .bind(service_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Public catalog: active listings, optionally by category, newest first
    pub async fn list_active(
        pool: &PgPool,
        category: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Service>, MarketError> {
        let rows = match category {
            Some(category) => {
                sqlx::query(&format!(
                    r#"SELECT {SERVICE_COLUMNS} FROM services_tb
                       WHERE status = $1 AND category = $2
                       ORDER BY created_at DESC LIMIT $3"#
                ))
                .bind(ServiceStatus::Active.id())
                .bind(category)
                .bind(limit)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    r#"SELECT {SERVICE_COLUMNS} FROM services_tb
                       WHERE status = $1 ORDER BY created_at DESC LIMIT $2"#
                ))
                .bind(ServiceStatus::Active.id())
                .bind(limit)
                .fetch_all(pool)
                .await?
            }
        };

        rows.iter().map(row_to_service).collect()
    }

    /// A student's own listings, any status
    pub async fn list_by_student(
        pool: &PgPool,
        student_id: i64,
    ) -> Result<Vec<Service>, MarketError> {
        let rows = sqlx::query(&format!(
            r#"SELECT {SERVICE_COLUMNS} FROM services_tb
               WHERE student_id = $1 ORDER BY created_at DESC"#
        ))
        .bind(student_id)
        .fetch_all(pool)
        .await?;

        rows.iter().map(row_to_service).collect()
    }
}

/// Convert database row to Service
fn row_to_service(row: &sqlx::postgres::PgRow) -> Result<Service, MarketError> {
    let status_id: i16 = row.get("status");
    let status = ServiceStatus::from_id(status_id).ok_or_else(|| {
        MarketError::Integrity(format!("Invalid service state ID: {}", status_id))
    })?;

    Ok(Service {
        service_id: row.get("service_id"),
        student_id: row.get("student_id"),
        title: row.get("title"),
        description: row.get("description"),
        category: row.get("category"),
        price: row.get("price"),
        delivery_days: row.get("delivery_days"),
        max_revisions: row.get("max_revisions"),
        status,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
