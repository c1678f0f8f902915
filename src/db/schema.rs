//! Table definitions, executed in order at startup.
//!
//! Money columns are NUMERIC(12,2); status columns are SMALLINT state ids
//! matching the enums in the owning modules.

pub const CREATE_TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users_tb (
        user_id        BIGSERIAL PRIMARY KEY,
        username       VARCHAR(64) NOT NULL UNIQUE,
        email          VARCHAR(255) NOT NULL UNIQUE,
        password_hash  TEXT NOT NULL,
        role           SMALLINT NOT NULL DEFAULT 1,
        status         SMALLINT NOT NULL DEFAULT 1,
        created_at     TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS student_profiles_tb (
        user_id           BIGINT PRIMARY KEY REFERENCES users_tb(user_id),
        available_balance NUMERIC(12,2) NOT NULL DEFAULT 0,
        total_withdrawn   NUMERIC(12,2) NOT NULL DEFAULT 0,
        skills            TEXT NOT NULL DEFAULT '',
        portfolio_files   TEXT[] NOT NULL DEFAULT '{}'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS services_tb (
        service_id    BIGSERIAL PRIMARY KEY,
        student_id    BIGINT NOT NULL REFERENCES users_tb(user_id),
        title         VARCHAR(160) NOT NULL,
        description   TEXT NOT NULL,
        category      VARCHAR(64) NOT NULL,
        price         NUMERIC(12,2) NOT NULL,
        delivery_days INT NOT NULL,
        max_revisions INT NOT NULL,
        status        SMALLINT NOT NULL DEFAULT 0,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders_tb (
        order_id         BIGSERIAL PRIMARY KEY,
        client_id        BIGINT NOT NULL REFERENCES users_tb(user_id),
        student_id       BIGINT NOT NULL REFERENCES users_tb(user_id),
        service_id       BIGINT NOT NULL REFERENCES services_tb(service_id),
        status           SMALLINT NOT NULL DEFAULT 0,
        price            NUMERIC(12,2) NOT NULL,
        commission_rate  NUMERIC(5,2) NOT NULL,
        revision_count   INT NOT NULL DEFAULT 0,
        max_revisions    INT NOT NULL,
        deadline         TIMESTAMPTZ,
        requirements     TEXT NOT NULL,
        delivery_message TEXT,
        delivery_files   TEXT[] NOT NULL DEFAULT '{}',
        created_at       TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at       TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS payments_tb (
        payment_id        VARCHAR(64) PRIMARY KEY,
        order_id          BIGINT NOT NULL UNIQUE REFERENCES orders_tb(order_id),
        amount            NUMERIC(12,2) NOT NULL,
        commission_rate   NUMERIC(5,2) NOT NULL,
        commission_amount NUMERIC(12,2),
        student_amount    NUMERIC(12,2),
        status            SMALLINT NOT NULL DEFAULT 0,
        settled           BOOLEAN NOT NULL DEFAULT FALSE,
        created_at        TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at        TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS reviews_tb (
        review_id  BIGSERIAL PRIMARY KEY,
        order_id   BIGINT NOT NULL UNIQUE REFERENCES orders_tb(order_id),
        service_id BIGINT NOT NULL REFERENCES services_tb(service_id),
        client_id  BIGINT NOT NULL REFERENCES users_tb(user_id),
        rating     SMALLINT NOT NULL CHECK (rating BETWEEN 1 AND 5),
        comment    TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS messages_tb (
        message_id BIGSERIAL PRIMARY KEY,
        order_id   BIGINT NOT NULL REFERENCES orders_tb(order_id),
        sender_id  BIGINT NOT NULL REFERENCES users_tb(user_id),
        body       TEXT NOT NULL,
        attachment TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS disputes_tb (
        dispute_id      BIGSERIAL PRIMARY KEY,
        order_id        BIGINT NOT NULL REFERENCES orders_tb(order_id),
        opened_by       BIGINT NOT NULL REFERENCES users_tb(user_id),
        reason          TEXT NOT NULL,
        status          SMALLINT NOT NULL DEFAULT 0,
        resolved_by     BIGINT REFERENCES users_tb(user_id),
        resolution_note TEXT,
        created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        resolved_at     TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS withdrawals_tb (
        withdrawal_id BIGSERIAL PRIMARY KEY,
        student_id    BIGINT NOT NULL REFERENCES users_tb(user_id),
        amount        NUMERIC(12,2) NOT NULL,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS audit_logs_tb (
        audit_id    BIGSERIAL PRIMARY KEY,
        order_id    BIGINT NOT NULL,
        actor_id    BIGINT NOT NULL,
        action      VARCHAR(32) NOT NULL,
        from_status SMALLINT,
        to_status   SMALLINT,
        detail      TEXT,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_orders_client ON orders_tb(client_id, status)
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_orders_student ON orders_tb(student_id, status)
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_services_student ON services_tb(student_id)
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_messages_order ON messages_tb(order_id, created_at)
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_reviews_service ON reviews_tb(service_id, created_at)
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_audit_order ON audit_logs_tb(order_id, created_at)
    "#,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statements_are_idempotent() {
        for stmt in CREATE_TABLES {
            assert!(
                stmt.contains("IF NOT EXISTS"),
                "schema statement must be re-runnable: {}",
                &stmt[..60.min(stmt.len())]
            );
        }
    }

    #[test]
    fn test_core_tables_present() {
        let all = CREATE_TABLES.join("\n");
        for table in [
            "users_tb",
            "student_profiles_tb",
            "services_tb",
            "orders_tb",
            "payments_tb",
            "reviews_tb",
            "messages_tb",
            "disputes_tb",
            "withdrawals_tb",
            "audit_logs_tb",
        ] {
            assert!(all.contains(table), "missing table {}", table);
        }
    }
}
