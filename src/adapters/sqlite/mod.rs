//! SQLite implementations of the persistence ports.
//!
//! One small database file holds all three tables: per-user funnel
//! state (JSON payload), coupons, and the single-row leader lock.

mod coupon_store;
mod lock_store;
mod state_store;

pub use coupon_store::SqliteCouponStore;
pub use lock_store::SqliteLockStore;
pub use state_store::SqliteStateStore;

use sqlx::SqlitePool;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Creates the schema if it does not exist yet.
pub async fn migrate(pool: &SqlitePool) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_states (
            user_id       INTEGER PRIMARY KEY,
            state_data    TEXT    NOT NULL,
            last_updated  TEXT    NOT NULL,
            reminder_sent INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(migration_error)?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS coupons (
            code             TEXT    PRIMARY KEY,
            discount_percent INTEGER NOT NULL,
            usage_count      INTEGER NOT NULL DEFAULT 0,
            usage_limit      INTEGER NOT NULL DEFAULT 0,
            course_key       TEXT
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(migration_error)?;

    // Single-row table: the lock record all instances contend on.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS leader_lock (
            id            INTEGER PRIMARY KEY CHECK (id = 1),
            leader_id     TEXT NOT NULL,
            heartbeat_utc TEXT NOT NULL,
            note          TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(migration_error)?;

    Ok(())
}

fn migration_error(e: sqlx::Error) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to run migrations: {}", e),
    )
}
