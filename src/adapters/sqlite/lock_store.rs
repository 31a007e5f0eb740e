//! SQLite implementation of the lock store.
//!
//! The production deployment keeps the lock in a shared spreadsheet;
//! this adapter keeps the same single-record contract in the local
//! database, which is what tests and single-host deployments use.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::cluster::LeaderLock;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::LockStore;

/// SQLite implementation of [`LockStore`].
#[derive(Clone)]
pub struct SqliteLockStore {
    pool: SqlitePool,
}

impl SqliteLockStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LockRow {
    leader_id: String,
    heartbeat_utc: String,
    note: String,
}

#[async_trait]
impl LockStore for SqliteLockStore {
    async fn read(&self) -> Result<Option<LeaderLock>, DomainError> {
        let row = sqlx::query_as::<_, LockRow>(
            "SELECT leader_id, heartbeat_utc, note FROM leader_lock WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::LockError,
                format!("Failed to read leader lock: {}", e),
            )
        })?;

        Ok(row.map(|row| LeaderLock {
            leader_id: row.leader_id,
            heartbeat_utc: row.heartbeat_utc,
            note: row.note,
        }))
    }

    async fn write(&self, lock: &LeaderLock) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO leader_lock (id, leader_id, heartbeat_utc, note)
            VALUES (1, ?1, ?2, ?3)
            "#,
        )
        .bind(&lock.leader_id)
        .bind(&lock.heartbeat_utc)
        .bind(&lock.note)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::LockError,
                format!("Failed to write leader lock: {}", e),
            )
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::migrate;
    use crate::domain::foundation::Timestamp;

    async fn store() -> SqliteLockStore {
        // One connection, so the in-memory database is shared.
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        migrate(&pool).await.unwrap();
        SqliteLockStore::new(pool)
    }

    #[tokio::test]
    async fn empty_table_reads_as_no_lock() {
        let store = store().await;
        assert_eq!(store.read().await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let store = store().await;
        let lock = LeaderLock::claim("bot-a", Timestamp::now());
        store.write(&lock).await.unwrap();
        assert_eq!(store.read().await.unwrap(), Some(lock));
    }

    #[tokio::test]
    async fn later_write_overwrites_the_single_record() {
        let store = store().await;
        store
            .write(&LeaderLock::claim("bot-a", Timestamp::now()))
            .await
            .unwrap();
        let takeover = LeaderLock::claim("bot-b", Timestamp::now());
        store.write(&takeover).await.unwrap();
        assert_eq!(store.read().await.unwrap(), Some(takeover));
    }
}
