//! SQLite implementation of the state store.
//!
//! The registration record is stored as one JSON payload per user, so
//! the schema never has to chase the shape of the funnel. The columns
//! alongside it exist only for the reminder sweep.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::registration::Registration;
use crate::ports::StateStore;

/// SQLite implementation of [`StateStore`].
#[derive(Clone)]
pub struct SqliteStateStore {
    pool: SqlitePool,
}

impl SqliteStateStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_all_rows(&self) -> Result<Vec<UserStateRow>, DomainError> {
        sqlx::query_as::<_, UserStateRow>(
            "SELECT user_id, state_data, last_updated, reminder_sent FROM user_states",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch user states: {}", e),
            )
        })
    }
}

#[derive(sqlx::FromRow)]
struct UserStateRow {
    user_id: i64,
    state_data: String,
    last_updated: String,
    reminder_sent: i64,
}

impl UserStateRow {
    fn into_registration(self) -> Result<(UserId, Registration), DomainError> {
        let registration: Registration = serde_json::from_str(&self.state_data).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Corrupt state payload for user {}: {}", self.user_id, e),
            )
        })?;
        Ok((UserId::new(self.user_id), registration))
    }

    fn last_updated(&self) -> Option<Timestamp> {
        DateTime::parse_from_rfc3339(&self.last_updated)
            .ok()
            .map(|dt| Timestamp::from_datetime(dt.with_timezone(&Utc)))
    }
}

#[async_trait]
impl StateStore for SqliteStateStore {
    async fn get(&self, user: UserId) -> Result<Option<Registration>, DomainError> {
        let row = sqlx::query_as::<_, UserStateRow>(
            "SELECT user_id, state_data, last_updated, reminder_sent \
             FROM user_states WHERE user_id = ?1",
        )
        .bind(user.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch user state: {}", e),
            )
        })?;

        match row {
            Some(row) => Ok(Some(row.into_registration()?.1)),
            None => Ok(None),
        }
    }

    async fn put(&self, user: UserId, registration: &Registration) -> Result<(), DomainError> {
        let payload = serde_json::to_string(registration).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to serialize state: {}", e),
            )
        })?;

        // Any write resets the reminder flag: fresh activity makes the
        // user eligible for a future nudge again.
        sqlx::query(
            r#"
            INSERT INTO user_states (user_id, state_data, last_updated, reminder_sent)
            VALUES (?1, ?2, ?3, 0)
            ON CONFLICT(user_id) DO UPDATE SET
                state_data = excluded.state_data,
                last_updated = excluded.last_updated,
                reminder_sent = 0
            "#,
        )
        .bind(user.as_i64())
        .bind(payload)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to store user state: {}", e),
            )
        })?;

        Ok(())
    }

    async fn delete(&self, user: UserId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM user_states WHERE user_id = ?1")
            .bind(user.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to delete user state: {}", e),
                )
            })?;
        Ok(())
    }

    async fn list_abandoned(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<(UserId, Registration)>, DomainError> {
        let rows = sqlx::query_as::<_, UserStateRow>(
            "SELECT user_id, state_data, last_updated, reminder_sent \
             FROM user_states WHERE reminder_sent = 0",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch abandoned states: {}", e),
            )
        })?;

        let mut abandoned = Vec::new();
        for row in rows {
            // Rows with an unreadable update time are skipped rather
            // than nudged at random.
            let Some(updated) = row.last_updated() else {
                continue;
            };
            if !updated.is_before(&cutoff) {
                continue;
            }
            let (user, registration) = row.into_registration()?;
            if registration.is_in_progress() {
                abandoned.push((user, registration));
            }
        }
        Ok(abandoned)
    }

    async fn mark_reminder_sent(&self, user: UserId) -> Result<(), DomainError> {
        sqlx::query("UPDATE user_states SET reminder_sent = 1 WHERE user_id = ?1")
            .bind(user.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to mark reminder sent: {}", e),
                )
            })?;
        Ok(())
    }

    async fn list_incomplete(&self) -> Result<Vec<UserId>, DomainError> {
        let rows = self.fetch_all_rows().await?;
        let mut users = Vec::new();
        for row in rows {
            let (user, registration) = row.into_registration()?;
            if registration.is_in_progress() {
                users.push(user);
            }
        }
        Ok(users)
    }

    async fn list_all(&self) -> Result<Vec<(UserId, Registration)>, DomainError> {
        self.fetch_all_rows()
            .await?
            .into_iter()
            .map(UserStateRow::into_registration)
            .collect()
    }
}
