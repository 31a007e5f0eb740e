//! Registration state persistence port.
//!
//! One record per user, keyed by chat user id. The record survives
//! process restarts so a user can resume mid-funnel, and carries the
//! bookkeeping the reminder sweep needs (last update time, whether a
//! nudge was already sent).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::registration::Registration;

/// Port for per-user registration state.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load a user's record, `None` if they have never started.
    async fn get(&self, user: UserId) -> Result<Option<Registration>, DomainError>;

    /// Insert or replace a user's record.
    ///
    /// Writing resets the reminder flag and stamps the update time, so
    /// any activity makes the user eligible for a future nudge again.
    async fn put(&self, user: UserId, registration: &Registration) -> Result<(), DomainError>;

    /// Remove a user's record entirely.
    async fn delete(&self, user: UserId) -> Result<(), DomainError>;

    /// Users whose record is mid-funnel, last touched before `cutoff`,
    /// and not yet nudged.
    async fn list_abandoned(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<(UserId, Registration)>, DomainError>;

    /// Record that an abandonment nudge went out for this user.
    async fn mark_reminder_sent(&self, user: UserId) -> Result<(), DomainError>;

    /// Ids of every user whose funnel is started but not completed.
    async fn list_incomplete(&self) -> Result<Vec<UserId>, DomainError>;

    /// Every stored record. Used for aggregate statistics only.
    async fn list_all(&self) -> Result<Vec<(UserId, Registration)>, DomainError>;
}
