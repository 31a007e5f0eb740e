//! Shared leader-lock storage port.

use async_trait::async_trait;

use crate::domain::cluster::LeaderLock;
use crate::domain::foundation::DomainError;

/// Port for the single shared lock record all instances contend on.
///
/// The store offers no compare-and-swap: claiming is optimistic, done by
/// writing and then re-reading to confirm the write survived. The elector
/// loop owns that protocol; this port only moves the record.
#[async_trait]
pub trait LockStore: Send + Sync {
    /// Current lock record, `None` when the row is empty or absent.
    async fn read(&self) -> Result<Option<LeaderLock>, DomainError>;

    /// Overwrite the lock record.
    async fn write(&self, lock: &LeaderLock) -> Result<(), DomainError>;
}
