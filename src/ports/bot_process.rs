//! Supervised bot subprocess port.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

/// Port for the bot subprocess the leader instance supervises.
///
/// Methods take `&mut self`: the elector loop is the only owner and
/// drives start/stop strictly in sequence.
#[async_trait]
pub trait BotProcess: Send {
    /// Launch the bot. Errors if it is already running or cannot spawn.
    async fn start(&mut self) -> Result<(), DomainError>;

    /// Whether the child is currently alive. Reaps an exited child as a
    /// side effect, so a `false` answer is safe to act on immediately.
    async fn is_running(&mut self) -> Result<bool, DomainError>;

    /// Stop the bot: ask politely first, then force after a bounded
    /// grace period. A no-op when nothing is running.
    async fn stop(&mut self) -> Result<(), DomainError>;
}
