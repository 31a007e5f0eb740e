//! Outbound chat transport port.
//!
//! The dialogue engine produces semantic [`Prompt`]s; how they are
//! rendered (text, keyboards, message splitting) is entirely the
//! transport adapter's concern.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::registration::{AdminNotice, Prompt};

/// Port for delivering messages to users and admins.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Deliver one prompt to a user.
    async fn send(&self, user: UserId, prompt: Prompt) -> Result<(), DomainError>;

    /// Deliver an operational notice to one admin.
    async fn notify_admin(&self, admin: UserId, notice: AdminNotice) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_client_is_object_safe() {
        fn _accepts_dyn(_chat: &dyn ChatClient) {}
    }
}
