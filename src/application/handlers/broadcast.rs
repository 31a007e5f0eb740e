//! BroadcastHandler - admin fan-out to users still mid-funnel.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::registration::Prompt;
use crate::ports::{ChatClient, StateStore};

/// Tally of one broadcast run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BroadcastReport {
    pub sent: u32,
    pub failed: u32,
    /// Recipients skipped because the run was cancelled.
    pub cancelled: u32,
}

/// Handler for the admin broadcast command.
pub struct BroadcastHandler {
    states: Arc<dyn StateStore>,
    chat: Arc<dyn ChatClient>,
    /// Pause between sends, to stay under transport rate limits.
    pacing: Duration,
}

impl BroadcastHandler {
    pub fn new(states: Arc<dyn StateStore>, chat: Arc<dyn ChatClient>, pacing: Duration) -> Self {
        Self {
            states,
            chat,
            pacing,
        }
    }

    /// Send `message` to every user with a stored record.
    pub async fn broadcast_all(
        &self,
        message: &str,
        cancel: CancellationToken,
    ) -> Result<BroadcastReport, DomainError> {
        let recipients = self
            .states
            .list_all()
            .await?
            .into_iter()
            .map(|(user, _)| user)
            .collect();
        self.run(recipients, message, cancel).await
    }

    /// Send `message` only to users whose funnel is started but not
    /// completed.
    pub async fn broadcast_incomplete(
        &self,
        message: &str,
        cancel: CancellationToken,
    ) -> Result<BroadcastReport, DomainError> {
        let recipients = self.states.list_incomplete().await?;
        self.run(recipients, message, cancel).await
    }

    /// Per-recipient failures are counted, not fatal, and a cancelled
    /// run reports how many recipients it never reached.
    async fn run(
        &self,
        recipients: Vec<UserId>,
        message: &str,
        cancel: CancellationToken,
    ) -> Result<BroadcastReport, DomainError> {
        let total = recipients.len();
        let mut report = BroadcastReport::default();

        for (index, user) in recipients.into_iter().enumerate() {
            if cancel.is_cancelled() {
                report.cancelled = (total - index) as u32;
                break;
            }
            match self
                .chat
                .send(user, Prompt::Broadcast(message.to_string()))
                .await
            {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    warn!(%user, error = %e, "broadcast delivery failed");
                    report.failed += 1;
                }
            }
            if !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
        }

        info!(
            sent = report.sent,
            failed = report.failed,
            cancelled = report.cancelled,
            "broadcast finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{MockChatClient, MockStateStore};
    use crate::domain::registration::{Course, Registration, Stage};

    fn mid_funnel() -> Registration {
        let mut reg = Registration::started(None);
        reg.course = Some(Course::Expert);
        reg.stage = Some(Stage::AwaitingEmail);
        reg
    }

    async fn seeded_states(users: &[i64]) -> Arc<MockStateStore> {
        let states = Arc::new(MockStateStore::default());
        for id in users {
            states.put(UserId::new(*id), &mid_funnel()).await.unwrap();
        }
        states
    }

    #[tokio::test]
    async fn reaches_only_incomplete_users() {
        let states = seeded_states(&[1, 2]).await;
        let mut done = mid_funnel();
        done.stage = Some(Stage::Completed);
        states.put(UserId::new(3), &done).await.unwrap();

        let chat = Arc::new(MockChatClient::default());
        let handler = BroadcastHandler::new(states, chat.clone(), Duration::ZERO);
        let report = handler
            .broadcast_incomplete("offer ends tonight", CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.sent, 2);
        assert_eq!(report.failed, 0);
        assert!(chat.sent_to(UserId::new(3)).is_empty());
        assert_eq!(
            chat.sent_to(UserId::new(1)),
            vec![Prompt::Broadcast("offer ends tonight".to_string())]
        );
    }

    #[tokio::test]
    async fn broadcast_all_includes_completed_users() {
        let states = seeded_states(&[1]).await;
        let mut done = mid_funnel();
        done.stage = Some(Stage::Completed);
        states.put(UserId::new(2), &done).await.unwrap();

        let chat = Arc::new(MockChatClient::default());
        let handler = BroadcastHandler::new(states, chat.clone(), Duration::ZERO);
        let report = handler
            .broadcast_all("schedule change", CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.sent, 2);
        assert_eq!(chat.sent_to(UserId::new(2)).len(), 1);
    }

    #[tokio::test]
    async fn failures_are_counted_not_fatal() {
        let states = seeded_states(&[1, 2, 3]).await;
        let chat = Arc::new(MockChatClient::default());
        chat.fail_for(UserId::new(2));

        let handler = BroadcastHandler::new(states, chat.clone(), Duration::ZERO);
        let report = handler
            .broadcast_incomplete("msg", CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.sent, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(chat.sent_to(UserId::new(3)).len(), 1);
    }

    #[tokio::test]
    async fn cancellation_reports_unreached_recipients() {
        let states = seeded_states(&[1, 2, 3]).await;
        let chat = Arc::new(MockChatClient::default());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let handler = BroadcastHandler::new(states, chat.clone(), Duration::ZERO);
        let report = handler.broadcast_incomplete("msg", cancel).await.unwrap();

        assert_eq!(report.sent, 0);
        assert_eq!(report.cancelled, 3);
    }
}
