//! ReminderHandler - periodic abandonment sweep.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::registration::{NudgeKind, Prompt};
use crate::ports::{ChatClient, StateStore};

/// Handler for the abandonment-nudge sweep.
///
/// Each eligible user gets at most one nudge per funnel attempt: the
/// user is marked even when delivery fails, because a user who blocked
/// the bot should not be retried every sweep.
pub struct ReminderHandler {
    states: Arc<dyn StateStore>,
    chat: Arc<dyn ChatClient>,
    threshold_hours: i64,
}

impl ReminderHandler {
    pub fn new(states: Arc<dyn StateStore>, chat: Arc<dyn ChatClient>, threshold_hours: i64) -> Self {
        Self {
            states,
            chat,
            threshold_hours,
        }
    }

    /// One sweep: nudge everyone mid-funnel and idle past the threshold.
    /// Returns how many nudges went out.
    pub async fn sweep(&self) -> Result<u32, DomainError> {
        let cutoff = Timestamp::now().minus_hours(self.threshold_hours);
        let abandoned = self.states.list_abandoned(cutoff).await?;
        let mut nudged = 0;

        for (user, registration) in abandoned {
            let kind = registration
                .stage
                .map(NudgeKind::for_stage)
                .unwrap_or(NudgeKind::Generic);
            if let Err(e) = self.chat.send(user, Prompt::AbandonmentNudge(kind)).await {
                warn!(%user, error = %e, "nudge delivery failed");
            } else {
                nudged += 1;
            }
            // Marked regardless of delivery: one attempt per funnel.
            self.states.mark_reminder_sent(user).await?;
        }

        if nudged > 0 {
            info!(nudged, "abandonment sweep finished");
        }
        Ok(nudged)
    }
}
