//! StatsHandler - aggregate funnel counts for admins.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::domain::registration::Course;
use crate::ports::StateStore;

/// Snapshot of the funnel at one moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunnelStats {
    pub total: u32,
    pub in_progress: u32,
    /// Completed and waiting for an admin decision.
    pub awaiting_review: u32,
    /// Started the bot but never joined a course.
    pub browsing: u32,
    /// Per-course counts in menu order, including courses with zero.
    pub by_course: Vec<(Course, u32)>,
}

/// Handler for the admin stats command.
pub struct StatsHandler {
    states: Arc<dyn StateStore>,
}

impl StatsHandler {
    pub fn new(states: Arc<dyn StateStore>) -> Self {
        Self { states }
    }

    pub async fn collect(&self) -> Result<FunnelStats, DomainError> {
        let records = self.states.list_all().await?;

        let mut stats = FunnelStats {
            total: records.len() as u32,
            in_progress: 0,
            awaiting_review: 0,
            browsing: 0,
            by_course: Course::all().iter().map(|c| (*c, 0)).collect(),
        };

        for (_, registration) in records {
            if registration.is_completed() {
                stats.awaiting_review += 1;
            } else if registration.is_in_progress() {
                stats.in_progress += 1;
            } else {
                stats.browsing += 1;
            }
            if let Some(course) = registration.course {
                if let Some(entry) = stats.by_course.iter_mut().find(|(c, _)| *c == course) {
                    entry.1 += 1;
                }
            }
        }

        Ok(stats)
    }
}
