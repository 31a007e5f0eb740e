use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Second-resolution UTC format shared by every instance writing the lock.
const HEARTBEAT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// The shared leader lock record.
///
/// The heartbeat is kept as the formatted string it is stored as,
/// because the store is also written by humans and older instances:
/// anything that fails to parse is simply treated as stale rather
/// than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderLock {
    pub leader_id: String,
    pub heartbeat_utc: String,
    pub note: String,
}

impl LeaderLock {
    /// A fresh claim by `leader_id` at `now`.
    pub fn claim(leader_id: &str, now: Timestamp) -> Self {
        Self {
            leader_id: leader_id.to_string(),
            heartbeat_utc: format_heartbeat(now),
            note: format!("claimed by {leader_id}"),
        }
    }

    /// The same claim with the heartbeat bumped to `now`.
    pub fn refreshed(&self, now: Timestamp) -> Self {
        Self {
            leader_id: self.leader_id.clone(),
            heartbeat_utc: format_heartbeat(now),
            note: self.note.clone(),
        }
    }

    pub fn is_held_by(&self, leader_id: &str) -> bool {
        self.leader_id == leader_id
    }

    pub fn parse_heartbeat(&self) -> Option<Timestamp> {
        let naive =
            NaiveDateTime::parse_from_str(self.heartbeat_utc.trim(), HEARTBEAT_FORMAT).ok()?;
        Some(Timestamp::from_datetime(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc)))
    }

    /// A lock is stale when its heartbeat is strictly older than
    /// `stale_after`, or when the heartbeat cannot be read at all.
    /// A heartbeat aged exactly `stale_after` is still considered live,
    /// and one from the future never reads as stale.
    pub fn is_stale(&self, stale_after: Duration, now: Timestamp) -> bool {
        let threshold = chrono::Duration::seconds(stale_after.as_secs() as i64);
        match self.parse_heartbeat() {
            Some(beat) => now.duration_since(&beat) > threshold,
            None => true,
        }
    }
}

pub fn format_heartbeat(ts: Timestamp) -> String {
    ts.as_datetime().format(HEARTBEAT_FORMAT).to_string()
}
