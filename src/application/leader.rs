//! Leader election loop supervising the bot subprocess.
//!
//! Multiple instances run this loop against one shared lock record;
//! exactly one of them holds the lock at a time and keeps the bot
//! process alive. The store offers no compare-and-swap, so claiming is
//! optimistic: write the claim, re-read, and only believe it if the
//! re-read still shows this instance. A lost race costs one wasted
//! write and nothing else.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::domain::cluster::LeaderLock;
use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::{BotProcess, LockStore};

/// Tunables for the election loop.
#[derive(Debug, Clone)]
pub struct ElectorSettings {
    /// Identity written into the shared lock.
    pub instance_id: String,
    /// How often a leader refreshes its heartbeat.
    pub heartbeat_interval: Duration,
    /// Heartbeats older than this mark the lock as up for grabs.
    pub stale_after: Duration,
    /// Pause between election cycles.
    pub check_every: Duration,
    /// Pause after a cycle that failed with an error.
    pub error_backoff: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Standby,
    Leader,
}

/// The election loop: one per instance.
pub struct LeaderElector {
    settings: ElectorSettings,
    locks: Arc<dyn LockStore>,
    bot: Box<dyn BotProcess>,
    role: Role,
    last_heartbeat: Timestamp,
}

impl LeaderElector {
    pub fn new(
        settings: ElectorSettings,
        locks: Arc<dyn LockStore>,
        bot: Box<dyn BotProcess>,
    ) -> Self {
        Self {
            settings,
            locks,
            bot,
            role: Role::Standby,
            last_heartbeat: Timestamp::now(),
        }
    }

    pub fn is_leader(&self) -> bool {
        self.role == Role::Leader
    }

    /// One election cycle at time `now`.
    pub async fn tick(&mut self, now: Timestamp) -> Result<(), DomainError> {
        match self.role {
            Role::Standby => self.tick_standby(now).await,
            Role::Leader => self.tick_leader(now).await,
        }
    }

    async fn tick_standby(&mut self, now: Timestamp) -> Result<(), DomainError> {
        let current = self.locks.read().await?;
        let claimable = match &current {
            None => true,
            Some(lock) => {
                lock.is_held_by(&self.settings.instance_id)
                    || lock.is_stale(self.settings.stale_after, now)
            }
        };
        if !claimable {
            return Ok(());
        }

        if let Some(lock) = &current {
            if !lock.is_held_by(&self.settings.instance_id) {
                info!(
                    previous = %lock.leader_id,
                    heartbeat = %lock.heartbeat_utc,
                    "taking over a stale lock"
                );
            }
        }

        // Optimistic claim: write, then re-read to see who actually won.
        let claim = LeaderLock::claim(&self.settings.instance_id, now);
        self.locks.write(&claim).await?;
        let confirmed = self.locks.read().await?;
        if !confirmed.is_some_and(|lock| lock.is_held_by(&self.settings.instance_id)) {
            info!("lost the claim race, staying on standby");
            return Ok(());
        }

        info!(instance = %self.settings.instance_id, "became leader");
        self.role = Role::Leader;
        self.last_heartbeat = now;
        if !self.bot.is_running().await? {
            self.bot.start().await?;
        }
        Ok(())
    }

    async fn tick_leader(&mut self, now: Timestamp) -> Result<(), DomainError> {
        let current = self.locks.read().await?;
        let Some(lock) = current.filter(|lock| lock.is_held_by(&self.settings.instance_id))
        else {
            warn!("lock taken by another instance, stepping down");
            self.role = Role::Standby;
            self.bot.stop().await?;
            return Ok(());
        };

        let interval =
            chrono::Duration::seconds(self.settings.heartbeat_interval.as_secs() as i64);
        if now.duration_since(&self.last_heartbeat) >= interval {
            self.locks.write(&lock.refreshed(now)).await?;
            self.last_heartbeat = now;
        }

        // The leader keeps the bot alive across crashes and exits.
        if !self.bot.is_running().await? {
            warn!("bot process is down, restarting");
            self.bot.start().await?;
        }
        Ok(())
    }

    /// Run cycles until `shutdown` fires, then stop the bot.
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!(instance = %self.settings.instance_id, "election loop started");
        loop {
            let pause = match self.tick(Timestamp::now()).await {
                Ok(()) => self.settings.check_every,
                Err(e) => {
                    error!(error = %e, "election cycle failed");
                    self.settings.error_backoff
                }
            };
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(pause) => {}
            }
        }
        info!("election loop stopping");
        if let Err(e) = self.bot.stop().await {
            error!(error = %e, "failed to stop bot during shutdown");
        }
    }
}
