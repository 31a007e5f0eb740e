//! Leader-election and bot-supervision configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::ElectorSettings;

/// Settings for the election loop and the supervised bot command.
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterConfig {
    /// Identity this instance writes into the shared lock.
    pub instance_id: String,

    /// Shell command that launches the bot subprocess.
    pub bot_command: String,

    /// How often a leader refreshes its heartbeat, in seconds.
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,

    /// Heartbeats older than this make the lock claimable, in seconds.
    #[serde(default = "default_stale_after")]
    pub stale_after_secs: u64,

    /// Pause between election cycles, in seconds.
    #[serde(default = "default_check_every")]
    pub check_every_secs: u64,

    /// Pause after a failed cycle, in seconds.
    #[serde(default = "default_error_backoff")]
    pub error_backoff_secs: u64,

    /// How long a stopping bot gets between SIGTERM and SIGKILL.
    #[serde(default = "default_stop_grace")]
    pub stop_grace_secs: u64,
}

impl ClusterConfig {
    pub fn stop_grace(&self) -> Duration {
        Duration::from_secs(self.stop_grace_secs)
    }

    pub fn elector_settings(&self) -> ElectorSettings {
        ElectorSettings {
            instance_id: self.instance_id.clone(),
            heartbeat_interval: Duration::from_secs(self.heartbeat_interval_secs),
            stale_after: Duration::from_secs(self.stale_after_secs),
            check_every: Duration::from_secs(self.check_every_secs),
            error_backoff: Duration::from_secs(self.error_backoff_secs),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.instance_id.is_empty() {
            return Err(ValidationError::MissingRequired("CLUSTER_INSTANCE_ID"));
        }
        if self.bot_command.is_empty() {
            return Err(ValidationError::MissingRequired("CLUSTER_BOT_COMMAND"));
        }
        if self.check_every_secs == 0 {
            return Err(ValidationError::ZeroCheckInterval);
        }
        // A window tighter than the heartbeat would make live leaders
        // look dead between refreshes.
        if self.stale_after_secs <= self.heartbeat_interval_secs {
            return Err(ValidationError::StalenessBelowHeartbeat);
        }
        Ok(())
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            instance_id: String::new(),
            bot_command: String::new(),
            heartbeat_interval_secs: default_heartbeat_interval(),
            stale_after_secs: default_stale_after(),
            check_every_secs: default_check_every(),
            error_backoff_secs: default_error_backoff(),
            stop_grace_secs: default_stop_grace(),
        }
    }
}

fn default_heartbeat_interval() -> u64 {
    60
}

fn default_stale_after() -> u64 {
    180
}

fn default_check_every() -> u64 {
    30
}

fn default_error_backoff() -> u64 {
    10
}

fn default_stop_grace() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ClusterConfig {
        ClusterConfig {
            instance_id: "bot-a".to_string(),
            bot_command: "python bot.py".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_pass_validation_once_identity_is_set() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn missing_identity_or_command_fails() {
        assert!(ClusterConfig::default().validate().is_err());
        let config = ClusterConfig {
            bot_command: String::new(),
            ..valid()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn staleness_must_exceed_heartbeat() {
        let config = ClusterConfig {
            heartbeat_interval_secs: 60,
            stale_after_secs: 60,
            ..valid()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn elector_settings_carry_the_durations() {
        let settings = valid().elector_settings();
        assert_eq!(settings.heartbeat_interval, Duration::from_secs(60));
        assert_eq!(settings.stale_after, Duration::from_secs(180));
        assert_eq!(settings.check_every, Duration::from_secs(30));
    }
}
