//! Funnel behavior configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::foundation::UserId;

/// Settings for the dialogue side: admins, support contact, reminders.
#[derive(Debug, Clone, Deserialize)]
pub struct FunnelConfig {
    /// Chat user ids that receive submissions and warnings.
    pub admin_ids: Vec<i64>,

    /// Handle given to rejected users, e.g. `@course_support`.
    pub support_contact: String,

    /// Hours of inactivity before an abandonment nudge.
    #[serde(default = "default_reminder_threshold")]
    pub reminder_threshold_hours: i64,

    /// Milliseconds between broadcast sends.
    #[serde(default = "default_broadcast_pacing")]
    pub broadcast_pacing_ms: u64,
}

impl FunnelConfig {
    pub fn admin_user_ids(&self) -> Vec<UserId> {
        self.admin_ids.iter().copied().map(UserId::new).collect()
    }

    pub fn broadcast_pacing(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.broadcast_pacing_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.admin_ids.is_empty() {
            return Err(ValidationError::NoAdmins);
        }
        if self.support_contact.is_empty() {
            return Err(ValidationError::MissingRequired("FUNNEL_SUPPORT_CONTACT"));
        }
        if self.reminder_threshold_hours <= 0 {
            return Err(ValidationError::ZeroReminderThreshold);
        }
        Ok(())
    }
}

impl Default for FunnelConfig {
    fn default() -> Self {
        Self {
            admin_ids: Vec::new(),
            support_contact: String::new(),
            reminder_threshold_hours: default_reminder_threshold(),
            broadcast_pacing_ms: default_broadcast_pacing(),
        }
    }
}

fn default_reminder_threshold() -> i64 {
    2
}

fn default_broadcast_pacing() -> u64 {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_admins_and_support_contact() {
        assert!(FunnelConfig::default().validate().is_err());
        let config = FunnelConfig {
            admin_ids: vec![900],
            support_contact: "@support".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.admin_user_ids(), vec![UserId::new(900)]);
    }

    #[test]
    fn reminder_threshold_must_be_positive() {
        let config = FunnelConfig {
            admin_ids: vec![900],
            support_contact: "@support".to_string(),
            reminder_threshold_hours: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
