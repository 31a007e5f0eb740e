//! The per-user registration record.

use serde::{Deserialize, Serialize};

use super::{Course, PaymentMethod, Stage};

/// Reference to an uploaded payment receipt on the chat transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptRef {
    /// Transport-side file handle, opaque to the core.
    pub file_id: String,
    /// Photo uploads and document uploads are forwarded differently.
    pub is_photo: bool,
}

/// One user's progress through the funnel.
///
/// Every field except `stage` and `course` is filled in by a later stage
/// and starts absent; `stage` itself is absent until the user taps "join".
/// The record is persisted whole on every transition (full upsert), so a
/// caller mutates a loaded copy and writes it back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<Course>,
    /// Transport username of the registrant, captured at /start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Holding slot for the first gmail entry while awaiting confirmation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    /// Participant count for roster courses (kids / highschool).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roster_count: Option<u32>,
    /// Comma-joined participant names for roster courses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roster_names: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<u8>,
    /// Applied coupon code, stored uppercase for later redemption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<ReceiptRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_paid: Option<String>,
    /// Free-text sender details for methods that need them (wu_mg, vodafone).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_details: Option<String>,
    /// External ledger row handle, set once the registration is appended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger_row: Option<i64>,
}

impl Registration {
    /// A fresh record for a user who just issued /start.
    pub fn started(username: Option<String>) -> Self {
        Registration {
            username,
            ..Registration::default()
        }
    }

    /// True once the registration awaits an admin decision.
    pub fn is_completed(&self) -> bool {
        self.stage.is_some_and(|s| s.is_completed())
    }

    /// A record only counts toward abandonment once the dialogue has begun
    /// and until it completes.
    pub fn is_in_progress(&self) -> bool {
        matches!(self.stage, Some(s) if !s.is_completed())
    }
}
