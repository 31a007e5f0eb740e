//! Inbound events consumed by the conversation engine.

use std::str::FromStr;

use super::{Course, PaymentMethod, ReceiptRef};

/// A structured button/callback action.
///
/// The transport delivers callback data as `<verb>_<arg>` strings
/// (`course_kids`, `pay_wu_mg`, ...); [`Action::from_callback_data`]
/// recovers the typed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// A course button on the welcome menu.
    SelectCourse(Course),
    /// "Join now" on a course detail view.
    Join(Course),
    /// "I have a coupon" on the payment menu.
    CouponRequest,
    /// Skip the coupon prompt and return to the payment menu.
    SkipCoupon,
    /// A payment method button.
    Pay(PaymentMethod),
    /// Back to the welcome menu, resetting the record.
    StartOver,
}

impl Action {
    /// Parses transport callback data into an action, if recognized.
    pub fn from_callback_data(data: &str) -> Option<Action> {
        if let Some(key) = data.strip_prefix("course_") {
            return Course::from_str(key).ok().map(Action::SelectCourse);
        }
        if let Some(key) = data.strip_prefix("join_") {
            return Course::from_str(key).ok().map(Action::Join);
        }
        if let Some(key) = data.strip_prefix("pay_") {
            return PaymentMethod::from_str(key).ok().map(Action::Pay);
        }
        match data {
            "coupon_request" => Some(Action::CouponRequest),
            "skip_coupon" => Some(Action::SkipCoupon),
            "start_over" => Some(Action::StartOver),
            _ => None,
        }
    }
}

/// A payment receipt arriving as a photo or document upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptUpload {
    pub file_id: String,
    pub is_photo: bool,
}

impl ReceiptUpload {
    pub fn into_ref(self) -> ReceiptRef {
        ReceiptRef {
            file_id: self.file_id,
            is_photo: self.is_photo,
        }
    }
}

/// An admin decision on a completed registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// Parses the `approve_<user>` / `reject_<user>` callback pair.
    pub fn from_callback_data(data: &str) -> Option<(Decision, i64)> {
        let (verb, id) = data.split_once('_')?;
        let user = id.parse().ok()?;
        match verb {
            "approve" => Some((Decision::Approve, user)),
            "reject" => Some((Decision::Reject, user)),
            _ => None,
        }
    }
}
