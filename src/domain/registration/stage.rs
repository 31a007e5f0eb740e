//! Registration dialogue stages.
//!
//! The stage is the discriminant of the funnel state machine: it selects
//! which validation applies to the next inbound event and which prompt the
//! user sees. Transitions here are the structural union over all courses;
//! the engine narrows them using the selected course (e.g. only a kids
//! enrollment ever reaches `AwaitingKidsCount`).

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Where a user currently is in the registration dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    AwaitingName,
    AwaitingEmail,
    AwaitingEmailConfirmation,
    AwaitingWhatsapp,
    AwaitingKidsCount,
    AwaitingKidsNames,
    ConfirmKidsNames,
    AwaitingHsCount,
    AwaitingHsNames,
    ConfirmHsNames,
    AwaitingCoupon,
    AwaitingPaymentChoice,
    AwaitingReceipt,
    AwaitingAmount,
    AwaitingWuDetails,
    AwaitingVodafoneDetails,
    Completed,
}

impl Stage {
    /// True once the registration has been handed to admin review.
    pub fn is_completed(&self) -> bool {
        matches!(self, Stage::Completed)
    }

    /// Stages where the funnel is waiting on payment rather than contact data.
    /// Used to pick the abandonment nudge wording.
    pub fn is_payment_related(&self) -> bool {
        matches!(
            self,
            Stage::AwaitingPaymentChoice | Stage::AwaitingReceipt | Stage::AwaitingAmount
        )
    }
}

impl StateMachine for Stage {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use Stage::*;
        match self {
            AwaitingName => vec![AwaitingEmail],
            AwaitingEmail => vec![AwaitingWhatsapp, AwaitingEmailConfirmation],
            AwaitingEmailConfirmation => vec![AwaitingWhatsapp, AwaitingEmail],
            AwaitingWhatsapp => vec![AwaitingKidsCount, AwaitingHsCount, AwaitingPaymentChoice],
            AwaitingKidsCount => vec![AwaitingKidsNames],
            AwaitingKidsNames => vec![AwaitingPaymentChoice, ConfirmKidsNames],
            ConfirmKidsNames => vec![AwaitingPaymentChoice],
            AwaitingHsCount => vec![AwaitingHsNames],
            AwaitingHsNames => vec![AwaitingPaymentChoice, ConfirmHsNames],
            ConfirmHsNames => vec![AwaitingPaymentChoice],
            AwaitingCoupon => vec![AwaitingPaymentChoice],
            AwaitingPaymentChoice => vec![AwaitingCoupon, AwaitingReceipt],
            AwaitingReceipt => vec![AwaitingWuDetails, AwaitingVodafoneDetails, Completed],
            AwaitingAmount => vec![Completed],
            AwaitingWuDetails => vec![Completed],
            AwaitingVodafoneDetails => vec![Completed],
            Completed => vec![],
        }
    }
}
