//! Outbound message vocabulary.
//!
//! The core never renders message text: it emits semantic [`Prompt`]s and
//! [`AdminNotice`]s, and the chat transport adapter owns wording, buttons
//! and localization. Where multiple prompts come out of one transition
//! they must be delivered in order.

use crate::domain::foundation::UserId;

use super::{Course, PaymentQuote, Registration, Stage};

/// A message addressed to the registering user.
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    /// Welcome text plus the course menu.
    Welcome,
    /// Course description with join/FAQ/support buttons.
    CourseDetails(Course),
    AskFullName,
    AskEmail,
    /// Gmail-restricted course rejected a non-gmail address.
    GmailRequired,
    /// Structural email check failed.
    InvalidEmail,
    /// Ask the user to type the gmail address a second time.
    AskEmailConfirmation,
    /// Confirmation mismatch; restarting email entry.
    EmailMismatch,
    AskWhatsapp,
    AskRosterCount(Course),
    /// Count input did not parse as a positive integer.
    InvalidRosterCount,
    AskRosterNames(Course),
    /// Name count differs from the declared count; ask to confirm or re-enter.
    ConfirmRosterNames { entered: usize, expected: u32 },
    /// Re-entered names still mismatch the declared count.
    RosterStillMismatched { entered: usize, expected: u32 },
    AskCouponCode,
    CouponApplied { percent: u8 },
    /// Unknown, exhausted or wrong-course coupon; stage unchanged.
    CouponRejected,
    /// Payment method menu, noting an active discount if any.
    PaymentMenu { discount_percent: Option<u8> },
    /// Transfer instructions plus the computed amount due.
    PaymentInstructions(PaymentQuote),
    /// The chosen method is not configured in the pricing table.
    PaymentUnavailable,
    /// Receipt stored; registration goes to review.
    ReceiptReceived,
    UnderReview,
    AskWesternUnionDetails,
    AskVodafoneDetails,
    /// Receipt arrived outside the awaiting-receipt stage.
    FinishStepsFirst,
    /// Message arrived with no record or no recognizable stage.
    StartRequired,
    /// Course context was lost mid-flow (e.g. record wiped).
    SessionExpired,
    /// Admin rejected the registration.
    Rejected { support_contact: String },
    /// Payment confirmed, course-specific onboarding (ordered sequence part).
    PaymentConfirmed(Course),
    /// Course onboarding instructions (drive folder, groups, schedule).
    OnboardingInstructions(Course),
    /// Closing note of the private-coaching onboarding sequence.
    OnboardingFarewell,
    /// Abandonment reminder, worded by how far the user got.
    AbandonmentNudge(NudgeKind),
    /// Free-text admin broadcast.
    Broadcast(String),
}

/// Which nudge wording an abandoned user should receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeKind {
    /// Stopped at a payment step: close to done.
    PaymentPending,
    /// Stopped while entering contact details.
    DetailsPending,
    /// Only got as far as the name prompt.
    JustStarted,
    Generic,
}

impl NudgeKind {
    pub fn for_stage(stage: Stage) -> Self {
        if stage.is_payment_related() {
            NudgeKind::PaymentPending
        } else {
            match stage {
                Stage::AwaitingEmail | Stage::AwaitingWhatsapp => NudgeKind::DetailsPending,
                Stage::AwaitingName => NudgeKind::JustStarted,
                _ => NudgeKind::Generic,
            }
        }
    }
}

/// A message addressed to an admin.
#[derive(Debug, Clone, PartialEq)]
pub enum AdminNotice {
    /// A completed registration awaiting a decision, with the receipt and
    /// the full collected record for review.
    RegistrationSubmitted {
        user: UserId,
        registration: Registration,
    },
    /// A non-fatal side-effect failure admins should follow up by hand.
    Warning(String),
}

/// The ordered approval follow-up sequence for a course.
///
/// Private coaching gets a three-part sequence (confirmation, scheduling
/// instructions, closing note); the other courses get their onboarding in
/// a single message after the confirmation.
pub fn approval_sequence(course: Course) -> Vec<Prompt> {
    match course {
        Course::Private => vec![
            Prompt::PaymentConfirmed(course),
            Prompt::OnboardingInstructions(course),
            Prompt::OnboardingFarewell,
        ],
        _ => vec![
            Prompt::PaymentConfirmed(course),
            Prompt::OnboardingInstructions(course),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nudge_kind_follows_stage_groups() {
        assert_eq!(
            NudgeKind::for_stage(Stage::AwaitingReceipt),
            NudgeKind::PaymentPending
        );
        assert_eq!(
            NudgeKind::for_stage(Stage::AwaitingEmail),
            NudgeKind::DetailsPending
        );
        assert_eq!(NudgeKind::for_stage(Stage::AwaitingName), NudgeKind::JustStarted);
        assert_eq!(
            NudgeKind::for_stage(Stage::AwaitingKidsNames),
            NudgeKind::Generic
        );
    }

    #[test]
    fn private_sequence_has_three_ordered_parts() {
        let seq = approval_sequence(Course::Private);
        assert_eq!(seq.len(), 3);
        assert_eq!(seq[0], Prompt::PaymentConfirmed(Course::Private));
        assert_eq!(seq[2], Prompt::OnboardingFarewell);
    }

    #[test]
    fn other_courses_get_confirmation_then_onboarding() {
        for course in [Course::Expert, Course::Kids, Course::Highschool] {
            let seq = approval_sequence(course);
            assert_eq!(
                seq,
                vec![
                    Prompt::PaymentConfirmed(course),
                    Prompt::OnboardingInstructions(course)
                ]
            );
        }
    }
}
