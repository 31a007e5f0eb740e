//! The funnel engine: pure, deterministic stage transitions.
//!
//! The engine owns every dialogue rule from course selection to receipt
//! hand-off. It is synchronous and side-effect free: callers load the
//! [`Registration`], apply one inbound event, persist the record when
//! `changed` is set, deliver `replies` in order, and execute the returned
//! [`Effect`], if any. Coupon lookup is the one asynchronous dependency,
//! so it is surfaced as [`Effect::CheckCoupon`] and the outcome is fed
//! back through [`FunnelEngine::resolve_coupon`].

use super::{
    Action, Course, PaymentMethod, PricingTable, Prompt, Registration, ReceiptUpload, Stage,
};
use crate::domain::coupon::CouponRecord;
use crate::domain::foundation::StateMachine;

/// Tokens accepted as "yes, the roster is fine as entered".
const AFFIRMATIVE_TOKENS: [&str; 5] = ["موافق", "ok", "تمام", "نعم", "yes"];

/// Token that skips the coupon prompt.
const SKIP_TOKEN: &str = "تخطي";

/// Outcome of applying one inbound event.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// The record was mutated and must be written back.
    pub changed: bool,
    /// Prompts to deliver to the user, in order.
    pub replies: Vec<Prompt>,
    /// Follow-up work the caller must perform.
    pub effect: Option<Effect>,
}

impl Step {
    /// Re-prompt without touching the record.
    fn stay(replies: Vec<Prompt>) -> Self {
        Step {
            changed: false,
            replies,
            effect: None,
        }
    }

    /// The record changed; persist before replying.
    fn advance(replies: Vec<Prompt>) -> Self {
        Step {
            changed: true,
            replies,
            effect: None,
        }
    }

    fn advance_with(replies: Vec<Prompt>, effect: Effect) -> Self {
        Step {
            changed: true,
            replies,
            effect: Some(effect),
        }
    }
}

/// Asynchronous follow-up the caller must carry out after a step.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Resolve the code against the coupon store and call
    /// [`FunnelEngine::resolve_coupon`] with the result.
    CheckCoupon { code: String },
    /// Registration completed: append it to the ledger and notify admins.
    ForwardToAdmins,
}

/// The stage machine, parameterized only by the injected pricing table.
#[derive(Debug, Clone)]
pub struct FunnelEngine {
    pricing: PricingTable,
}

impl FunnelEngine {
    pub fn new(pricing: PricingTable) -> Self {
        Self { pricing }
    }

    /// /start: reset the record (keeping nothing but the username) and show
    /// the course menu.
    pub fn on_start(&self, reg: &mut Registration, username: Option<String>) -> Step {
        *reg = Registration::started(username);
        Step::advance(vec![Prompt::Welcome])
    }

    /// A button/callback action.
    pub fn on_action(&self, reg: &mut Registration, action: Action) -> Step {
        match action {
            Action::SelectCourse(course) => {
                reg.course = Some(course);
                Step::advance(vec![Prompt::CourseDetails(course)])
            }
            Action::Join(course) => {
                // Joining (re)enters the funnel from any point, including a
                // stale course card, so it bypasses the transition table.
                reg.course = Some(course);
                reg.stage = Some(Stage::AwaitingName);
                Step::advance(vec![Prompt::AskFullName])
            }
            Action::CouponRequest => {
                // Menu buttons outlive the stage that showed them; a tap on
                // a stale keyboard still moves the dialogue, so the
                // action-driven stages are assigned directly.
                reg.stage = Some(Stage::AwaitingCoupon);
                Step::advance(vec![Prompt::AskCouponCode])
            }
            Action::SkipCoupon => {
                reg.stage = Some(Stage::AwaitingPaymentChoice);
                Step::advance(vec![self.payment_menu(reg)])
            }
            Action::Pay(method) => self.choose_payment(reg, method),
            Action::StartOver => {
                let username = reg.username.take();
                self.on_start(reg, username)
            }
        }
    }

    /// A free-text message, interpreted against the current stage.
    pub fn on_text(&self, reg: &mut Registration, text: &str) -> Step {
        let text = text.trim();
        match reg.stage {
            None => Step::stay(vec![Prompt::StartRequired]),
            Some(Stage::AwaitingName) => {
                reg.name = Some(text.to_string());
                set_stage(reg, Stage::AwaitingEmail);
                Step::advance(vec![Prompt::AskEmail])
            }
            Some(Stage::AwaitingEmail) => self.collect_email(reg, text),
            Some(Stage::AwaitingEmailConfirmation) => self.confirm_email(reg, text),
            Some(Stage::AwaitingWhatsapp) => {
                reg.whatsapp = Some(text.to_string());
                match reg.course {
                    Some(Course::Kids) => {
                        set_stage(reg, Stage::AwaitingKidsCount);
                        Step::advance(vec![Prompt::AskRosterCount(Course::Kids)])
                    }
                    Some(Course::Highschool) => {
                        set_stage(reg, Stage::AwaitingHsCount);
                        Step::advance(vec![Prompt::AskRosterCount(Course::Highschool)])
                    }
                    _ => {
                        set_stage(reg, Stage::AwaitingPaymentChoice);
                        Step::advance(vec![self.payment_menu(reg)])
                    }
                }
            }
            Some(Stage::AwaitingKidsCount) => {
                self.collect_count(reg, text, Course::Kids, Stage::AwaitingKidsNames)
            }
            Some(Stage::AwaitingHsCount) => {
                self.collect_count(reg, text, Course::Highschool, Stage::AwaitingHsNames)
            }
            Some(Stage::AwaitingKidsNames) => self.collect_names(reg, text, Stage::ConfirmKidsNames),
            Some(Stage::AwaitingHsNames) => self.collect_names(reg, text, Stage::ConfirmHsNames),
            Some(Stage::ConfirmKidsNames) | Some(Stage::ConfirmHsNames) => {
                self.confirm_names(reg, text)
            }
            Some(Stage::AwaitingCoupon) => {
                if text == SKIP_TOKEN {
                    set_stage(reg, Stage::AwaitingPaymentChoice);
                    Step::advance(vec![self.payment_menu(reg)])
                } else {
                    Step {
                        changed: false,
                        replies: vec![],
                        effect: Some(Effect::CheckCoupon {
                            code: text.to_string(),
                        }),
                    }
                }
            }
            Some(Stage::AwaitingAmount) => {
                reg.amount_paid = Some(text.to_string());
                set_stage(reg, Stage::Completed);
                Step::advance_with(vec![Prompt::UnderReview], Effect::ForwardToAdmins)
            }
            Some(Stage::AwaitingWuDetails) | Some(Stage::AwaitingVodafoneDetails) => {
                reg.transfer_details = Some(text.to_string());
                set_stage(reg, Stage::Completed);
                Step::advance_with(vec![Prompt::UnderReview], Effect::ForwardToAdmins)
            }
            // Text at a button-driven or terminal stage: point back to /start.
            Some(Stage::AwaitingPaymentChoice)
            | Some(Stage::AwaitingReceipt)
            | Some(Stage::Completed) => Step::stay(vec![Prompt::StartRequired]),
        }
    }

    /// Feeds a coupon-store lookup back into the dialogue.
    ///
    /// `coupon` is whatever the store returned for the code; scope and
    /// usage-limit checks happen here via [`CouponRecord::discount_for`],
    /// so validation stays deterministic and side-effect free.
    pub fn resolve_coupon(
        &self,
        reg: &mut Registration,
        code: &str,
        coupon: Option<&CouponRecord>,
    ) -> Step {
        if reg.stage != Some(Stage::AwaitingCoupon) {
            return Step::stay(vec![]);
        }
        match coupon.and_then(|c| c.discount_for(reg.course)) {
            Some(percent) => {
                reg.discount_percent = Some(percent);
                reg.coupon_code = Some(CouponRecord::normalize_code(code));
                set_stage(reg, Stage::AwaitingPaymentChoice);
                Step::advance(vec![Prompt::CouponApplied { percent }, self.payment_menu(reg)])
            }
            None => Step::stay(vec![Prompt::CouponRejected]),
        }
    }

    /// A photo or document upload.
    pub fn on_receipt(&self, reg: &mut Registration, upload: ReceiptUpload) -> Step {
        if reg.stage != Some(Stage::AwaitingReceipt) {
            return Step::stay(vec![Prompt::FinishStepsFirst]);
        }
        reg.receipt = Some(upload.into_ref());
        match reg.payment_method {
            Some(PaymentMethod::VodafoneEg) => {
                set_stage(reg, Stage::AwaitingVodafoneDetails);
                Step::advance(vec![Prompt::ReceiptReceived, Prompt::AskVodafoneDetails])
            }
            Some(PaymentMethod::WuMg) => {
                set_stage(reg, Stage::AwaitingWuDetails);
                Step::advance(vec![Prompt::ReceiptReceived, Prompt::AskWesternUnionDetails])
            }
            _ => {
                set_stage(reg, Stage::Completed);
                Step::advance_with(
                    vec![Prompt::ReceiptReceived, Prompt::UnderReview],
                    Effect::ForwardToAdmins,
                )
            }
        }
    }

    fn collect_email(&self, reg: &mut Registration, text: &str) -> Step {
        if !text.contains('@') || !text.contains('.') {
            return Step::stay(vec![Prompt::InvalidEmail]);
        }
        if reg.course.is_some_and(|c| c.requires_gmail()) {
            if !text.to_lowercase().ends_with("@gmail.com") {
                return Step::stay(vec![Prompt::GmailRequired]);
            }
            reg.pending_email = Some(text.to_string());
            set_stage(reg, Stage::AwaitingEmailConfirmation);
            return Step::advance(vec![Prompt::AskEmailConfirmation]);
        }
        reg.email = Some(text.to_string());
        set_stage(reg, Stage::AwaitingWhatsapp);
        Step::advance(vec![Prompt::AskWhatsapp])
    }

    fn confirm_email(&self, reg: &mut Registration, text: &str) -> Step {
        let first = reg.pending_email.take().unwrap_or_default();
        if text.to_lowercase() == first.trim().to_lowercase() {
            reg.email = Some(first);
            set_stage(reg, Stage::AwaitingWhatsapp);
            Step::advance(vec![Prompt::AskWhatsapp])
        } else {
            // Mismatch: discard the held value and restart email entry.
            set_stage(reg, Stage::AwaitingEmail);
            Step::advance(vec![Prompt::EmailMismatch])
        }
    }

    fn collect_count(
        &self,
        reg: &mut Registration,
        text: &str,
        course: Course,
        next: Stage,
    ) -> Step {
        match text.parse::<u32>() {
            Ok(count) if count > 0 => {
                reg.roster_count = Some(count);
                set_stage(reg, next);
                Step::advance(vec![Prompt::AskRosterNames(course)])
            }
            _ => Step::stay(vec![Prompt::InvalidRosterCount]),
        }
    }

    fn collect_names(&self, reg: &mut Registration, text: &str, confirm: Stage) -> Step {
        let names = split_names(text);
        reg.roster_names = Some(names.join(", "));
        let expected = reg.roster_count.unwrap_or(0);
        if expected > 0 && names.len() != expected as usize {
            set_stage(reg, confirm);
            return Step::advance(vec![Prompt::ConfirmRosterNames {
                entered: names.len(),
                expected,
            }]);
        }
        set_stage(reg, Stage::AwaitingPaymentChoice);
        Step::advance(vec![self.payment_menu(reg)])
    }

    fn confirm_names(&self, reg: &mut Registration, text: &str) -> Step {
        if is_affirmative(text) {
            set_stage(reg, Stage::AwaitingPaymentChoice);
            return Step::advance(vec![self.payment_menu(reg)]);
        }
        // Anything else is treated as a fresh roster entry.
        let names = split_names(text);
        reg.roster_names = Some(names.join(", "));
        let expected = reg.roster_count.unwrap_or(0);
        if expected > 0 && names.len() != expected as usize {
            return Step::advance(vec![Prompt::RosterStillMismatched {
                entered: names.len(),
                expected,
            }]);
        }
        set_stage(reg, Stage::AwaitingPaymentChoice);
        Step::advance(vec![self.payment_menu(reg)])
    }

    fn choose_payment(&self, reg: &mut Registration, method: PaymentMethod) -> Step {
        let Some(course) = reg.course else {
            return Step::stay(vec![Prompt::SessionExpired]);
        };
        let Some(quote) =
            self.pricing
                .quote(method, course, reg.roster_count, reg.discount_percent)
        else {
            return Step::stay(vec![Prompt::PaymentUnavailable]);
        };
        reg.payment_method = Some(method);
        // Payment buttons are re-tappable from any stage the menu survives.
        reg.stage = Some(Stage::AwaitingReceipt);
        Step::advance(vec![Prompt::PaymentInstructions(quote)])
    }

    fn payment_menu(&self, reg: &Registration) -> Prompt {
        Prompt::PaymentMenu {
            discount_percent: reg.discount_percent,
        }
    }
}

fn set_stage(reg: &mut Registration, to: Stage) {
    // Identity transitions (a repeated answer landing on the same stage)
    // are a no-op, not a violation.
    debug_assert!(
        reg.stage
            .map_or(true, |from| from == to || from.can_transition_to(&to)),
        "invalid stage transition {:?} -> {:?}",
        reg.stage,
        to
    );
    reg.stage = Some(to);
}

fn is_affirmative(text: &str) -> bool {
    let lowered = text.trim().to_lowercase();
    AFFIRMATIVE_TOKENS.iter().any(|t| lowered == *t)
}

fn split_names(text: &str) -> Vec<String> {
    text.split([',', '،'])
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}
