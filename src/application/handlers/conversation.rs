//! ConversationHandler - drives one user's funnel dialogue.
//!
//! Wires the pure engine to the ports: load the record, apply one
//! inbound event, persist before replying, then carry out any effect
//! the engine asked for.

use std::sync::Arc;

use tracing::{error, warn};

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::registration::{
    Action, AdminNotice, Effect, FunnelEngine, Prompt, ReceiptUpload, Registration, Step,
};
use crate::ports::{ChatClient, CouponStore, RegistrationLedger, StateStore};

/// Handler for user-facing funnel traffic.
pub struct ConversationHandler {
    states: Arc<dyn StateStore>,
    coupons: Arc<dyn CouponStore>,
    ledger: Arc<dyn RegistrationLedger>,
    chat: Arc<dyn ChatClient>,
    engine: FunnelEngine,
    admin_ids: Vec<UserId>,
}

impl ConversationHandler {
    pub fn new(
        states: Arc<dyn StateStore>,
        coupons: Arc<dyn CouponStore>,
        ledger: Arc<dyn RegistrationLedger>,
        chat: Arc<dyn ChatClient>,
        engine: FunnelEngine,
        admin_ids: Vec<UserId>,
    ) -> Self {
        Self {
            states,
            coupons,
            ledger,
            chat,
            engine,
            admin_ids,
        }
    }

    pub async fn on_start(
        &self,
        user: UserId,
        username: Option<String>,
    ) -> Result<(), DomainError> {
        let mut registration = self.load(user).await;
        let step = self.engine.on_start(&mut registration, username);
        self.apply(user, &mut registration, step).await
    }

    pub async fn on_text(&self, user: UserId, text: &str) -> Result<(), DomainError> {
        let mut registration = self.load(user).await;
        let step = self.engine.on_text(&mut registration, text);
        self.apply(user, &mut registration, step).await
    }

    pub async fn on_action(&self, user: UserId, action: Action) -> Result<(), DomainError> {
        let mut registration = self.load(user).await;
        let step = self.engine.on_action(&mut registration, action);
        self.apply(user, &mut registration, step).await
    }

    pub async fn on_receipt(&self, user: UserId, upload: ReceiptUpload) -> Result<(), DomainError> {
        let mut registration = self.load(user).await;
        let step = self.engine.on_receipt(&mut registration, upload);
        self.apply(user, &mut registration, step).await
    }

    /// A load failure must not brick the conversation: the user gets a
    /// fresh record and the corrupt row is overwritten on the next save.
    async fn load(&self, user: UserId) -> Registration {
        match self.states.get(user).await {
            Ok(Some(registration)) => registration,
            Ok(None) => Registration::default(),
            Err(e) => {
                error!(%user, error = %e, "failed to load state, starting fresh");
                Registration::default()
            }
        }
    }

    /// Persist first, reply second: a crash between the two re-prompts
    /// the user instead of losing what they entered.
    async fn apply(
        &self,
        user: UserId,
        registration: &mut Registration,
        step: Step,
    ) -> Result<(), DomainError> {
        if step.changed {
            self.states.put(user, registration).await?;
        }
        for prompt in step.replies {
            self.chat.send(user, prompt).await?;
        }
        match step.effect {
            Some(Effect::CheckCoupon { code }) => self.check_coupon(user, registration, &code).await,
            Some(Effect::ForwardToAdmins) => self.forward(user, registration).await,
            None => Ok(()),
        }
    }

    async fn check_coupon(
        &self,
        user: UserId,
        registration: &mut Registration,
        code: &str,
    ) -> Result<(), DomainError> {
        // A store failure reads as "no such coupon": the user can retry
        // or skip rather than getting stuck.
        let coupon = match self.coupons.find(code).await {
            Ok(coupon) => coupon,
            Err(e) => {
                error!(%user, error = %e, "coupon lookup failed");
                None
            }
        };
        let step = self
            .engine
            .resolve_coupon(registration, code, coupon.as_ref());
        if step.changed {
            self.states.put(user, registration).await?;
        }
        for prompt in step.replies {
            self.chat.send(user, prompt).await?;
        }
        Ok(())
    }

    async fn forward(
        &self,
        user: UserId,
        registration: &mut Registration,
    ) -> Result<(), DomainError> {
        // Ledger first, so the row position rides along in the admin
        // notice's registration snapshot. A ledger failure downgrades to
        // a warning: the approval flow still works from the chat alone.
        match self.ledger.append(user, registration).await {
            Ok(row) => {
                registration.ledger_row = Some(row.0);
                self.states.put(user, registration).await?;
            }
            Err(e) => {
                warn!(%user, error = %e, "ledger append failed");
                self.warn_admins(format!(
                    "Registration from user {} was not recorded in the ledger: {}",
                    user, e
                ))
                .await;
            }
        }

        for admin in &self.admin_ids {
            let notice = AdminNotice::RegistrationSubmitted {
                user,
                registration: registration.clone(),
            };
            // One unreachable admin must not silence the rest.
            if let Err(e) = self.chat.notify_admin(*admin, notice).await {
                error!(%admin, error = %e, "failed to notify admin");
            }
        }
        Ok(())
    }

    async fn warn_admins(&self, message: String) {
        for admin in &self.admin_ids {
            if let Err(e) = self
                .chat
                .notify_admin(*admin, AdminNotice::Warning(message.clone()))
                .await
            {
                error!(%admin, error = %e, "failed to deliver admin warning");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{
        engine_with_pricing, MockChatClient, MockCouponStore, MockLedger, MockStateStore,
    };
    use crate::domain::coupon::CouponRecord;
    use crate::domain::registration::{Course, PaymentMethod, Stage};

    fn handler(
        states: Arc<MockStateStore>,
        coupons: Arc<MockCouponStore>,
        ledger: Arc<MockLedger>,
        chat: Arc<MockChatClient>,
    ) -> ConversationHandler {
        ConversationHandler::new(
            states,
            coupons,
            ledger,
            chat,
            engine_with_pricing(),
            vec![UserId::new(900), UserId::new(901)],
        )
    }

    fn deps() -> (
        Arc<MockStateStore>,
        Arc<MockCouponStore>,
        Arc<MockLedger>,
        Arc<MockChatClient>,
    ) {
        (
            Arc::new(MockStateStore::default()),
            Arc::new(MockCouponStore::default()),
            Arc::new(MockLedger::default()),
            Arc::new(MockChatClient::default()),
        )
    }

    #[tokio::test]
    async fn start_persists_a_fresh_record_and_welcomes() {
        let (states, coupons, ledger, chat) = deps();
        let handler = handler(states.clone(), coupons, ledger, chat.clone());
        let user = UserId::new(1);

        handler.on_start(user, Some("u".to_string())).await.unwrap();

        let stored = states.stored(user).unwrap();
        assert_eq!(stored.username.as_deref(), Some("u"));
        assert_eq!(chat.sent_to(user), vec![Prompt::Welcome]);
    }

    #[tokio::test]
    async fn reprompts_do_not_write_state() {
        let (states, coupons, ledger, chat) = deps();
        let handler = handler(states.clone(), coupons, ledger, chat.clone());
        let user = UserId::new(1);

        handler.on_text(user, "hello").await.unwrap();
        assert!(states.stored(user).is_none());
        assert_eq!(chat.sent_to(user), vec![Prompt::StartRequired]);
    }

    #[tokio::test]
    async fn coupon_entry_resolves_against_the_store() {
        let (states, coupons, ledger, chat) = deps();
        coupons.seed(CouponRecord::new("SALE20", 20, 0, None).unwrap());
        let handler = handler(states.clone(), coupons, ledger, chat.clone());
        let user = UserId::new(1);

        let mut reg = Registration::started(None);
        reg.course = Some(Course::Expert);
        reg.stage = Some(Stage::AwaitingCoupon);
        states.put(user, &reg).await.unwrap();

        handler.on_text(user, "sale20").await.unwrap();

        let stored = states.stored(user).unwrap();
        assert_eq!(stored.discount_percent, Some(20));
        assert_eq!(stored.coupon_code.as_deref(), Some("SALE20"));
        assert_eq!(stored.stage, Some(Stage::AwaitingPaymentChoice));
        assert_eq!(
            chat.sent_to(user),
            vec![
                Prompt::CouponApplied { percent: 20 },
                Prompt::PaymentMenu {
                    discount_percent: Some(20)
                }
            ]
        );
    }

    #[tokio::test]
    async fn unknown_coupon_rejects_without_advancing() {
        let (states, coupons, ledger, chat) = deps();
        let handler = handler(states.clone(), coupons, ledger, chat.clone());
        let user = UserId::new(1);

        let mut reg = Registration::started(None);
        reg.course = Some(Course::Expert);
        reg.stage = Some(Stage::AwaitingCoupon);
        states.put(user, &reg).await.unwrap();

        handler.on_text(user, "NOPE").await.unwrap();

        assert_eq!(states.stored(user).unwrap().stage, Some(Stage::AwaitingCoupon));
        assert_eq!(chat.sent_to(user), vec![Prompt::CouponRejected]);
    }

    #[tokio::test]
    async fn completion_appends_to_ledger_and_notifies_every_admin() {
        let (states, coupons, ledger, chat) = deps();
        let handler = handler(states.clone(), coupons, ledger.clone(), chat.clone());
        let user = UserId::new(1);

        let mut reg = Registration::started(None);
        reg.course = Some(Course::Expert);
        reg.payment_method = Some(PaymentMethod::Paypal);
        reg.stage = Some(Stage::AwaitingReceipt);
        states.put(user, &reg).await.unwrap();

        handler
            .on_receipt(
                user,
                ReceiptUpload {
                    file_id: "f1".to_string(),
                    is_photo: true,
                },
            )
            .await
            .unwrap();

        let stored = states.stored(user).unwrap();
        assert_eq!(stored.stage, Some(Stage::Completed));
        assert!(stored.ledger_row.is_some());
        assert_eq!(ledger.appended().len(), 1);

        for admin in [UserId::new(900), UserId::new(901)] {
            let notices = chat.notices_to(admin);
            assert_eq!(notices.len(), 1);
            assert!(matches!(
                notices[0],
                AdminNotice::RegistrationSubmitted { user: u, .. } if u == user
            ));
        }
    }

    #[tokio::test]
    async fn ledger_failure_warns_admins_but_still_submits() {
        let (states, coupons, _, chat) = deps();
        let ledger = Arc::new(MockLedger::failing());
        let handler = handler(states.clone(), coupons, ledger, chat.clone());
        let user = UserId::new(1);

        let mut reg = Registration::started(None);
        reg.course = Some(Course::Expert);
        reg.payment_method = Some(PaymentMethod::Paypal);
        reg.stage = Some(Stage::AwaitingReceipt);
        states.put(user, &reg).await.unwrap();

        handler
            .on_receipt(
                user,
                ReceiptUpload {
                    file_id: "f1".to_string(),
                    is_photo: false,
                },
            )
            .await
            .unwrap();

        assert!(states.stored(user).unwrap().ledger_row.is_none());
        let notices = chat.notices_to(UserId::new(900));
        assert_eq!(notices.len(), 2);
        assert!(matches!(notices[0], AdminNotice::Warning(_)));
        assert!(matches!(notices[1], AdminNotice::RegistrationSubmitted { .. }));
    }

    #[tokio::test]
    async fn corrupt_state_row_starts_a_fresh_dialogue() {
        let (_, coupons, ledger, chat) = deps();
        let states = Arc::new(MockStateStore::failing_reads());
        let handler = handler(states.clone(), coupons, ledger, chat.clone());
        let user = UserId::new(1);

        // The load error is swallowed; the user just sees the fallback.
        handler.on_text(user, "hello").await.unwrap();
        assert_eq!(chat.sent_to(user), vec![Prompt::StartRequired]);
    }
}
