//! ApprovalHandler - executes admin decisions on completed registrations.

use std::sync::Arc;

use tracing::{error, warn};

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::registration::{approval_sequence, AdminNotice, Decision, Prompt};
use crate::ports::{
    AccessGranter, ChatClient, CouponStore, DecisionStatus, LedgerRow, RegistrationLedger,
    StateStore,
};

/// What the decision amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    Approved,
    Rejected,
    /// No record for that user; it was already decided or wiped.
    NotFound,
}

/// Handler for admin approve/reject callbacks.
///
/// The decision itself must always land: coupon redemption, ledger
/// status and resource grants are side effects that degrade to admin
/// warnings when they fail. The record is deleted in every decided
/// case, which is also what makes a second click on the same button
/// come back as [`DecisionOutcome::NotFound`].
pub struct ApprovalHandler {
    states: Arc<dyn StateStore>,
    coupons: Arc<dyn CouponStore>,
    ledger: Arc<dyn RegistrationLedger>,
    granter: Arc<dyn AccessGranter>,
    chat: Arc<dyn ChatClient>,
    admin_ids: Vec<UserId>,
    support_contact: String,
}

impl ApprovalHandler {
    pub fn new(
        states: Arc<dyn StateStore>,
        coupons: Arc<dyn CouponStore>,
        ledger: Arc<dyn RegistrationLedger>,
        granter: Arc<dyn AccessGranter>,
        chat: Arc<dyn ChatClient>,
        admin_ids: Vec<UserId>,
        support_contact: String,
    ) -> Self {
        Self {
            states,
            coupons,
            ledger,
            granter,
            chat,
            admin_ids,
            support_contact,
        }
    }

    pub async fn decide(
        &self,
        decision: Decision,
        user: UserId,
    ) -> Result<DecisionOutcome, DomainError> {
        let Some(registration) = self.states.get(user).await? else {
            return Ok(DecisionOutcome::NotFound);
        };

        let outcome = match decision {
            Decision::Approve => {
                // 1. Burn the coupon now that the payment is accepted.
                if let Some(code) = &registration.coupon_code {
                    if let Err(e) = self.coupons.redeem(code).await {
                        warn!(%user, code, error = %e, "coupon redemption failed");
                    }
                }

                // 2. Onboarding sequence, in order.
                if let Some(course) = registration.course {
                    for prompt in approval_sequence(course) {
                        self.chat.send(user, prompt).await?;
                    }

                    // 3. Resource access for courses that carry it.
                    if course.grants_resource_access() {
                        match &registration.email {
                            Some(email) => {
                                if !self.granter.grant(course, email).await {
                                    self.warn_admins(format!(
                                        "Access grant failed for user {} ({}); share the {} resources manually",
                                        user, email, course
                                    ))
                                    .await;
                                }
                            }
                            None => {
                                self.warn_admins(format!(
                                    "User {} approved without an email on record; cannot grant {} access",
                                    user, course
                                ))
                                .await;
                            }
                        }
                    }
                } else {
                    self.warn_admins(format!(
                        "User {} approved but their record has no course",
                        user
                    ))
                    .await;
                }

                self.record_status(&registration.ledger_row, DecisionStatus::Approved, user)
                    .await;
                DecisionOutcome::Approved
            }
            Decision::Reject => {
                self.chat
                    .send(
                        user,
                        Prompt::Rejected {
                            support_contact: self.support_contact.clone(),
                        },
                    )
                    .await?;
                self.record_status(&registration.ledger_row, DecisionStatus::Rejected, user)
                    .await;
                DecisionOutcome::Rejected
            }
        };

        // 4. The funnel is over either way.
        self.states.delete(user).await?;
        Ok(outcome)
    }

    async fn record_status(&self, row: &Option<i64>, status: DecisionStatus, user: UserId) {
        let Some(row) = row else {
            return;
        };
        if let Err(e) = self.ledger.update_status(LedgerRow(*row), status).await {
            warn!(%user, row, error = %e, "ledger status update failed");
        }
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
