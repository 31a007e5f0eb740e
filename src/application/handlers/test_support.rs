//! Shared mock ports for handler tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::coupon::CouponRecord;
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::registration::{
    AdminNotice, Course, FunnelEngine, MethodPricing, PaymentMethod, PricingTable, Prompt,
    Registration,
};
use crate::ports::{
    AccessGranter, ChatClient, CouponStore, DecisionStatus, LedgerRow, RegistrationLedger,
    StateStore,
};

pub fn engine_with_pricing() -> FunnelEngine {
    let mut methods = HashMap::new();
    methods.insert(
        PaymentMethod::Paypal,
        MethodPricing {
            currency: "USD".to_string(),
            amounts: HashMap::from([
                (Course::Expert, 200),
                (Course::Private, 400),
                (Course::Kids, 90),
                (Course::Highschool, 120),
            ]),
        },
    );
    FunnelEngine::new(PricingTable { methods })
}

struct StateRow {
    registration: Registration,
    last_updated: Timestamp,
    reminder_sent: bool,
}

#[derive(Default)]
pub struct MockStateStore {
    rows: Mutex<HashMap<UserId, StateRow>>,
    fail_reads: bool,
}

impl MockStateStore {
    pub fn failing_reads() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            fail_reads: true,
        }
    }

    pub fn stored(&self, user: UserId) -> Option<Registration> {
        self.rows
            .lock()
            .unwrap()
            .get(&user)
            .map(|row| row.registration.clone())
    }

    pub fn reminder_sent(&self, user: UserId) -> bool {
        self.rows
            .lock()
            .unwrap()
            .get(&user)
            .is_some_and(|row| row.reminder_sent)
    }

    /// Backdate a row so it falls behind an abandonment cutoff.
    pub fn age(&self, user: UserId, hours: i64) {
        if let Some(row) = self.rows.lock().unwrap().get_mut(&user) {
            row.last_updated = row.last_updated.minus_hours(hours);
        }
    }
}

#[async_trait]
impl StateStore for MockStateStore {
    async fn get(&self, user: UserId) -> Result<Option<Registration>, DomainError> {
        if self.fail_reads {
            return Err(DomainError::database("mock read failure"));
        }
        Ok(self.stored(user))
    }

    async fn put(&self, user: UserId, registration: &Registration) -> Result<(), DomainError> {
        self.rows.lock().unwrap().insert(
            user,
            StateRow {
                registration: registration.clone(),
                last_updated: Timestamp::now(),
                reminder_sent: false,
            },
        );
        Ok(())
    }

    async fn delete(&self, user: UserId) -> Result<(), DomainError> {
        self.rows.lock().unwrap().remove(&user);
        Ok(())
    }

    async fn list_abandoned(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<(UserId, Registration)>, DomainError> {
        let rows = self.rows.lock().unwrap();
        let mut out: Vec<(UserId, Registration)> = rows
            .iter()
            .filter(|(_, row)| {
                !row.reminder_sent
                    && row.last_updated.is_before(&cutoff)
                    && row.registration.is_in_progress()
            })
            .map(|(user, row)| (*user, row.registration.clone()))
            .collect();
        out.sort_by_key(|(user, _)| *user);
        Ok(out)
    }

    async fn mark_reminder_sent(&self, user: UserId) -> Result<(), DomainError> {
        if let Some(row) = self.rows.lock().unwrap().get_mut(&user) {
            row.reminder_sent = true;
        }
        Ok(())
    }

    async fn list_incomplete(&self) -> Result<Vec<UserId>, DomainError> {
        let rows = self.rows.lock().unwrap();
        let mut users: Vec<UserId> = rows
            .iter()
            .filter(|(_, row)| row.registration.is_in_progress())
            .map(|(user, _)| *user)
            .collect();
        users.sort();
        Ok(users)
    }

    async fn list_all(&self) -> Result<Vec<(UserId, Registration)>, DomainError> {
        let rows = self.rows.lock().unwrap();
        let mut out: Vec<(UserId, Registration)> = rows
            .iter()
            .map(|(user, row)| (*user, row.registration.clone()))
            .collect();
        out.sort_by_key(|(user, _)| *user);
        Ok(out)
    }
}

#[derive(Default)]
pub struct MockCouponStore {
    coupons: Mutex<HashMap<String, CouponRecord>>,
}

impl MockCouponStore {
    pub fn seed(&self, coupon: CouponRecord) {
        self.coupons
            .lock()
            .unwrap()
            .insert(coupon.code.clone(), coupon);
    }

    pub fn usage_count(&self, code: &str) -> Option<u32> {
        self.coupons
            .lock()
            .unwrap()
            .get(&CouponRecord::normalize_code(code))
            .map(|c| c.usage_count)
    }
}

#[async_trait]
impl CouponStore for MockCouponStore {
    async fn upsert(&self, coupon: &CouponRecord) -> Result<(), DomainError> {
        self.seed(coupon.clone());
        Ok(())
    }

    async fn find(&self, code: &str) -> Result<Option<CouponRecord>, DomainError> {
        Ok(self
            .coupons
            .lock()
            .unwrap()
            .get(&CouponRecord::normalize_code(code))
            .cloned())
    }

    async fn redeem(&self, code: &str) -> Result<(), DomainError> {
        if let Some(coupon) = self
            .coupons
            .lock()
            .unwrap()
            .get_mut(&CouponRecord::normalize_code(code))
        {
            coupon.usage_count += 1;
        }
        Ok(())
    }

    async fn delete(&self, code: &str) -> Result<bool, DomainError> {
        Ok(self
            .coupons
            .lock()
            .unwrap()
            .remove(&CouponRecord::normalize_code(code))
            .is_some())
    }

    async fn list(&self) -> Result<Vec<CouponRecord>, DomainError> {
        let mut coupons: Vec<CouponRecord> =
            self.coupons.lock().unwrap().values().cloned().collect();
        coupons.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(coupons)
    }
}

#[derive(Default)]
pub struct MockLedger {
    rows: Mutex<Vec<(UserId, Registration)>>,
    statuses: Mutex<Vec<(i64, DecisionStatus)>>,
    next_row: AtomicI64,
    failing: bool,
}

impl MockLedger {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn appended(&self) -> Vec<(UserId, Registration)> {
        self.rows.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<(i64, DecisionStatus)> {
        self.statuses.lock().unwrap().clone()
    }
}

#[async_trait]
impl RegistrationLedger for MockLedger {
    async fn append(
        &self,
        user: UserId,
        registration: &Registration,
    ) -> Result<LedgerRow, DomainError> {
        if self.failing {
            return Err(DomainError::new(
                ErrorCode::LedgerError,
                "mock ledger failure",
            ));
        }
        self.rows.lock().unwrap().push((user, registration.clone()));
        Ok(LedgerRow(self.next_row.fetch_add(1, Ordering::SeqCst) + 1))
    }

    async fn update_status(
        &self,
        row: LedgerRow,
        status: DecisionStatus,
    ) -> Result<(), DomainError> {
        if self.failing {
            return Err(DomainError::new(
                ErrorCode::LedgerError,
                "mock ledger failure",
            ));
        }
        self.statuses.lock().unwrap().push((row.0, status));
        Ok(())
    }
}

#[derive(Default)]
pub struct MockChatClient {
    sent: Mutex<Vec<(UserId, Prompt)>>,
    notices: Mutex<Vec<(UserId, AdminNotice)>>,
    failing_users: Mutex<Vec<UserId>>,
}

impl MockChatClient {
    pub fn fail_for(&self, user: UserId) {
        self.failing_users.lock().unwrap().push(user);
    }

    pub fn sent_to(&self, user: UserId) -> Vec<Prompt> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _)| *u == user)
            .map(|(_, p)| p.clone())
            .collect()
    }

    pub fn notices_to(&self, admin: UserId) -> Vec<AdminNotice> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _)| *u == admin)
            .map(|(_, n)| n.clone())
            .collect()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn send(&self, user: UserId, prompt: Prompt) -> Result<(), DomainError> {
        if self.failing_users.lock().unwrap().contains(&user) {
            return Err(DomainError::new(ErrorCode::ChatError, "mock send failure"));
        }
        self.sent.lock().unwrap().push((user, prompt));
        Ok(())
    }

    async fn notify_admin(&self, admin: UserId, notice: AdminNotice) -> Result<(), DomainError> {
        if self.failing_users.lock().unwrap().contains(&admin) {
            return Err(DomainError::new(ErrorCode::ChatError, "mock send failure"));
        }
        self.notices.lock().unwrap().push((admin, notice));
        Ok(())
    }
}

#[derive(Default)]
pub struct MockAccessGranter {
    grants: Mutex<Vec<(Course, String)>>,
    failing: bool,
}

impl MockAccessGranter {
    pub fn failing() -> Self {
        Self {
            grants: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    pub fn grants(&self) -> Vec<(Course, String)> {
        self.grants.lock().unwrap().clone()
    }
}

#[async_trait]
impl AccessGranter for MockAccessGranter {
    async fn grant(&self, course: Course, email: &str) -> bool {
        if self.failing {
            return false;
        }
        self.grants.lock().unwrap().push((course, email.to_string()));
        true
    }
}
