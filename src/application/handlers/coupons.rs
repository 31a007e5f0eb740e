//! CouponAdminHandler - admin CRUD over the coupon table.

use std::sync::Arc;

use tracing::info;

use crate::domain::coupon::CouponRecord;
use crate::domain::foundation::DomainError;
use crate::domain::registration::Course;
use crate::ports::CouponStore;

/// Handler for the admin coupon commands.
pub struct CouponAdminHandler {
    coupons: Arc<dyn CouponStore>,
}

impl CouponAdminHandler {
    pub fn new(coupons: Arc<dyn CouponStore>) -> Self {
        Self { coupons }
    }

    /// Create or replace a coupon. Validation errors surface to the
    /// admin as-is.
    pub async fn add(
        &self,
        code: &str,
        discount_percent: u8,
        usage_limit: u32,
        course: Option<Course>,
    ) -> Result<CouponRecord, DomainError> {
        let coupon = CouponRecord::new(code, discount_percent, usage_limit, course)?;
        self.coupons.upsert(&coupon).await?;
        info!(code = %coupon.code, percent = coupon.discount_percent, "coupon added");
        Ok(coupon)
    }

    /// A gift coupon: full discount, single use.
    pub async fn add_gift(
        &self,
        code: &str,
        course: Option<Course>,
    ) -> Result<CouponRecord, DomainError> {
        self.add(code, 100, 1, course).await
    }

    pub async fn delete(&self, code: &str) -> Result<bool, DomainError> {
        let existed = self.coupons.delete(code).await?;
        if existed {
            info!(code = %CouponRecord::normalize_code(code), "coupon deleted");
        }
        Ok(existed)
    }

    pub async fn list(&self) -> Result<Vec<CouponRecord>, DomainError> {
        self.coupons.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::MockCouponStore;
    use crate::domain::foundation::ErrorCode;

    fn handler() -> (Arc<MockCouponStore>, CouponAdminHandler) {
        let store = Arc::new(MockCouponStore::default());
        (store.clone(), CouponAdminHandler::new(store))
    }

    #[tokio::test]
    async fn add_normalizes_and_stores() {
        let (store, handler) = handler();
        let coupon = handler
            .add(" sale20 ", 20, 5, Some(Course::Expert))
            .await
            .unwrap();
        assert_eq!(coupon.code, "SALE20");
        assert_eq!(store.usage_count("SALE20"), Some(0));
    }

    #[tokio::test]
    async fn invalid_percent_is_a_validation_error() {
        let (_, handler) = handler();
        let err = handler.add("BAD", 150, 0, None).await.unwrap_err();
        assert!(err.is(ErrorCode::ValidationFailed));
    }

    #[tokio::test]
    async fn gift_coupons_are_full_discount_single_use() {
        let (_, handler) = handler();
        let coupon = handler.add_gift("WELCOME", None).await.unwrap();
        assert_eq!(coupon.discount_percent, 100);
        assert_eq!(coupon.usage_limit, 1);
    }

    #[tokio::test]
    async fn delete_reports_existence() {
        let (_, handler) = handler();
        handler.add("GONE", 10, 0, None).await.unwrap();
        assert!(handler.delete("gone").await.unwrap());
        assert!(!handler.delete("gone").await.unwrap());
    }

    #[tokio::test]
    async fn list_returns_everything() {
        let (_, handler) = handler();
        handler.add("A", 10, 0, None).await.unwrap();
        handler.add("B", 20, 0, None).await.unwrap();
        assert_eq!(handler.list().await.unwrap().len(), 2);
    }
}
