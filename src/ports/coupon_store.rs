//! Coupon storage port.

use async_trait::async_trait;

use crate::domain::coupon::CouponRecord;
use crate::domain::foundation::DomainError;

/// Port for the coupon table.
///
/// Lookup and redemption are separate calls: a coupon is looked up when
/// the user enters it and redeemed only once an admin approves the
/// registration. Between the two, a concurrently approved registration
/// can exhaust the code; the discount already promised to the user is
/// honored anyway, so `redeem` never fails on an exhausted code.
#[async_trait]
pub trait CouponStore: Send + Sync {
    /// Insert a coupon or replace the one with the same code.
    async fn upsert(&self, coupon: &CouponRecord) -> Result<(), DomainError>;

    /// Look up a coupon by code. Callers normalize the code first.
    async fn find(&self, code: &str) -> Result<Option<CouponRecord>, DomainError>;

    /// Increment the usage counter. A no-op for unknown codes.
    async fn redeem(&self, code: &str) -> Result<(), DomainError>;

    /// Delete a coupon; returns whether it existed.
    async fn delete(&self, code: &str) -> Result<bool, DomainError>;

    /// Every stored coupon, for the admin listing.
    async fn list(&self) -> Result<Vec<CouponRecord>, DomainError>;
}
