use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;
use crate::domain::registration::Course;

/// A discount code with an optional usage cap and course scope.
///
/// Codes are stored uppercase; [`CouponRecord::normalize_code`] is the
/// single place that normalization happens, so lookups and user entry
/// agree regardless of how the code was typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponRecord {
    pub code: String,
    pub discount_percent: u8,
    pub usage_count: u32,
    /// Zero means unlimited.
    pub usage_limit: u32,
    /// `None` applies to every course.
    pub course: Option<Course>,
}

impl CouponRecord {
    pub fn new(
        code: &str,
        discount_percent: u8,
        usage_limit: u32,
        course: Option<Course>,
    ) -> Result<Self, ValidationError> {
        let code = Self::normalize_code(code);
        if code.is_empty() {
            return Err(ValidationError::empty_field("code"));
        }
        if discount_percent == 0 || discount_percent > 100 {
            return Err(ValidationError::out_of_range(
                "discount_percent",
                1,
                100,
                i32::from(discount_percent),
            ));
        }
        Ok(Self {
            code,
            discount_percent,
            usage_count: 0,
            usage_limit,
            course,
        })
    }

    /// Canonical form of a code: trimmed and uppercased.
    pub fn normalize_code(raw: &str) -> String {
        raw.trim().to_uppercase()
    }

    pub fn is_exhausted(&self) -> bool {
        self.usage_limit > 0 && self.usage_count >= self.usage_limit
    }

    /// A coupon with no course scope matches everything, and a user who
    /// has not picked a course yet is not turned away on scope alone.
    pub fn applies_to(&self, course: Option<Course>) -> bool {
        match (self.course, course) {
            (Some(scope), Some(selected)) => scope == selected,
            _ => true,
        }
    }

    /// The discount this coupon grants for the given course, if it is
    /// still usable and in scope.
    pub fn discount_for(&self, course: Option<Course>) -> Option<u8> {
        if self.is_exhausted() || !self.applies_to(course) {
            return None;
        }
        Some(self.discount_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_normalized_on_creation() {
        let coupon = CouponRecord::new("  sale20 ", 20, 0, None).unwrap();
        assert_eq!(coupon.code, "SALE20");
        assert_eq!(coupon.usage_count, 0);
    }

    #[test]
    fn percent_must_be_between_one_and_hundred() {
        assert!(CouponRecord::new("A", 0, 0, None).is_err());
        assert!(CouponRecord::new("A", 101, 0, None).is_err());
        assert!(CouponRecord::new("A", 100, 0, None).is_ok());
        assert!(CouponRecord::new("A", 1, 0, None).is_ok());
    }

    #[test]
    fn blank_code_is_rejected() {
        assert!(CouponRecord::new("   ", 10, 0, None).is_err());
    }

    #[test]
    fn zero_limit_means_unlimited() {
        let mut coupon = CouponRecord::new("GIFT", 100, 0, None).unwrap();
        coupon.usage_count = 10_000;
        assert!(!coupon.is_exhausted());
        assert_eq!(coupon.discount_for(None), Some(100));
    }

    #[test]
    fn limit_is_enforced_once_reached() {
        let mut coupon = CouponRecord::new("ONCE", 50, 2, None).unwrap();
        coupon.usage_count = 1;
        assert!(!coupon.is_exhausted());
        coupon.usage_count = 2;
        assert!(coupon.is_exhausted());
        assert_eq!(coupon.discount_for(None), None);
    }

    #[test]
    fn scope_matching() {
        let scoped = CouponRecord::new("KIDS10", 10, 0, Some(Course::Kids)).unwrap();
        assert!(scoped.applies_to(Some(Course::Kids)));
        assert!(!scoped.applies_to(Some(Course::Expert)));
        assert!(scoped.applies_to(None));

        let open = CouponRecord::new("ALL10", 10, 0, None).unwrap();
        assert!(open.applies_to(Some(Course::Expert)));
    }
}
