//! Discount coupons.

pub mod coupon;

pub use coupon::CouponRecord;
