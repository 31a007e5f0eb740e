//! Domain layer: pure business types and rules, free of IO.

pub mod cluster;
pub mod coupon;
pub mod foundation;
pub mod registration;
