//! enroll-funnel: conversation-driven course enrollment with
//! leader-elected bot supervision.
//!
//! The crate follows hexagonal architecture:
//!
//! - `domain` - pure business rules: the funnel stage machine, coupons,
//!   pricing, and the shared leader lock. No IO.
//! - `ports` - async traits the domain's use cases are written against.
//! - `adapters` - SQLite persistence and subprocess supervision.
//! - `application` - handlers that wire engine to ports, plus the
//!   leader-election loop.
//! - `config` - typed environment configuration.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
