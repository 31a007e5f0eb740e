//! Application layer - use-case handlers and the election loop.

pub mod handlers;
pub mod leader;

pub use leader::{ElectorSettings, LeaderElector};
