//! Application handlers - use cases wired over the ports.

mod approval;
mod broadcast;
mod conversation;
mod coupons;
mod reminders;
mod stats;

#[cfg(test)]
pub(crate) mod test_support;

pub use approval::{ApprovalHandler, DecisionOutcome};
pub use broadcast::{BroadcastHandler, BroadcastReport};
pub use conversation::ConversationHandler;
pub use coupons::CouponAdminHandler;
pub use reminders::ReminderHandler;
pub use stats::{FunnelStats, StatsHandler};
