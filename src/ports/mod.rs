//! Ports - interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.

mod access_granter;
mod bot_process;
mod chat;
mod coupon_store;
mod ledger;
mod lock_store;
mod state_store;

pub use access_granter::AccessGranter;
pub use bot_process::BotProcess;
pub use chat::ChatClient;
pub use coupon_store::CouponStore;
pub use ledger::{DecisionStatus, LedgerRow, RegistrationLedger};
pub use lock_store::LockStore;
pub use state_store::StateStore;
