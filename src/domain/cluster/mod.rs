//! Leader-election primitives shared by the elector loop.

pub mod lock;

pub use lock::{format_heartbeat, LeaderLock};
