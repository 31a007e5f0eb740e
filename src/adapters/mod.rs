//! Adapters - concrete implementations of the ports.

pub mod process;
pub mod sqlite;
