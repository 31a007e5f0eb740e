//! Subprocess supervision adapters.

mod command_bot;

pub use command_bot::CommandBotProcess;
