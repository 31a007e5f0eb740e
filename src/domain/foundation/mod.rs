//! Foundation module - Shared domain primitives.
//!
//! Contains the identifiers, timestamp value object, error types, and the
//! state machine trait that form the vocabulary of the enrollment domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::UserId;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
