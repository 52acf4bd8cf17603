//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, the state machine trait and error
//! types that form the vocabulary of the quiz domain.

mod errors;
mod ids;
mod likert;
mod state_machine;

pub use errors::{ErrorCode, ValidationError};
pub use ids::{DimensionId, SessionId};
pub use likert::LikertValue;
pub use state_machine::StateMachine;
