//! Quiz module - the session state machine and its answer log.
//!
//! - `QuizPhase` - screens and transition rules
//! - `AnswerLog` - one answer per dimension, catalog-ordered view
//! - `QuizSession` - aggregate driving the user through the quiz
//! - `SessionSnapshot` - read model for the presentation layer

mod aggregate;
mod answers;
mod errors;
mod phase;
mod snapshot;

pub use aggregate::{Advance, FeedbackRequest, QuizSession, SummaryRequest};
pub use answers::{Answer, AnswerLog};
pub use errors::{
    QuizError, FEEDBACK_FAILED_MESSAGE, KEY_REJECTED_MESSAGE, SUMMARY_FAILED_MESSAGE,
};
pub use phase::QuizPhase;
pub use snapshot::{AnswerView, Progress, SessionSnapshot};
