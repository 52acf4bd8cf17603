//! Quiz-specific error types.

use thiserror::Error;

use super::QuizPhase;
use crate::domain::foundation::{ErrorCode, ValidationError};

/// User-facing message when the credential cannot start the service.
pub const KEY_REJECTED_MESSAGE: &str = "Kunne ikke starte tjenesten med den angitte nøkkelen.";

/// User-facing message when per-dimension feedback fails.
pub const FEEDBACK_FAILED_MESSAGE: &str = "Noe gikk galt med KI-tjenesten. Prøv igjen.";

/// User-facing message when the final summary fails.
pub const SUMMARY_FAILED_MESSAGE: &str = "Kunne ikke generere sluttrapporten.";

/// Errors returned by session operations. A failed operation leaves the
/// session untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("'{action}' is not allowed in phase {phase}")]
    InvalidTransition {
        phase: QuizPhase,
        action: &'static str,
    },

    #[error("Invalid answer: {0}")]
    InvalidValue(#[from] ValidationError),
}

impl QuizError {
    pub fn invalid_transition(phase: QuizPhase, action: &'static str) -> Self {
        QuizError::InvalidTransition { phase, action }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            QuizError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            QuizError::InvalidValue(ValidationError::OutOfRange { .. }) => ErrorCode::OutOfRange,
            QuizError::InvalidValue(_) => ErrorCode::ValidationFailed,
        }
    }
}
