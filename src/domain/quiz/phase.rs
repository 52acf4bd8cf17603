//! Quiz phases and their transition rules.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// The current screen of the quiz.
///
/// Forward flow:
/// `KeyEntry → Intro → {DimensionInput → FeedbackLoading → FeedbackDisplay}*
///  → SummaryLoading → SummaryDisplay`
///
/// `FeedbackLoading` falls back to `DimensionInput` when generation fails.
/// `SummaryLoading` moves to `SummaryError` on failure, from which the summary
/// can be requested again. Restart is a reset that is valid from any phase
/// and is not part of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuizPhase {
    #[default]
    KeyEntry,
    Intro,
    DimensionInput,
    FeedbackLoading,
    FeedbackDisplay,
    SummaryLoading,
    SummaryDisplay,
    SummaryError,
}

impl QuizPhase {
    /// True while a generation call is outstanding.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::FeedbackLoading | Self::SummaryLoading)
    }

    /// True inside the per-dimension input/feedback loop.
    pub fn in_dimension_loop(&self) -> bool {
        matches!(
            self,
            Self::DimensionInput | Self::FeedbackLoading | Self::FeedbackDisplay
        )
    }

    /// Short status text shown while waiting on the generation service.
    pub fn loading_message(&self) -> Option<&'static str> {
        match self {
            Self::FeedbackLoading => Some("Analyserer ditt valg..."),
            Self::SummaryLoading => Some("Genererer din profil..."),
            _ => None,
        }
    }
}

impl StateMachine for QuizPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use QuizPhase::*;
        match self {
            KeyEntry => vec![Intro],
            Intro => vec![DimensionInput],
            DimensionInput => vec![FeedbackLoading],
            FeedbackLoading => vec![FeedbackDisplay, DimensionInput],
            FeedbackDisplay => vec![DimensionInput, SummaryLoading],
            SummaryLoading => vec![SummaryDisplay, SummaryError],
            SummaryError => vec![SummaryLoading],
            SummaryDisplay => vec![],
        }
    }
}

impl fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QuizPhase::KeyEntry => "key_entry",
            QuizPhase::Intro => "intro",
            QuizPhase::DimensionInput => "dimension_input",
            QuizPhase::FeedbackLoading => "feedback_loading",
            QuizPhase::FeedbackDisplay => "feedback_display",
            QuizPhase::SummaryLoading => "summary_loading",
            QuizPhase::SummaryDisplay => "summary_display",
            QuizPhase::SummaryError => "summary_error",
        };
        write!(f, "{}", s)
    }
}
