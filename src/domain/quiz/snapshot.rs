//! Read model handed to the presentation layer.

use serde::{Deserialize, Serialize};

use super::QuizPhase;
use crate::domain::catalog::Dimension;
use crate::domain::foundation::{DimensionId, LikertValue, SessionId};

/// Position in the dimension loop, as shown by the progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub step: usize,
    pub total: usize,
}

impl Progress {
    /// Completion as a whole percentage.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.step.min(self.total) * 100) / self.total) as u8
    }
}

/// An answer joined with its dimension title, as listed on the summary
/// screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerView {
    pub dimension_id: DimensionId,
    pub title: String,
    pub value: LikertValue,
}

/// Everything the presentation layer consults: only phase and error state,
/// never raw errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub phase: QuizPhase,
    pub dimension_index: usize,
    pub total_dimensions: usize,
    pub progress: Option<Progress>,
    pub current_dimension: Option<Dimension>,
    pub answers: Vec<AnswerView>,
    pub current_feedback: String,
    pub final_summary: String,
    pub last_error: Option<String>,
}

impl SessionSnapshot {
    /// Header text such as "Del 2 av 4", hidden on the intro and summary
    /// screens.
    pub fn part_label(&self) -> Option<String> {
        match self.phase {
            QuizPhase::KeyEntry | QuizPhase::Intro | QuizPhase::SummaryDisplay => None,
            _ => Some(format!(
                "Del {} av {}",
                self.dimension_index + 1,
                self.total_dimensions
            )),
        }
    }
}
