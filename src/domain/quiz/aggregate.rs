//! QuizSession aggregate - the control core of the quiz.
//!
//! The aggregate is pure and synchronous. Operations that need the
//! generation service move the session into a loading phase and hand back a
//! request describing the call; the driver performs the call and reports the
//! outcome with the matching `complete_*` or `fail_*` method.
//!
//! # Invariants
//!
//! - `current_index` stays within the catalog
//! - the answer log holds at most one answer per dimension
//! - every failed operation leaves the session unchanged
//! - a loading phase is only entered from a non-loading phase, so at most
//!   one generation request is outstanding

use crate::domain::catalog::{Dimension, DimensionCatalog};
use crate::domain::foundation::{LikertValue, SessionId, StateMachine};

use super::{
    Answer, AnswerLog, AnswerView, Progress, QuizError, QuizPhase, SessionSnapshot,
};

/// Work order for one per-dimension feedback call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRequest {
    pub dimension_index: usize,
    pub dimension: Dimension,
    pub value: LikertValue,
}

/// Work order for the final summary call, answers in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    pub answers: Vec<(Dimension, LikertValue)>,
}

/// Outcome of advancing past a feedback screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Moved on to the next dimension's input.
    NextDimension { index: usize },
    /// Reached the end; the summary must be generated.
    SummaryRequested(SummaryRequest),
}

/// One user's run through the quiz.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: SessionId,
    catalog: DimensionCatalog,
    phase: QuizPhase,
    current_index: usize,
    answers: AnswerLog,
    current_feedback: String,
    final_summary: String,
    last_error: Option<String>,
}

impl QuizSession {
    /// Creates a session waiting for a credential.
    pub fn new(catalog: DimensionCatalog) -> Self {
        Self {
            id: SessionId::new(),
            catalog,
            phase: QuizPhase::KeyEntry,
            current_index: 0,
            answers: AnswerLog::new(),
            current_feedback: String::new(),
            final_summary: String::new(),
            last_error: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn catalog(&self) -> &DimensionCatalog {
        &self.catalog
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The dimension being answered, while inside the dimension loop.
    pub fn current_dimension(&self) -> Option<&Dimension> {
        if self.phase.in_dimension_loop() {
            self.catalog.get(self.current_index)
        } else {
            None
        }
    }

    pub fn answers(&self) -> &AnswerLog {
        &self.answers
    }

    pub fn current_feedback(&self) -> &str {
        &self.current_feedback
    }

    pub fn final_summary(&self) -> &str {
        &self.final_summary
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Progress through the dimension loop, counting the current dimension
    /// as done once its value has been submitted.
    pub fn progress(&self) -> Option<Progress> {
        if !self.phase.in_dimension_loop() {
            return None;
        }
        let done = usize::from(self.phase != QuizPhase::DimensionInput);
        Some(Progress {
            step: self.current_index + done,
            total: self.catalog.len(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// The generation client was initialized with the submitted credential.
    pub fn accept_credential(&mut self) -> Result<(), QuizError> {
        self.phase = self.advance_to(QuizPhase::Intro, "submit_key")?;
        self.last_error = None;
        Ok(())
    }

    /// The submitted credential could not initialize the client.
    pub fn reject_credential(&mut self, message: impl Into<String>) -> Result<(), QuizError> {
        self.require(QuizPhase::KeyEntry, "submit_key")?;
        self.last_error = Some(message.into());
        Ok(())
    }

    /// Leaves the intro screen and shows the first dimension.
    pub fn start(&mut self) -> Result<(), QuizError> {
        self.phase = self.advance_to(QuizPhase::DimensionInput, "start")?;
        self.current_index = 0;
        Ok(())
    }

    /// Records the answer for the current dimension and enters
    /// `FeedbackLoading`.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` outside `DimensionInput`
    /// - `InvalidValue` when `raw` is outside 1..=5
    pub fn select_value(&mut self, raw: u8) -> Result<FeedbackRequest, QuizError> {
        let next = self.advance_to(QuizPhase::FeedbackLoading, "select_value")?;
        let value = LikertValue::try_from_u8(raw)?;
        let dimension = self
            .catalog
            .get(self.current_index)
            .cloned()
            .ok_or_else(|| QuizError::invalid_transition(self.phase, "select_value"))?;

        self.answers.record(
            self.current_index,
            Answer::new(dimension.id().clone(), value),
        );
        self.phase = next;

        Ok(FeedbackRequest {
            dimension_index: self.current_index,
            dimension,
            value,
        })
    }

    /// Stores generated feedback and shows it.
    pub fn complete_feedback(&mut self, feedback: impl Into<String>) -> Result<(), QuizError> {
        self.phase = self.advance_to(QuizPhase::FeedbackDisplay, "complete_feedback")?;
        self.current_feedback = feedback.into();
        Ok(())
    }

    /// Feedback generation failed: back to input for the same dimension.
    ///
    /// The recorded answer is kept; answering again replaces it.
    pub fn fail_feedback(&mut self, message: impl Into<String>) -> Result<(), QuizError> {
        self.phase = self.advance_to(QuizPhase::DimensionInput, "fail_feedback")?;
        self.last_error = Some(message.into());
        Ok(())
    }

    /// Moves past the feedback screen.
    pub fn next(&mut self) -> Result<Advance, QuizError> {
        self.require(QuizPhase::FeedbackDisplay, "next")?;

        if self.current_index < self.catalog.last_index() {
            self.phase = self.advance_to(QuizPhase::DimensionInput, "next")?;
            self.current_index += 1;
            self.current_feedback.clear();
            return Ok(Advance::NextDimension {
                index: self.current_index,
            });
        }

        self.phase = self.advance_to(QuizPhase::SummaryLoading, "next")?;
        Ok(Advance::SummaryRequested(self.summary_request()))
    }

    /// Stores the generated summary and shows it.
    pub fn complete_summary(&mut self, summary: impl Into<String>) -> Result<(), QuizError> {
        self.phase = self.advance_to(QuizPhase::SummaryDisplay, "complete_summary")?;
        self.final_summary = summary.into();
        Ok(())
    }

    /// Summary generation failed: enter `SummaryError`, from which
    /// `retry_summary` is possible.
    pub fn fail_summary(&mut self, message: impl Into<String>) -> Result<(), QuizError> {
        self.phase = self.advance_to(QuizPhase::SummaryError, "fail_summary")?;
        self.last_error = Some(message.into());
        Ok(())
    }

    /// Requests the summary again after a failure.
    pub fn retry_summary(&mut self) -> Result<SummaryRequest, QuizError> {
        self.phase = self.advance_to(QuizPhase::SummaryLoading, "retry_summary")?;
        self.last_error = None;
        Ok(self.summary_request())
    }

    /// Clears all progress. Valid from any phase.
    ///
    /// Lands in `Intro` when an externally supplied credential is still
    /// available, otherwise in `KeyEntry`.
    pub fn restart(&mut self, external_credential_available: bool) {
        self.answers.clear();
        self.current_index = 0;
        self.current_feedback.clear();
        self.final_summary.clear();
        self.last_error = None;
        self.phase = if external_credential_available {
            QuizPhase::Intro
        } else {
            QuizPhase::KeyEntry
        };
    }

    /// Clears the error message without changing phase.
    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    /// Read model for the presentation layer.
    pub fn snapshot(&self) -> SessionSnapshot {
        let answers = self
            .answers
            .indexed()
            .filter_map(|(index, answer)| {
                self.catalog.get(index).map(|dimension| AnswerView {
                    dimension_id: answer.dimension_id.clone(),
                    title: dimension.title().to_string(),
                    value: answer.value,
                })
            })
            .collect();

        SessionSnapshot {
            session_id: self.id,
            phase: self.phase,
            dimension_index: self.current_index,
            total_dimensions: self.catalog.len(),
            progress: self.progress(),
            current_dimension: self.current_dimension().cloned(),
            answers,
            current_feedback: self.current_feedback.clone(),
            final_summary: self.final_summary.clone(),
            last_error: self.last_error.clone(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn require(&self, expected: QuizPhase, action: &'static str) -> Result<(), QuizError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(QuizError::invalid_transition(self.phase, action))
        }
    }

    fn advance_to(&self, target: QuizPhase, action: &'static str) -> Result<QuizPhase, QuizError> {
        self.phase
            .transition_to(target)
            .map_err(|_| QuizError::invalid_transition(self.phase, action))
    }

    fn summary_request(&self) -> SummaryRequest {
        let answers = self
            .answers
            .indexed()
            .filter_map(|(index, answer)| {
                self.catalog
                    .get(index)
                    .map(|dimension| (dimension.clone(), answer.value))
            })
            .collect();
        SummaryRequest { answers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quiz::FEEDBACK_FAILED_MESSAGE;
    use proptest::prelude::*;

    fn session() -> QuizSession {
        QuizSession::new(DimensionCatalog::builtin().unwrap())
    }

    fn at_dimension_input() -> QuizSession {
        let mut s = session();
        s.accept_credential().unwrap();
        s.start().unwrap();
        s
    }

    fn answer_and_show(s: &mut QuizSession, value: u8) {
        s.select_value(value).unwrap();
        s.complete_feedback(format!("feedback {}", value)).unwrap();
    }

    mod key_entry {
        use super::*;

        #[test]
        fn new_session_waits_for_key() {
            let s = session();
            assert_eq!(s.phase(), QuizPhase::KeyEntry);
            assert!(s.answers().is_empty());
            assert!(s.last_error().is_none());
        }

        #[test]
        fn accepted_credential_moves_to_intro() {
            let mut s = session();
            s.reject_credential("bad").unwrap();
            s.accept_credential().unwrap();
            assert_eq!(s.phase(), QuizPhase::Intro);
            assert!(s.last_error().is_none());
        }

        #[test]
        fn rejected_credential_stays_with_error() {
            let mut s = session();
            s.reject_credential("Kunne ikke starte").unwrap();
            assert_eq!(s.phase(), QuizPhase::KeyEntry);
            assert_eq!(s.last_error(), Some("Kunne ikke starte"));
        }

        #[test]
        fn credential_outside_key_entry_is_rejected() {
            let mut s = at_dimension_input();
            assert!(s.accept_credential().is_err());
            assert!(s.reject_credential("x").is_err());
            assert_eq!(s.phase(), QuizPhase::DimensionInput);
        }
    }

    mod dimension_loop {
        use super::*;

        #[test]
        fn start_shows_first_dimension() {
            let s = at_dimension_input();
            assert_eq!(s.phase(), QuizPhase::DimensionInput);
            assert_eq!(s.current_index(), 0);
            assert_eq!(s.current_dimension().unwrap().id().as_str(), "actor_pawn");
        }

        #[test]
        fn start_outside_intro_is_rejected() {
            let mut s = session();
            assert_eq!(
                s.start(),
                Err(QuizError::invalid_transition(QuizPhase::KeyEntry, "start"))
            );
        }

        #[test]
        fn select_value_records_answer_and_enters_loading() {
            let mut s = at_dimension_input();

            let request = s.select_value(3).unwrap();

            assert_eq!(s.phase(), QuizPhase::FeedbackLoading);
            assert_eq!(request.dimension_index, 0);
            assert_eq!(request.dimension.id().as_str(), "actor_pawn");
            assert_eq!(request.value.value(), 3);
            let answers: Vec<&Answer> = s.answers().ordered().collect();
            assert_eq!(answers.len(), 1);
            assert_eq!(answers[0].dimension_id.as_str(), "actor_pawn");
            assert_eq!(s.current_index(), s.answers().len() - 1);
        }

        #[test]
        fn out_of_range_value_mutates_nothing() {
            let mut s = at_dimension_input();
            for raw in [0u8, 6, 255] {
                assert!(matches!(s.select_value(raw), Err(QuizError::InvalidValue(_))));
            }
            assert_eq!(s.phase(), QuizPhase::DimensionInput);
            assert!(s.answers().is_empty());
        }

        #[test]
        fn second_selection_while_loading_is_rejected() {
            let mut s = at_dimension_input();
            s.select_value(2).unwrap();
            assert!(matches!(
                s.select_value(4),
                Err(QuizError::InvalidTransition { .. })
            ));
            assert_eq!(s.answers().len(), 1);
        }

        #[test]
        fn complete_feedback_shows_text() {
            let mut s = at_dimension_input();
            answer_and_show(&mut s, 3);
            assert_eq!(s.phase(), QuizPhase::FeedbackDisplay);
            assert_eq!(s.current_feedback(), "feedback 3");
        }

        #[test]
        fn failed_feedback_keeps_answer_and_returns_to_input() {
            let mut s = at_dimension_input();
            answer_and_show(&mut s, 3);
            s.next().unwrap();
            s.select_value(2).unwrap();

            s.fail_feedback(FEEDBACK_FAILED_MESSAGE).unwrap();

            assert_eq!(s.phase(), QuizPhase::DimensionInput);
            assert_eq!(s.current_index(), 1);
            assert_eq!(s.last_error(), Some(FEEDBACK_FAILED_MESSAGE));
            assert_eq!(s.answers().len(), 2);
        }

        #[test]
        fn retrying_after_failure_replaces_answer() {
            let mut s = at_dimension_input();
            s.select_value(2).unwrap();
            s.fail_feedback("err").unwrap();

            s.select_value(5).unwrap();

            let answers: Vec<&Answer> = s.answers().ordered().collect();
            assert_eq!(answers.len(), 1);
            assert_eq!(answers[0].value.value(), 5);
        }

        #[test]
        fn next_advances_and_clears_feedback() {
            let mut s = at_dimension_input();
            answer_and_show(&mut s, 1);

            let advance = s.next().unwrap();

            assert_eq!(advance, Advance::NextDimension { index: 1 });
            assert_eq!(s.phase(), QuizPhase::DimensionInput);
            assert_eq!(s.current_feedback(), "");
            assert_eq!(s.current_index(), s.answers().len());
        }

        #[test]
        fn progress_counts_submitted_dimension() {
            let mut s = at_dimension_input();
            assert_eq!(s.progress(), Some(Progress { step: 0, total: 4 }));
            s.select_value(3).unwrap();
            assert_eq!(s.progress(), Some(Progress { step: 1, total: 4 }));
            s.complete_feedback("ok").unwrap();
            assert_eq!(s.progress(), Some(Progress { step: 1, total: 4 }));
        }
    }

    mod summary {
        use super::*;

        fn at_last_feedback() -> QuizSession {
            let mut s = at_dimension_input();
            for value in [1, 2, 3] {
                answer_and_show(&mut s, value);
                s.next().unwrap();
            }
            answer_and_show(&mut s, 5);
            s
        }

        #[test]
        fn next_on_last_dimension_requests_summary() {
            let mut s = at_last_feedback();

            let advance = s.next().unwrap();

            assert_eq!(s.phase(), QuizPhase::SummaryLoading);
            match advance {
                Advance::SummaryRequested(request) => {
                    let values: Vec<u8> =
                        request.answers.iter().map(|(_, v)| v.value()).collect();
                    assert_eq!(values, vec![1, 2, 3, 5]);
                    assert_eq!(request.answers[3].0.id().as_str(), "optimism_pessimism");
                }
                other => panic!("expected summary request, got {:?}", other),
            }
        }

        #[test]
        fn completed_summary_is_shown() {
            let mut s = at_last_feedback();
            s.next().unwrap();
            s.complete_summary("Oppsummering").unwrap();

            assert_eq!(s.phase(), QuizPhase::SummaryDisplay);
            assert_eq!(s.final_summary(), "Oppsummering");
            assert_eq!(s.answers().len(), 4);
            assert!(s.progress().is_none());
        }

        #[test]
        fn failed_summary_can_be_retried() {
            let mut s = at_last_feedback();
            s.next().unwrap();
            s.fail_summary("Kunne ikke generere sluttrapporten.").unwrap();
            assert_eq!(s.phase(), QuizPhase::SummaryError);
            assert!(s.last_error().is_some());

            let request = s.retry_summary().unwrap();

            assert_eq!(s.phase(), QuizPhase::SummaryLoading);
            assert_eq!(request.answers.len(), 4);
            assert!(s.last_error().is_none());
        }

        #[test]
        fn retry_is_only_allowed_after_failure() {
            let mut s = at_last_feedback();
            s.next().unwrap();
            assert!(s.retry_summary().is_err());
            assert_eq!(s.phase(), QuizPhase::SummaryLoading);
        }
    }

    mod reset {
        use super::*;

        #[test]
        fn restart_with_external_key_returns_to_intro() {
            let mut s = at_dimension_input();
            answer_and_show(&mut s, 4);

            s.restart(true);

            assert_eq!(s.phase(), QuizPhase::Intro);
            assert!(s.answers().is_empty());
            assert_eq!(s.current_index(), 0);
            assert_eq!(s.current_feedback(), "");
            assert_eq!(s.final_summary(), "");
        }

        #[test]
        fn restart_without_external_key_returns_to_key_entry() {
            let mut s = at_dimension_input();
            s.restart(false);
            assert_eq!(s.phase(), QuizPhase::KeyEntry);
        }

        #[test]
        fn dismiss_error_is_idempotent() {
            let mut s = session();
            s.reject_credential("bad").unwrap();

            s.dismiss_error();
            let after_first = s.snapshot();
            s.dismiss_error();

            assert_eq!(s.snapshot(), after_first);
            assert_eq!(s.phase(), QuizPhase::KeyEntry);
        }
    }

    #[derive(Debug, Clone)]
    enum Op {
        Select(u8),
        Succeed,
        Fail,
        Next,
        Restart(bool),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..8).prop_map(Op::Select),
            Just(Op::Succeed),
            Just(Op::Fail),
            Just(Op::Next),
            any::<bool>().prop_map(Op::Restart),
        ]
    }

    proptest! {
        #[test]
        fn answers_follow_catalog_order_under_any_operation_sequence(
            ops in proptest::collection::vec(op(), 0..64)
        ) {
            let mut s = at_dimension_input();
            for op in ops {
                let _ = match op {
                    Op::Select(v) => s.select_value(v).map(|_| ()),
                    Op::Succeed => s
                        .complete_feedback("ok")
                        .or_else(|_| s.complete_summary("sum")),
                    Op::Fail => s.fail_feedback("err").or_else(|_| s.fail_summary("err")),
                    Op::Next => s.next().map(|_| ()),
                    Op::Restart(external) => {
                        s.restart(external);
                        let _ = s.accept_credential();
                        s.start()
                    }
                };

                prop_assert!(s.answers().len() <= s.catalog().len());
                prop_assert!(s.current_index() <= s.catalog().last_index());
                for (i, answer) in s.answers().ordered().enumerate() {
                    prop_assert_eq!(
                        &answer.dimension_id,
                        s.catalog().get(i).unwrap().id()
                    );
                }
            }
        }
    }
}
