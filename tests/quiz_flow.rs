//! End-to-end quiz flows through `QuizController` against a scripted
//! generation service.

use std::sync::Arc;

use secrecy::SecretString;

use menneskesyn::adapters::ai::{MockAIProvider, MockConnector, MockError, MockResponse};
use menneskesyn::application::{GenerationSettings, QuizController};
use menneskesyn::domain::catalog::DimensionCatalog;
use menneskesyn::domain::foundation::LikertValue;
use menneskesyn::domain::quiz::{
    QuizError, QuizPhase, FEEDBACK_FAILED_MESSAGE, SUMMARY_FAILED_MESSAGE,
};
use menneskesyn::ports::{FinishReason, RequestPurpose};

// =============================================================================
// Helpers
// =============================================================================

fn key(s: &str) -> SecretString {
    SecretString::new(s.to_string())
}

fn catalog() -> DimensionCatalog {
    DimensionCatalog::builtin().unwrap()
}

fn controller_with(provider: MockAIProvider) -> QuizController {
    QuizController::new(
        catalog(),
        Arc::new(MockConnector::new(provider)),
        GenerationSettings::default(),
    )
}

fn unavailable() -> MockError {
    MockError::Unavailable {
        message: "overloaded".to_string(),
    }
}

async fn started(provider: MockAIProvider) -> QuizController {
    let mut controller = controller_with(provider);
    controller.submit_key(key("valid-key")).unwrap();
    controller.start().unwrap();
    controller
}

/// Answers every dimension with `value`, stopping on the last feedback screen.
async fn answer_all(controller: &mut QuizController, value: u8) {
    let last = catalog().len() - 1;
    for index in 0..=last {
        controller.select_value(value).await.unwrap();
        assert_eq!(controller.snapshot().phase, QuizPhase::FeedbackDisplay);
        if index < last {
            controller.next().await.unwrap();
        }
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn valid_key_then_start_shows_first_dimension() {
    let mut controller = controller_with(MockAIProvider::new());

    controller.submit_key(key("valid-key")).unwrap();
    assert_eq!(controller.snapshot().phase, QuizPhase::Intro);

    controller.start().unwrap();
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, QuizPhase::DimensionInput);
    assert_eq!(snapshot.dimension_index, 0);
    assert_eq!(
        snapshot.current_dimension.as_ref().map(|d| d.id().as_str()),
        Some("actor_pawn")
    );
}

#[tokio::test]
async fn successful_feedback_records_answer() {
    let mut controller = started(MockAIProvider::new().with_response("Du tar initiativ.")).await;

    controller.select_value(3).await.unwrap();

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, QuizPhase::FeedbackDisplay);
    assert_eq!(snapshot.current_feedback, "Du tar initiativ.");
    assert_eq!(snapshot.answers.len(), 1);
    assert_eq!(snapshot.answers[0].dimension_id, *catalog().get(0).unwrap().id());
    assert_eq!(snapshot.answers[0].value, LikertValue::try_from_u8(3).unwrap());
}

#[tokio::test]
async fn full_run_ends_in_summary() {
    let provider = MockAIProvider::new();
    let mut controller = started(provider.clone()).await;

    answer_all(&mut controller, 5).await;
    provider.push_response(MockResponse::Success {
        content: "Du har et aktørpreget menneskesyn.".to_string(),
        usage: Default::default(),
        finish_reason: FinishReason::Stop,
    });
    controller.next().await.unwrap();

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, QuizPhase::SummaryDisplay);
    assert_eq!(snapshot.final_summary, "Du har et aktørpreget menneskesyn.");
    assert_eq!(snapshot.answers.len(), 4);

    let calls = provider.get_calls();
    assert_eq!(calls.len(), 5);
    assert_eq!(calls[4].metadata.purpose, RequestPurpose::FinalSummary);
    assert!(calls[..4]
        .iter()
        .all(|c| c.metadata.purpose == RequestPurpose::DimensionFeedback));
}

#[tokio::test]
async fn failed_feedback_reverts_and_keeps_answer() {
    let provider = MockAIProvider::new()
        .with_response("Første tilbakemelding")
        .with_error(unavailable());
    let mut controller = started(provider).await;
    controller.select_value(2).await.unwrap();
    controller.next().await.unwrap();

    controller.select_value(4).await.unwrap();

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, QuizPhase::DimensionInput);
    assert_eq!(snapshot.dimension_index, 1);
    assert_eq!(snapshot.last_error.as_deref(), Some(FEEDBACK_FAILED_MESSAGE));
    assert_eq!(snapshot.answers.len(), 2);
    assert_eq!(snapshot.answers[1].value, LikertValue::try_from_u8(4).unwrap());
}

#[tokio::test]
async fn answering_again_after_failure_replaces_the_answer() {
    let provider = MockAIProvider::new()
        .with_error(unavailable())
        .with_response("Andre forsøk");
    let mut controller = started(provider).await;

    controller.select_value(1).await.unwrap();
    controller.select_value(5).await.unwrap();

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, QuizPhase::FeedbackDisplay);
    assert_eq!(snapshot.answers.len(), 1);
    assert_eq!(snapshot.answers[0].value, LikertValue::try_from_u8(5).unwrap());
}

// =============================================================================
// Summary failure and retry
// =============================================================================

#[tokio::test]
async fn summary_failure_can_be_retried() {
    let provider = MockAIProvider::new();
    let mut controller = started(provider.clone()).await;
    answer_all(&mut controller, 3).await;

    provider.push_response(MockResponse::Error(MockError::EmptyResponse));
    controller.next().await.unwrap();

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, QuizPhase::SummaryError);
    assert_eq!(snapshot.last_error.as_deref(), Some(SUMMARY_FAILED_MESSAGE));
    assert_eq!(snapshot.answers.len(), 4);

    controller.retry_summary().await.unwrap();

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, QuizPhase::SummaryDisplay);
    assert!(!snapshot.final_summary.is_empty());
    assert_eq!(snapshot.last_error, None);
}

#[tokio::test]
async fn retry_summary_is_rejected_outside_summary_error() {
    let mut controller = started(MockAIProvider::new()).await;

    let err = controller.retry_summary().await.unwrap_err();

    assert!(matches!(err, QuizError::InvalidTransition { .. }));
    assert_eq!(controller.snapshot().phase, QuizPhase::DimensionInput);
}

// =============================================================================
// Validation, restart and dismissal
// =============================================================================

#[tokio::test]
async fn out_of_range_value_is_rejected_without_side_effects() {
    let provider = MockAIProvider::new();
    let mut controller = started(provider.clone()).await;
    let before = controller.snapshot();

    for bad in [0u8, 6, 255] {
        let err = controller.select_value(bad).await.unwrap_err();
        assert!(matches!(err, QuizError::InvalidValue(_)));
    }

    assert_eq!(controller.snapshot(), before);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn restart_clears_progress_from_any_phase() {
    let mut controller = started(MockAIProvider::new()).await;
    answer_all(&mut controller, 4).await;
    controller.next().await.unwrap();
    assert_eq!(controller.snapshot().phase, QuizPhase::SummaryDisplay);

    controller.restart();

    let snapshot = controller.snapshot();
    assert!(snapshot.answers.is_empty());
    assert_eq!(snapshot.dimension_index, 0);
    assert_eq!(snapshot.current_feedback, "");
    assert_eq!(snapshot.final_summary, "");
    assert_eq!(snapshot.phase, QuizPhase::KeyEntry);
}

#[tokio::test]
async fn restart_with_launch_credential_goes_to_intro() {
    let mut controller = controller_with(MockAIProvider::new());
    controller.bootstrap(Some(key("from-launch-url")));
    controller.start().unwrap();
    controller.select_value(2).await.unwrap();

    controller.restart();

    assert_eq!(controller.snapshot().phase, QuizPhase::Intro);
    controller.start().unwrap();
    controller.select_value(3).await.unwrap();
    assert_eq!(controller.snapshot().phase, QuizPhase::FeedbackDisplay);
}

#[tokio::test]
async fn dismiss_error_twice_is_a_no_op() {
    let provider = MockAIProvider::new().with_error(unavailable());
    let mut controller = started(provider).await;
    controller.select_value(3).await.unwrap();
    assert!(controller.snapshot().last_error.is_some());

    controller.dismiss_error();
    let once = controller.snapshot();
    controller.dismiss_error();
    let twice = controller.snapshot();

    assert_eq!(once.last_error, None);
    assert_eq!(once, twice);
    assert_eq!(twice.phase, QuizPhase::DimensionInput);
}

#[tokio::test]
async fn rejected_key_then_valid_key() {
    let mut controller = QuizController::new(
        catalog(),
        Arc::new(MockConnector::new(MockAIProvider::new()).rejecting("wrong")),
        GenerationSettings::default(),
    );

    controller.submit_key(key("wrong")).unwrap();
    assert_eq!(controller.snapshot().phase, QuizPhase::KeyEntry);
    assert!(controller.snapshot().last_error.is_some());

    controller.submit_key(key("right")).unwrap();
    assert_eq!(controller.snapshot().phase, QuizPhase::Intro);
}
