//! QuizController - drives a `QuizSession` against the generation service.
//!
//! The controller is the boundary between generation failures and the
//! session: every `GenerationError` is logged and turned into the session's
//! `last_error`, never returned. The only errors callers see are
//! `QuizError`s for actions the current phase does not allow.
//!
//! Each state change is published on a `watch` channel, so a presentation
//! layer subscribed from another task observes the loading phases while a
//! call is in flight.

use std::sync::{Arc, Mutex};

use secrecy::SecretString;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::domain::catalog::DimensionCatalog;
use crate::domain::quiz::{
    Advance, FeedbackRequest, QuizError, QuizPhase, QuizSession, SessionSnapshot,
    SummaryRequest, FEEDBACK_FAILED_MESSAGE, KEY_REJECTED_MESSAGE, SUMMARY_FAILED_MESSAGE,
};
use crate::ports::ProviderConnector;

use super::{GenerationClient, GenerationError, GenerationSettings};

/// Cancels whatever generation call is currently in flight.
///
/// Cloneable and usable from any task. After a cancel, later calls get a
/// fresh token and run normally.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    current: Arc<Mutex<CancellationToken>>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels the pending call, if any.
    pub fn cancel(&self) {
        let mut current = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        current.cancel();
        *current = CancellationToken::new();
    }

    fn token(&self) -> CancellationToken {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// Owns the session, the generation client and the snapshot channel.
pub struct QuizController {
    session: QuizSession,
    connector: Arc<dyn ProviderConnector>,
    settings: GenerationSettings,
    client: Option<GenerationClient>,
    external_credential: Option<SecretString>,
    cancel: CancelHandle,
    state_tx: watch::Sender<SessionSnapshot>,
}

impl QuizController {
    pub fn new(
        catalog: DimensionCatalog,
        connector: Arc<dyn ProviderConnector>,
        settings: GenerationSettings,
    ) -> Self {
        let session = QuizSession::new(catalog);
        let (state_tx, _) = watch::channel(session.snapshot());
        Self {
            session,
            connector,
            settings,
            client: None,
            external_credential: None,
            cancel: CancelHandle::new(),
            state_tx,
        }
    }

    /// Applies a credential supplied by the host environment (launch URL or
    /// configuration) at startup.
    ///
    /// On success the session skips key entry. A credential that fails to
    /// initialize is dropped silently and the session stays in `KeyEntry`.
    pub fn bootstrap(&mut self, external_credential: Option<SecretString>) -> SessionSnapshot {
        let Some(credential) = external_credential else {
            return self.snapshot();
        };
        if self.session.phase() != QuizPhase::KeyEntry {
            return self.snapshot();
        }

        match GenerationClient::initialize(
            self.connector.as_ref(),
            &credential,
            self.settings.clone(),
        ) {
            Ok(client) => {
                self.client = Some(client);
                self.external_credential = Some(credential);
                if let Err(err) = self.session.accept_credential() {
                    tracing::warn!(error = %err, "Bootstrap could not leave key entry");
                }
                tracing::info!(session_id = %self.session.id(), "Bootstrapped from external credential");
            }
            Err(err) => {
                tracing::warn!(
                    session_id = %self.session.id(),
                    code = %err.code(),
                    error = %err,
                    "External credential rejected, falling back to key entry"
                );
            }
        }

        self.publish();
        self.snapshot()
    }

    /// Initializes the generation client with a user-entered key.
    ///
    /// A rejected key keeps the session in `KeyEntry` with `last_error` set.
    pub fn submit_key(&mut self, key: SecretString) -> Result<(), QuizError> {
        if self.session.phase() != QuizPhase::KeyEntry {
            return Err(QuizError::invalid_transition(self.session.phase(), "submit_key"));
        }

        match GenerationClient::initialize(self.connector.as_ref(), &key, self.settings.clone()) {
            Ok(client) => {
                self.client = Some(client);
                self.session.accept_credential()?;
                tracing::info!(session_id = %self.session.id(), "Key accepted");
            }
            Err(err) => {
                self.client = None;
                self.session.reject_credential(KEY_REJECTED_MESSAGE)?;
                tracing::warn!(
                    session_id = %self.session.id(),
                    code = %err.code(),
                    error = %err,
                    "Key rejected"
                );
            }
        }

        self.publish();
        Ok(())
    }

    /// Leaves the intro screen.
    pub fn start(&mut self) -> Result<(), QuizError> {
        self.session.start()?;
        tracing::info!(session_id = %self.session.id(), "Quiz started");
        self.publish();
        Ok(())
    }

    /// Records an answer and fetches feedback for it.
    ///
    /// Returns once the session has left `FeedbackLoading`, either showing
    /// the feedback or back in `DimensionInput` with `last_error` set.
    pub async fn select_value(&mut self, raw: u8) -> Result<(), QuizError> {
        let request = self.session.select_value(raw)?;
        // Taken before publishing so a cancel reacting to the loading
        // snapshot hits this call.
        let cancel = self.cancel.token();
        tracing::info!(
            session_id = %self.session.id(),
            dimension = %request.dimension.id(),
            value = request.value.value(),
            "Answer recorded"
        );
        self.publish();

        let outcome = self.request_feedback(&request, &cancel).await;
        match outcome {
            Ok(feedback) => self.session.complete_feedback(feedback)?,
            Err(_) => self.session.fail_feedback(FEEDBACK_FAILED_MESSAGE)?,
        }

        self.publish();
        Ok(())
    }

    /// Moves past the feedback screen; after the last dimension this
    /// generates the summary.
    pub async fn next(&mut self) -> Result<(), QuizError> {
        match self.session.next()? {
            Advance::NextDimension { index } => {
                tracing::debug!(session_id = %self.session.id(), index, "Next dimension");
                self.publish();
            }
            Advance::SummaryRequested(request) => {
                let cancel = self.cancel.token();
                self.publish();
                self.run_summary(request, &cancel).await?;
            }
        }
        Ok(())
    }

    /// Issues the summary call again after a failure.
    pub async fn retry_summary(&mut self) -> Result<(), QuizError> {
        let request = self.session.retry_summary()?;
        let cancel = self.cancel.token();
        tracing::info!(session_id = %self.session.id(), "Retrying summary");
        self.publish();
        self.run_summary(request, &cancel).await
    }

    /// Clears all progress. Safe from any phase.
    ///
    /// Keeps the generation client only when an external credential exists;
    /// otherwise the user enters a key again.
    pub fn restart(&mut self) {
        self.cancel.cancel();
        let keep_client = self.external_credential.is_some() && self.client.is_some();
        if !keep_client {
            self.client = None;
        }
        self.session.restart(keep_client);
        tracing::info!(
            session_id = %self.session.id(),
            phase = %self.session.phase(),
            "Quiz restarted"
        );
        self.publish();
    }

    /// Clears the error message without changing phase.
    pub fn dismiss_error(&mut self) {
        self.session.dismiss_error();
        self.publish();
    }

    /// Cancels the generation call in flight, if any.
    pub fn cancel_pending(&self) {
        self.cancel.cancel();
    }

    /// Handle for cancelling from another task while a call is awaited.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// Receiver that sees every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state_tx.subscribe()
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    async fn request_feedback(
        &self,
        request: &FeedbackRequest,
        cancel: &CancellationToken,
    ) -> Result<String, GenerationError> {
        let client = self.client.as_ref().ok_or(GenerationError::NotInitialized)?;
        client
            .generate_dimension_feedback(
                *self.session.id(),
                &request.dimension,
                request.value,
                cancel,
            )
            .await
    }

    async fn run_summary(
        &mut self,
        request: SummaryRequest,
        cancel: &CancellationToken,
    ) -> Result<(), QuizError> {
        let result = match self.client.as_ref() {
            Some(client) => {
                client
                    .generate_final_summary(*self.session.id(), &request.answers, cancel)
                    .await
            }
            None => Err(GenerationError::NotInitialized),
        };

        match result {
            Ok(summary) => {
                self.session.complete_summary(summary)?;
                tracing::info!(session_id = %self.session.id(), "Summary generated");
            }
            Err(_) => self.session.fail_summary(SUMMARY_FAILED_MESSAGE)?,
        }

        self.publish();
        Ok(())
    }

    fn publish(&self) {
        let snapshot = self.session.snapshot();
        self.state_tx.send_if_modified(|current| {
            if *current == snapshot {
                return false;
            }
            *current = snapshot;
            true
        });
    }
}
