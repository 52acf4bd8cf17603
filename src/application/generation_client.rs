//! GenerationClient - explicit handle to the text-generation service.
//!
//! Built once per credential through a `ProviderConnector` and owned by the
//! controller. Each call carries its own timeout and cancellation token.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::catalog::Dimension;
use crate::domain::foundation::{ErrorCode, LikertValue, SessionId};
use crate::domain::prompts::{dimension_feedback_prompt, final_summary_prompt, SYSTEM_INSTRUCTION};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, MessageRole, ProviderConnector, ProviderInfo,
    RequestMetadata, RequestPurpose,
};

/// Tunables applied to every generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    /// Upper bound on one call, retries included.
    pub timeout: Duration,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_tokens: None,
            temperature: None,
        }
    }
}

/// The credential could not initialize a client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthInitError {
    #[error("credential is empty")]
    EmptyCredential,

    #[error("credential rejected: {0}")]
    Rejected(#[source] AIError),
}

impl AuthInitError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::AuthInitFailed
    }
}

/// A generation call failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("generation service error: {0}")]
    Provider(#[from] AIError),

    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("generation cancelled")]
    Cancelled,

    #[error("no generation client has been initialized")]
    NotInitialized,
}

impl GenerationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            GenerationError::Provider(AIError::Timeout { .. }) | GenerationError::Timeout(_) => {
                ErrorCode::Timeout
            }
            GenerationError::Provider(_) => ErrorCode::AIProviderError,
            GenerationError::Cancelled => ErrorCode::Cancelled,
            GenerationError::NotInitialized => ErrorCode::ClientNotInitialized,
        }
    }
}

/// Handle to an initialized generation provider.
#[derive(Clone)]
pub struct GenerationClient {
    provider: Arc<dyn AIProvider>,
    settings: GenerationSettings,
}

impl std::fmt::Debug for GenerationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationClient")
            .field("provider", &self.provider.provider_info())
            .field("settings", &self.settings)
            .finish()
    }
}

impl GenerationClient {
    /// Wraps an already connected provider.
    pub fn new(provider: Arc<dyn AIProvider>, settings: GenerationSettings) -> Self {
        Self { provider, settings }
    }

    /// Connects a fresh provider for `credential`.
    ///
    /// Nothing from a previous client is reused; the caller replaces its
    /// handle with the returned one.
    pub fn initialize(
        connector: &dyn ProviderConnector,
        credential: &SecretString,
        settings: GenerationSettings,
    ) -> Result<Self, AuthInitError> {
        if credential.expose_secret().trim().is_empty() {
            return Err(AuthInitError::EmptyCredential);
        }

        let provider = connector
            .connect(credential)
            .map_err(AuthInitError::Rejected)?;

        let info = provider.provider_info();
        tracing::info!(provider = %info.name, model = %info.model, "Generation client initialized");

        Ok(Self::new(provider, settings))
    }

    pub fn provider_info(&self) -> ProviderInfo {
        self.provider.provider_info()
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Short feedback on one self-placement.
    pub async fn generate_dimension_feedback(
        &self,
        session_id: SessionId,
        dimension: &Dimension,
        value: LikertValue,
        cancel: &CancellationToken,
    ) -> Result<String, GenerationError> {
        let prompt = dimension_feedback_prompt(dimension, value);
        tracing::debug!(
            session_id = %session_id,
            dimension = %dimension.id(),
            value = value.value(),
            "Requesting dimension feedback"
        );
        self.generate(session_id, RequestPurpose::DimensionFeedback, prompt, cancel)
            .await
    }

    /// Synthesis across every answer, given in catalog order.
    pub async fn generate_final_summary(
        &self,
        session_id: SessionId,
        answers: &[(Dimension, LikertValue)],
        cancel: &CancellationToken,
    ) -> Result<String, GenerationError> {
        let pairs: Vec<(&Dimension, LikertValue)> = answers.iter().map(|(d, v)| (d, *v)).collect();
        let prompt = final_summary_prompt(&pairs);
        tracing::debug!(
            session_id = %session_id,
            answers = answers.len(),
            "Requesting final summary"
        );
        self.generate(session_id, RequestPurpose::FinalSummary, prompt, cancel)
            .await
    }

    async fn generate(
        &self,
        session_id: SessionId,
        purpose: RequestPurpose,
        prompt: String,
        cancel: &CancellationToken,
    ) -> Result<String, GenerationError> {
        let trace_id = Uuid::new_v4().to_string();
        let mut request = CompletionRequest::new(RequestMetadata::new(session_id, purpose, &trace_id))
            .with_message(MessageRole::User, prompt)
            .with_system_prompt(SYSTEM_INSTRUCTION);
        if let Some(max_tokens) = self.settings.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        if let Some(temperature) = self.settings.temperature {
            request = request.with_temperature(temperature);
        }

        let timeout = self.settings.timeout;
        let call = tokio::time::timeout(timeout, self.provider.complete(request));

        let result = tokio::select! {
            _ = cancel.cancelled() => Err(GenerationError::Cancelled),
            outcome = call => match outcome {
                Err(_) => Err(GenerationError::Timeout(timeout)),
                Ok(Err(err)) => Err(GenerationError::Provider(err)),
                Ok(Ok(response)) if response.content.trim().is_empty() => {
                    Err(GenerationError::Provider(AIError::EmptyResponse))
                }
                Ok(Ok(response)) => {
                    tracing::debug!(
                        trace_id = %trace_id,
                        model = %response.model,
                        total_tokens = response.usage.total_tokens,
                        "Generation completed"
                    );
                    Ok(response.content)
                }
            },
        };

        if let Err(err) = &result {
            tracing::warn!(
                session_id = %session_id,
                trace_id = %trace_id,
                purpose = ?purpose,
                code = %err.code(),
                error = %err,
                "Generation failed"
            );
        }

        result
    }
}
