//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - text-generation service
//! - `ProviderConnector` - credential-to-provider initialization

mod ai_provider;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderConnector, ProviderInfo, RequestMetadata, RequestPurpose, TokenUsage,
};
