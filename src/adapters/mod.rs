//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Generation service providers (Gemini, mock)

pub mod ai;

pub use ai::{GeminiConnector, MockAIProvider, MockConnector};
