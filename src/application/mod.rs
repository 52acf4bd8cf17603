//! Application layer - drives the quiz session and talks to the generation
//! service through the ports.
//!
//! - `GenerationClient` - explicit handle to an initialized provider
//! - `QuizController` - owns the session and publishes snapshots
//! - `bootstrap` - credentials supplied by the host environment

pub mod bootstrap;
mod controller;
mod generation_client;

pub use bootstrap::{credential_from_launch_url, first_credential};
pub use controller::{CancelHandle, QuizController};
pub use generation_client::{AuthInitError, GenerationClient, GenerationError, GenerationSettings};
