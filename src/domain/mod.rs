//! Domain layer containing quiz logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `catalog` - The ordered table of quiz dimensions
//! - `quiz` - Session state machine, answer log and read model
//! - `prompts` - Prompt templates for the generation service

pub mod catalog;
pub mod foundation;
pub mod prompts;
pub mod quiz;
