//! Menneskesyn - reflection quiz on view of human nature and self-leadership.
//!
//! The user places themself on four bipolar dimensions; after each answer
//! and at the end, a text-generation service writes short feedback in
//! Norwegian.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
