//! Chat client for the parley harness.
//!
//! Implements the replay engine's `ChatClient` seam over an
//! OpenAI-compatible HTTP endpoint, for driving a locally hosted model.

pub mod client;

pub use client::{ChatEndpointConfig, HttpChatClient};
