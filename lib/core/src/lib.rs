//! Core domain types and utilities for the parley harness.
//!
//! This crate provides the foundational ID types and error handling shared
//! by the tool-server bridge and the conversation replay engine.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{AuditEventId, ReplaySessionId, RequestId, SessionTokenId};
