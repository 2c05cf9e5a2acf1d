//! Captured-conversation loading and replay for the parley harness.
//!
//! This crate provides:
//!
//! - **Turns**: Role-attributed messages with scripted or live content
//! - **Conversation**: Validated, immutable snapshot of a captured exchange
//! - **Store**: Total, side-effect-free loading (native turn lists and
//!   harmony-tagged findings captures) plus round-trip saving
//! - **Replayer**: Deterministic turn-by-turn replay against a chat client

pub mod conversation;
pub mod error;
pub mod harmony;
pub mod replay;
pub mod store;
pub mod turn;

pub use conversation::Conversation;
pub use error::{ChatClientError, MalformedConversation, ReplayError, StoreError};
pub use replay::{ChatClient, LiveCompletion, ReplayOutcome, ReplayState, Replayer};
pub use turn::{ConversationTurn, ToolCall, ToolResultPayload, TurnContent, TurnRole};
