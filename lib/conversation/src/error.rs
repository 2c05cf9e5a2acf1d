//! Error types for the conversation crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `MalformedConversation`: Structural problems in a captured conversation
//! - `StoreError`: Errors while persisting a conversation
//! - `ChatClientError`: Failures reported by the chat client
//! - `ReplayError`: Failures that abort an in-progress replay

use std::fmt;

/// Structural problems found while loading a captured conversation.
///
/// All variants are fatal to the load attempt; a conversation is never
/// partially loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedConversation {
    /// The conversation file could not be read.
    Unreadable { path: String, reason: String },
    /// The document is not a recognized conversation format.
    InvalidFormat { reason: String },
    /// Turn indices are not contiguous and increasing from zero.
    NonContiguousIndex { expected: u32, found: u32 },
    /// A live turn appears on a non-assistant role.
    LiveTurnNotAssistant { index: u32 },
    /// A tool-role turn carries no tool result.
    ToolResultMissing { index: u32 },
    /// A tool-role turn references a tool call no earlier assistant turn emitted.
    DanglingToolReference { index: u32, tool_call_id: String },
    /// A tool call id is emitted more than once.
    DuplicateToolCallId { index: u32, tool_call_id: String },
}

impl fmt::Display for MalformedConversation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable { path, reason } => {
                write!(f, "cannot read conversation file '{path}': {reason}")
            }
            Self::InvalidFormat { reason } => {
                write!(f, "unrecognized conversation format: {reason}")
            }
            Self::NonContiguousIndex { expected, found } => {
                write!(
                    f,
                    "turn indices must be contiguous from zero: expected {expected}, found {found}"
                )
            }
            Self::LiveTurnNotAssistant { index } => {
                write!(f, "turn {index} is live but not an assistant turn")
            }
            Self::ToolResultMissing { index } => {
                write!(f, "tool turn {index} carries no tool result")
            }
            Self::DanglingToolReference {
                index,
                tool_call_id,
            } => {
                write!(
                    f,
                    "tool turn {index} references '{tool_call_id}' which no earlier assistant turn emitted"
                )
            }
            Self::DuplicateToolCallId {
                index,
                tool_call_id,
            } => {
                write!(f, "turn {index} re-emits tool call id '{tool_call_id}'")
            }
        }
    }
}

impl std::error::Error for MalformedConversation {}

/// Errors while persisting a conversation snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Serialization failed.
    SerializeFailed { reason: String },
    /// The target file could not be written.
    WriteFailed { path: String, reason: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SerializeFailed { reason } => {
                write!(f, "failed to serialize conversation: {reason}")
            }
            Self::WriteFailed { path, reason } => {
                write!(f, "failed to write conversation file '{path}': {reason}")
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Failures reported by a chat client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatClientError {
    /// The client could not reach its endpoint.
    ConnectionFailed { endpoint: String, reason: String },
    /// The endpoint rejected or failed the request.
    RequestFailed { reason: String },
    /// The response could not be interpreted.
    MalformedResponse { reason: String },
}

impl fmt::Display for ChatClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionFailed { endpoint, reason } => {
                write!(f, "failed to connect to '{endpoint}': {reason}")
            }
            Self::RequestFailed { reason } => {
                write!(f, "chat request failed: {reason}")
            }
            Self::MalformedResponse { reason } => {
                write!(f, "failed to parse chat response: {reason}")
            }
        }
    }
}

impl std::error::Error for ChatClientError {}

/// Failures that abort an in-progress replay.
///
/// Each variant carries the offending turn index so the operator can pinpoint
/// the exact point of divergence and resume manually. There is no automatic
/// retry path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// The chat client failed while handling a turn.
    ChatClient {
        index: u32,
        source: ChatClientError,
    },
}

impl ReplayError {
    /// Returns the index of the turn the replay aborted on.
    #[must_use]
    pub fn turn_index(&self) -> u32 {
        match self {
            Self::ChatClient { index, .. } => *index,
        }
    }
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChatClient { index, source } => {
                write!(f, "chat client failed at turn {index}: {source}")
            }
        }
    }
}

impl std::error::Error for ReplayError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_conversation_display() {
        let err = MalformedConversation::NonContiguousIndex {
            expected: 1,
            found: 2,
        };
        assert!(err.to_string().contains("expected 1"));
        assert!(err.to_string().contains("found 2"));
    }

    #[test]
    fn dangling_tool_reference_display() {
        let err = MalformedConversation::DanglingToolReference {
            index: 4,
            tool_call_id: "call_9".to_string(),
        };
        assert!(err.to_string().contains("call_9"));
        assert!(err.to_string().contains('4'));
    }

    #[test]
    fn replay_error_carries_turn_index() {
        let err = ReplayError::ChatClient {
            index: 7,
            source: ChatClientError::RequestFailed {
                reason: "connection reset".to_string(),
            },
        };
        assert_eq!(err.turn_index(), 7);
        assert!(err.to_string().contains("turn 7"));
        assert!(err.to_string().contains("connection reset"));
    }
}
