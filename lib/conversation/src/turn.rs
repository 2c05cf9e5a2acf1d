//! Turn types for captured conversations.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// The role of a turn within a captured conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// User/human message.
    User,
    /// Assistant/model message.
    Assistant,
    /// System message.
    System,
    /// Tool result message.
    Tool,
}

/// The content of a turn.
///
/// Scripted turns carry the captured text and are re-sent verbatim during
/// replay. A live turn has no stored content; the model under test produces
/// it fresh at replay time. Only assistant turns may be live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnContent {
    /// Captured content, replayed byte-for-byte.
    Scripted {
        /// The recorded text.
        text: String,
    },
    /// Content produced fresh by the model during replay.
    Live,
}

impl TurnContent {
    /// Creates scripted content.
    #[must_use]
    pub fn scripted(text: impl Into<String>) -> Self {
        Self::Scripted { text: text.into() }
    }

    /// Returns true if this content is produced live during replay.
    #[must_use]
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }

    /// Returns the scripted text, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Scripted { text } => Some(text),
            Self::Live => None,
        }
    }
}

/// A tool call emitted by an assistant turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier for this tool call, unique within the conversation.
    pub id: String,
    /// The tool name.
    pub name: String,
    /// Arguments for the tool.
    pub arguments: JsonValue,
}

impl ToolCall {
    /// Creates a new tool call.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: JsonValue) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// The recorded result of a tool call, carried by a tool-role turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResultPayload {
    /// The tool call this result answers.
    pub tool_call_id: String,
    /// The result value.
    pub result: JsonValue,
    /// Error message if the tool failed.
    pub error: Option<String>,
}

impl ToolResultPayload {
    /// Creates a successful tool result.
    #[must_use]
    pub fn success(tool_call_id: impl Into<String>, result: JsonValue) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            result,
            error: None,
        }
    }

    /// Creates a failed tool result.
    #[must_use]
    pub fn failure(tool_call_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            result: JsonValue::Null,
            error: Some(error.into()),
        }
    }
}

/// A single turn in a captured conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Position in the conversation, 0-based and strictly increasing.
    pub index: u32,
    /// Turn role.
    pub role: TurnRole,
    /// Turn content.
    pub content: TurnContent,
    /// Tool calls emitted by this turn (assistant turns only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Recorded tool result (tool turns only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_result: Option<ToolResultPayload>,
}

impl ConversationTurn {
    /// Creates a new scripted turn.
    #[must_use]
    pub fn new(index: u32, role: TurnRole, text: impl Into<String>) -> Self {
        Self {
            index,
            role,
            content: TurnContent::scripted(text),
            tool_calls: Vec::new(),
            tool_result: None,
        }
    }

    /// Creates a user turn.
    #[must_use]
    pub fn user(index: u32, text: impl Into<String>) -> Self {
        Self::new(index, TurnRole::User, text)
    }

    /// Creates a system turn.
    #[must_use]
    pub fn system(index: u32, text: impl Into<String>) -> Self {
        Self::new(index, TurnRole::System, text)
    }

    /// Creates a scripted assistant turn.
    #[must_use]
    pub fn assistant(index: u32, text: impl Into<String>) -> Self {
        Self::new(index, TurnRole::Assistant, text)
    }

    /// Creates a live assistant turn.
    #[must_use]
    pub fn live_assistant(index: u32) -> Self {
        Self {
            index,
            role: TurnRole::Assistant,
            content: TurnContent::Live,
            tool_calls: Vec::new(),
            tool_result: None,
        }
    }

    /// Creates a tool-result turn.
    #[must_use]
    pub fn tool(index: u32, result: ToolResultPayload) -> Self {
        Self {
            index,
            role: TurnRole::Tool,
            content: TurnContent::scripted(""),
            tool_calls: Vec::new(),
            tool_result: Some(result),
        }
    }

    /// Adds a tool call.
    #[must_use]
    pub fn with_tool_call(mut self, tool_call: ToolCall) -> Self {
        self.tool_calls.push(tool_call);
        self
    }

    /// Returns true if this turn emits tool calls.
    #[must_use]
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Returns true if this turn's content is produced live during replay.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.content.is_live()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_creation() {
        let turn = ConversationTurn::user(0, "What is your role?");
        assert_eq!(turn.index, 0);
        assert_eq!(turn.role, TurnRole::User);
        assert_eq!(turn.content.text(), Some("What is your role?"));
    }

    #[test]
    fn live_turn_has_no_text() {
        let turn = ConversationTurn::live_assistant(3);
        assert!(turn.is_live());
        assert_eq!(turn.content.text(), None);
    }

    #[test]
    fn turn_with_tool_calls() {
        let call = ToolCall::new("call_0", "search_documents", serde_json::json!({"query": "salary"}));
        let turn = ConversationTurn::assistant(1, "Let me look that up.").with_tool_call(call);

        assert!(turn.has_tool_calls());
        assert_eq!(turn.tool_calls.len(), 1);
        assert_eq!(turn.tool_calls[0].name, "search_documents");
    }

    #[test]
    fn tool_result_failure() {
        let result = ToolResultPayload::failure("call_0", "execution failed");
        assert_eq!(result.result, serde_json::Value::Null);
        assert_eq!(result.error, Some("execution failed".to_string()));
    }

    #[test]
    fn turn_serde_roundtrip() {
        let turn = ConversationTurn::assistant(2, "Checking the directory.")
            .with_tool_call(ToolCall::new("call_1", "get_employee_info", serde_json::json!({})));

        let json = serde_json::to_string(&turn).expect("serialize");
        let parsed: ConversationTurn = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(turn, parsed);
    }

    #[test]
    fn live_content_serde_shape() {
        let json = serde_json::to_value(TurnContent::Live).expect("serialize");
        assert_eq!(json, serde_json::json!({"kind": "live"}));

        let scripted = serde_json::to_value(TurnContent::scripted("hi")).expect("serialize");
        assert_eq!(scripted, serde_json::json!({"kind": "scripted", "text": "hi"}));
    }
}
