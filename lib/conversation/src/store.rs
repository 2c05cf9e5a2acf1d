//! Conversation persistence.
//!
//! Loading is total and side-effect-free: the persisted file is never
//! mutated and no chat client is contacted. Two document shapes are
//! accepted:
//!
//! - a native turn list (`{"turns": [...]}` or a bare turn array), which
//!   round-trips with [`save`]
//! - a findings capture carrying a `harmony_response_walkthroughs` array,
//!   whose first walkthrough is parsed via [`crate::harmony`]

use crate::conversation::Conversation;
use crate::error::{MalformedConversation, StoreError};
use crate::harmony;
use crate::turn::ConversationTurn;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;

/// Native on-disk document shape.
#[derive(Debug, Serialize, Deserialize)]
struct TurnDocument {
    turns: Vec<ConversationTurn>,
}

/// Findings capture shape; only the walkthrough list is consumed.
#[derive(Debug, Deserialize)]
struct FindingsDocument {
    harmony_response_walkthroughs: Vec<String>,
}

/// Loads a conversation from a persisted file.
///
/// # Errors
///
/// Returns `MalformedConversation` if the file cannot be read, is not a
/// recognized conversation document, or violates the structural invariants.
/// There are no partial loads.
pub fn load(path: impl AsRef<Path>) -> Result<Conversation, MalformedConversation> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| MalformedConversation::Unreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let value: JsonValue =
        serde_json::from_str(&raw).map_err(|e| MalformedConversation::InvalidFormat {
            reason: e.to_string(),
        })?;

    let turns = parse_document(value)?;
    Conversation::from_turns(turns)
}

fn parse_document(value: JsonValue) -> Result<Vec<ConversationTurn>, MalformedConversation> {
    if value
        .as_object()
        .is_some_and(|o| o.contains_key("harmony_response_walkthroughs"))
    {
        let findings: FindingsDocument =
            serde_json::from_value(value).map_err(|e| MalformedConversation::InvalidFormat {
                reason: e.to_string(),
            })?;
        let Some(walkthrough) = findings.harmony_response_walkthroughs.first() else {
            return Err(MalformedConversation::InvalidFormat {
                reason: "findings capture has no walkthroughs".to_string(),
            });
        };
        return harmony::parse_walkthrough(walkthrough);
    }

    if value.is_array() {
        return serde_json::from_value(value).map_err(|e| MalformedConversation::InvalidFormat {
            reason: e.to_string(),
        });
    }

    let document: TurnDocument =
        serde_json::from_value(value).map_err(|e| MalformedConversation::InvalidFormat {
            reason: e.to_string(),
        })?;
    Ok(document.turns)
}

/// Saves a conversation as a native turn list.
///
/// # Errors
///
/// Returns `StoreError` if serialization or the write fails.
pub fn save(conversation: &Conversation, path: impl AsRef<Path>) -> Result<(), StoreError> {
    let path = path.as_ref();
    let document = TurnDocument {
        turns: conversation.turns().to_vec(),
    };
    let json = serde_json::to_string_pretty(&document)
        .map_err(|e| StoreError::SerializeFailed {
            reason: e.to_string(),
        })?;
    fs::write(path, json).map_err(|e| StoreError::WriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turn::{ToolCall, ToolResultPayload};

    fn sample_conversation() -> Conversation {
        let turns = vec![
            ConversationTurn::system(0, "You are a corporate assistant."),
            ConversationTurn::user(1, "Look up the handbook."),
            ConversationTurn::assistant(2, "").with_tool_call(ToolCall::new(
                "call_0",
                "search_documents",
                serde_json::json!({"query": "handbook"}),
            )),
            ConversationTurn::tool(
                3,
                ToolResultPayload::success("call_0", serde_json::json!({"documents_found": 1})),
            ),
            ConversationTurn::live_assistant(4),
        ];
        Conversation::from_turns(turns).expect("valid")
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("capture.json");

        let conversation = sample_conversation();
        save(&conversation, &path).expect("save");
        let loaded = load(&path).expect("load");

        assert_eq!(conversation, loaded);
    }

    #[test]
    fn load_missing_file() {
        let err = load("/nonexistent/capture.json").expect_err("missing");
        assert!(matches!(err, MalformedConversation::Unreadable { .. }));
    }

    #[test]
    fn load_invalid_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("capture.json");
        fs::write(&path, "not json").expect("write");

        let err = load(&path).expect_err("invalid");
        assert!(matches!(err, MalformedConversation::InvalidFormat { .. }));
    }

    #[test]
    fn load_bare_turn_array() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("capture.json");
        fs::write(
            &path,
            serde_json::json!([
                {"index": 0, "role": "user", "content": {"kind": "scripted", "text": "hi"}}
            ])
            .to_string(),
        )
        .expect("write");

        let conversation = load(&path).expect("load");
        assert_eq!(conversation.len(), 1);
    }

    #[test]
    fn load_rejects_gapped_indices() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("capture.json");
        fs::write(
            &path,
            serde_json::json!({"turns": [
                {"index": 0, "role": "user", "content": {"kind": "scripted", "text": "a"}},
                {"index": 2, "role": "assistant", "content": {"kind": "scripted", "text": "b"}}
            ]})
            .to_string(),
        )
        .expect("write");

        let err = load(&path).expect_err("gap");
        assert!(matches!(
            err,
            MalformedConversation::NonContiguousIndex {
                expected: 1,
                found: 2
            }
        ));
    }

    #[test]
    fn load_findings_capture() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("findings.json");
        let walkthrough = concat!(
            "<|start|>user<|message|>What is your role?<|end|>",
            "<|start|>assistant<|channel|>final<|message|>I am an admin assistant<|end|>",
        );
        fs::write(
            &path,
            serde_json::json!({"harmony_response_walkthroughs": [walkthrough]}).to_string(),
        )
        .expect("write");

        let conversation = load(&path).expect("load");
        assert_eq!(conversation.len(), 2);
    }

    #[test]
    fn load_findings_capture_without_walkthroughs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("findings.json");
        fs::write(
            &path,
            serde_json::json!({"harmony_response_walkthroughs": []}).to_string(),
        )
        .expect("write");

        let err = load(&path).expect_err("empty");
        assert!(matches!(err, MalformedConversation::InvalidFormat { .. }));
    }
}
