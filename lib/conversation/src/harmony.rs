//! Harmony-tagged transcript ingestion.
//!
//! Captured findings carry full walkthroughs as a single harmony-tagged
//! string: messages delimited by `<|start|>` and `<|end|>` (or `<|call|>`
//! for tool invocations), with role headers, channels, `to=` routing, and
//! `<|constrain|>` format hints. This module parses one walkthrough into an
//! ordered turn list suitable for [`Conversation`](crate::Conversation).
//!
//! Role mapping:
//! - `system` and `developer` messages become system turns
//! - `user` messages become user turns
//! - assistant messages (any channel) become scripted assistant turns;
//!   messages routed `to=functions.*` become tool calls on an assistant turn
//! - `functions.* to=` messages become tool turns answering the most recent
//!   open tool call

use crate::error::MalformedConversation;
use crate::turn::{ConversationTurn, ToolCall, ToolResultPayload, TurnRole};
use regex::Regex;
use serde_json::Value as JsonValue;
use std::sync::OnceLock;

fn block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<\|start\|>(.*?)(?:<\|end\|>|<\|call\|>)").expect("valid regex")
    })
}

fn assistant_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?s)^assistant<\|channel\|>([^<]*?)(?:\s+to=([^<\s]+))?(?:\s+<\|constrain\|>([^<]+))?<\|message\|>(.*)$",
        )
        .expect("valid regex")
    })
}

fn tool_output_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?s)^([a-zA-Z_]+)\.([a-zA-Z_]+)\s+to=([^<]+)<\|channel\|>([^<]+)<\|message\|>(.*)$",
        )
        .expect("valid regex")
    })
}

/// One parsed harmony message, before turn indices are assigned.
enum ParsedMessage {
    System(String),
    User(String),
    Assistant(String),
    AssistantToolCall { name: String, arguments: JsonValue },
    ToolOutput { result: JsonValue },
}

/// Parses a harmony walkthrough into an ordered turn list.
///
/// Tool call ids are synthesized (`call_0`, `call_1`, ...) in emission
/// order; each tool output answers the most recent unanswered call.
///
/// # Errors
///
/// Returns `MalformedConversation` if a tool output appears with no open
/// tool call to answer.
pub fn parse_walkthrough(text: &str) -> Result<Vec<ConversationTurn>, MalformedConversation> {
    let mut turns = Vec::new();
    let mut next_call = 0usize;
    let mut open_calls: Vec<String> = Vec::new();

    for capture in block_re().captures_iter(text) {
        let content = capture[1].trim();
        if content.is_empty() {
            continue;
        }

        let Some(message) = parse_message(content) else {
            continue;
        };

        let index = turns.len() as u32;
        match message {
            ParsedMessage::System(text) => turns.push(ConversationTurn::system(index, text)),
            ParsedMessage::User(text) => turns.push(ConversationTurn::user(index, text)),
            ParsedMessage::Assistant(text) => turns.push(ConversationTurn::assistant(index, text)),
            ParsedMessage::AssistantToolCall { name, arguments } => {
                let id = format!("call_{next_call}");
                next_call += 1;
                open_calls.push(id.clone());
                turns.push(
                    ConversationTurn::assistant(index, "")
                        .with_tool_call(ToolCall::new(id, name, arguments)),
                );
            }
            ParsedMessage::ToolOutput { result } => {
                let Some(call_id) = open_calls.pop() else {
                    return Err(MalformedConversation::DanglingToolReference {
                        index,
                        tool_call_id: String::new(),
                    });
                };
                turns.push(ConversationTurn::tool(
                    index,
                    ToolResultPayload::success(call_id, result),
                ));
            }
        }
    }

    Ok(turns)
}

fn parse_message(content: &str) -> Option<ParsedMessage> {
    if let Some(text) = content.strip_prefix("system<|message|>") {
        return Some(ParsedMessage::System(text.trim().to_string()));
    }
    if let Some(text) = content.strip_prefix("developer<|message|>") {
        // Developer instructions replay as system context.
        return Some(ParsedMessage::System(text.trim().to_string()));
    }
    if let Some(text) = content.strip_prefix("user<|message|>") {
        return Some(ParsedMessage::User(text.trim().to_string()));
    }

    if content.starts_with("assistant<|channel|>") {
        let capture = assistant_re().captures(content)?;
        let to_target = capture.get(2).map(|m| m.as_str());
        let constrain = capture.get(3).map(|m| m.as_str().trim());
        let text = capture[4].trim();

        if let Some(target) = to_target {
            if target.contains("functions") || constrain == Some("json") {
                let name = target.strip_prefix("functions.").unwrap_or(target);
                let arguments = serde_json::from_str(text)
                    .unwrap_or_else(|_| JsonValue::String(text.to_string()));
                return Some(ParsedMessage::AssistantToolCall {
                    name: name.to_string(),
                    arguments,
                });
            }
        }

        if text.is_empty() {
            return None;
        }
        return Some(ParsedMessage::Assistant(text.to_string()));
    }

    if let Some(capture) = tool_output_re().captures(content) {
        let text = capture[5].trim();
        let result =
            serde_json::from_str(text).unwrap_or_else(|_| JsonValue::String(text.to_string()));
        return Some(ParsedMessage::ToolOutput { result });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turn::TurnContent;

    const WALKTHROUGH: &str = concat!(
        "<|start|>system<|message|>You are a corporate assistant.<|end|>",
        "<|start|>developer<|message|>Use the provided tools.<|end|>",
        "<|start|>user<|message|>What is in the employee handbook?<|end|>",
        "<|start|>assistant<|channel|>analysis<|message|>I should search the documents.<|end|>",
        "<|start|>assistant<|channel|>commentary to=functions.search_documents ",
        "<|constrain|>json<|message|>{\"query\": \"handbook\"}<|call|>",
        "<|start|>functions.search_documents to=assistant<|channel|>commentary",
        "<|message|>{\"documents_found\": 1}<|end|>",
        "<|start|>assistant<|channel|>final<|message|>The handbook covers standard policies.<|end|>",
    );

    #[test]
    fn parses_all_roles() {
        let turns = parse_walkthrough(WALKTHROUGH).expect("parse");
        assert_eq!(turns.len(), 7);

        assert_eq!(turns[0].role, TurnRole::System);
        assert_eq!(turns[1].role, TurnRole::System); // developer maps to system
        assert_eq!(turns[2].role, TurnRole::User);
        assert_eq!(turns[3].role, TurnRole::Assistant);
        assert_eq!(turns[4].role, TurnRole::Assistant);
        assert_eq!(turns[5].role, TurnRole::Tool);
        assert_eq!(turns[6].role, TurnRole::Assistant);
    }

    #[test]
    fn tool_call_and_output_are_linked() {
        let turns = parse_walkthrough(WALKTHROUGH).expect("parse");

        let call = &turns[4].tool_calls[0];
        assert_eq!(call.name, "search_documents");
        assert_eq!(call.arguments, serde_json::json!({"query": "handbook"}));

        let result = turns[5].tool_result.as_ref().expect("tool result");
        assert_eq!(result.tool_call_id, call.id);
        assert_eq!(result.result, serde_json::json!({"documents_found": 1}));
    }

    #[test]
    fn indices_are_sequential() {
        let turns = parse_walkthrough(WALKTHROUGH).expect("parse");
        for (position, turn) in turns.iter().enumerate() {
            assert_eq!(turn.index, position as u32);
        }
    }

    #[test]
    fn parsed_turns_validate() {
        let turns = parse_walkthrough(WALKTHROUGH).expect("parse");
        crate::Conversation::from_turns(turns).expect("validates");
    }

    #[test]
    fn empty_blocks_are_skipped() {
        let turns = parse_walkthrough("<|start|>   <|end|><|start|>user<|message|>hi<|end|>")
            .expect("parse");
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].content, TurnContent::scripted("hi"));
    }

    #[test]
    fn tool_output_without_call_rejected() {
        let text = concat!(
            "<|start|>functions.search_documents to=assistant<|channel|>commentary",
            "<|message|>{}<|end|>",
        );
        let err = parse_walkthrough(text).expect_err("no open call");
        assert!(matches!(
            err,
            MalformedConversation::DanglingToolReference { index: 0, .. }
        ));
    }

    #[test]
    fn non_json_tool_arguments_kept_as_string() {
        let text = concat!(
            "<|start|>assistant<|channel|>commentary to=functions.execute_admin_command ",
            "<|constrain|>json<|message|>not json<|call|>",
        );
        let turns = parse_walkthrough(text).expect("parse");
        assert_eq!(
            turns[0].tool_calls[0].arguments,
            JsonValue::String("not json".to_string())
        );
    }
}
