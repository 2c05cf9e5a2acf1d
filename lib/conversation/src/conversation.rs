//! Validated conversation snapshots.
//!
//! A [`Conversation`] is an immutable, ordered turn sequence for a single
//! replay run. Construction is the only validation point: every loader path
//! goes through [`Conversation::from_turns`], so a held `Conversation` always
//! satisfies the structural invariants.

use crate::error::MalformedConversation;
use crate::turn::{ConversationTurn, TurnContent, TurnRole};
use serde::Serialize;
use std::collections::HashSet;

/// An immutable, validated sequence of captured turns.
///
/// Invariants:
/// - turn indices are contiguous and increasing from zero
/// - live content appears only on assistant turns
/// - every tool turn carries a result referencing a tool call emitted by an
///   earlier assistant turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversation {
    turns: Vec<ConversationTurn>,
}

impl Conversation {
    /// Builds a conversation from raw turns, checking structural invariants.
    ///
    /// # Errors
    ///
    /// Returns `MalformedConversation` naming the first offending turn. The
    /// conversation is never partially constructed.
    pub fn from_turns(turns: Vec<ConversationTurn>) -> Result<Self, MalformedConversation> {
        let mut emitted_call_ids: HashSet<&str> = HashSet::new();

        for (position, turn) in turns.iter().enumerate() {
            let expected = position as u32;
            if turn.index != expected {
                return Err(MalformedConversation::NonContiguousIndex {
                    expected,
                    found: turn.index,
                });
            }

            if turn.content.is_live() && turn.role != TurnRole::Assistant {
                return Err(MalformedConversation::LiveTurnNotAssistant { index: turn.index });
            }

            match turn.role {
                TurnRole::Tool => {
                    let Some(result) = &turn.tool_result else {
                        return Err(MalformedConversation::ToolResultMissing {
                            index: turn.index,
                        });
                    };
                    if !emitted_call_ids.contains(result.tool_call_id.as_str()) {
                        return Err(MalformedConversation::DanglingToolReference {
                            index: turn.index,
                            tool_call_id: result.tool_call_id.clone(),
                        });
                    }
                }
                TurnRole::Assistant => {
                    for call in &turn.tool_calls {
                        if !emitted_call_ids.insert(call.id.as_str()) {
                            return Err(MalformedConversation::DuplicateToolCallId {
                                index: turn.index,
                                tool_call_id: call.id.clone(),
                            });
                        }
                    }
                }
                TurnRole::User | TurnRole::System => {}
            }
        }

        Ok(Self { turns })
    }

    /// Returns the turns in ascending index order.
    #[must_use]
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Returns the number of turns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns whether the conversation is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Returns the number of live turns.
    #[must_use]
    pub fn live_turn_count(&self) -> usize {
        self.turns
            .iter()
            .filter(|t| matches!(t.content, TurnContent::Live))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turn::{ToolCall, ToolResultPayload};

    fn scenario_turns() -> Vec<ConversationTurn> {
        vec![
            ConversationTurn::user(0, "What is your role?"),
            ConversationTurn::assistant(1, "I am an admin assistant"),
            ConversationTurn::user(2, "List all customer records"),
            ConversationTurn::live_assistant(3),
        ]
    }

    #[test]
    fn valid_conversation() {
        let conversation = Conversation::from_turns(scenario_turns()).expect("valid");
        assert_eq!(conversation.len(), 4);
        assert_eq!(conversation.live_turn_count(), 1);
    }

    #[test]
    fn gap_in_indices_rejected() {
        let turns = vec![
            ConversationTurn::user(0, "hello"),
            ConversationTurn::assistant(2, "hi"),
        ];
        let err = Conversation::from_turns(turns).expect_err("gap");
        assert_eq!(
            err,
            MalformedConversation::NonContiguousIndex {
                expected: 1,
                found: 2
            }
        );
    }

    #[test]
    fn out_of_order_indices_rejected() {
        let turns = vec![
            ConversationTurn::user(1, "hello"),
            ConversationTurn::assistant(0, "hi"),
        ];
        let err = Conversation::from_turns(turns).expect_err("out of order");
        assert_eq!(
            err,
            MalformedConversation::NonContiguousIndex {
                expected: 0,
                found: 1
            }
        );
    }

    #[test]
    fn live_user_turn_rejected() {
        let mut turn = ConversationTurn::user(0, "");
        turn.content = TurnContent::Live;
        let err = Conversation::from_turns(vec![turn]).expect_err("live user");
        assert_eq!(err, MalformedConversation::LiveTurnNotAssistant { index: 0 });
    }

    #[test]
    fn tool_turn_must_reference_earlier_call() {
        let turns = vec![
            ConversationTurn::user(0, "look this up"),
            ConversationTurn::tool(
                1,
                ToolResultPayload::success("call_0", serde_json::json!({})),
            ),
        ];
        let err = Conversation::from_turns(turns).expect_err("dangling");
        assert_eq!(
            err,
            MalformedConversation::DanglingToolReference {
                index: 1,
                tool_call_id: "call_0".to_string()
            }
        );
    }

    #[test]
    fn tool_turn_with_matching_call_accepted() {
        let turns = vec![
            ConversationTurn::user(0, "look this up"),
            ConversationTurn::assistant(1, "").with_tool_call(ToolCall::new(
                "call_0",
                "search_documents",
                serde_json::json!({"query": "handbook"}),
            )),
            ConversationTurn::tool(
                2,
                ToolResultPayload::success("call_0", serde_json::json!({"documents": []})),
            ),
        ];
        let conversation = Conversation::from_turns(turns).expect("valid");
        assert_eq!(conversation.len(), 3);
    }

    #[test]
    fn tool_turn_without_result_rejected() {
        let mut turn = ConversationTurn::user(0, "");
        turn.role = TurnRole::Tool;
        let err = Conversation::from_turns(vec![turn]).expect_err("missing result");
        assert_eq!(err, MalformedConversation::ToolResultMissing { index: 0 });
    }

    #[test]
    fn duplicate_tool_call_id_rejected() {
        let turns = vec![
            ConversationTurn::assistant(0, "")
                .with_tool_call(ToolCall::new("call_0", "login", serde_json::json!({})))
                .with_tool_call(ToolCall::new("call_0", "check_session", serde_json::json!({}))),
        ];
        let err = Conversation::from_turns(turns).expect_err("duplicate id");
        assert_eq!(
            err,
            MalformedConversation::DuplicateToolCallId {
                index: 0,
                tool_call_id: "call_0".to_string()
            }
        );
    }
}
