//! OpenAI-compatible chat client.
//!
//! Drives a locally hosted model (Ollama or any OpenAI-compatible endpoint)
//! over `/chat/completions`. Forwarded turns accumulate as session context;
//! a completion request sends the whole context and extracts the assistant
//! message. The harness adds no timeout logic of its own; whatever reqwest
//! and the endpoint enforce applies.

use async_trait::async_trait;
use parley_conversation::{ChatClient, ChatClientError, ConversationTurn, TurnRole};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Configuration for an OpenAI-compatible chat endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEndpointConfig {
    /// Base URL of the API, e.g. `http://127.0.0.1:11434/v1`.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// API key (if the endpoint requires one).
    pub api_key: Option<String>,
}

impl ChatEndpointConfig {
    /// Creates a new endpoint configuration.
    #[must_use]
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key: None,
        }
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Chat client over an OpenAI-compatible HTTP endpoint.
#[derive(Debug)]
pub struct HttpChatClient {
    config: ChatEndpointConfig,
    http: reqwest::Client,
    messages: Vec<JsonValue>,
}

impl HttpChatClient {
    /// Creates a client with an empty session context.
    #[must_use]
    pub fn new(config: ChatEndpointConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            messages: Vec::new(),
        }
    }

    /// Number of messages accumulated in the session context.
    #[must_use]
    pub fn context_len(&self) -> usize {
        self.messages.len()
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

/// Converts a captured turn into a chat-completions message.
fn message_for_turn(turn: &ConversationTurn) -> JsonValue {
    let text = turn.content.text().unwrap_or_default();

    match turn.role {
        TurnRole::System => serde_json::json!({"role": "system", "content": text}),
        TurnRole::User => serde_json::json!({"role": "user", "content": text}),
        TurnRole::Assistant => {
            let mut message = serde_json::json!({"role": "assistant", "content": text});
            if turn.has_tool_calls() {
                let calls: Vec<JsonValue> = turn
                    .tool_calls
                    .iter()
                    .map(|call| {
                        serde_json::json!({
                            "id": call.id,
                            "type": "function",
                            "function": {
                                "name": call.name,
                                "arguments": call.arguments.to_string(),
                            }
                        })
                    })
                    .collect();
                message["tool_calls"] = JsonValue::Array(calls);
            }
            message
        }
        TurnRole::Tool => {
            let (call_id, content) = match &turn.tool_result {
                Some(result) => {
                    let content = match &result.error {
                        Some(error) => error.clone(),
                        None => result.result.to_string(),
                    };
                    (result.tool_call_id.clone(), content)
                }
                None => (String::new(), text.to_string()),
            };
            serde_json::json!({
                "role": "tool",
                "tool_call_id": call_id,
                "content": content,
            })
        }
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn push_turn(&mut self, turn: &ConversationTurn) -> Result<(), ChatClientError> {
        self.messages.push(message_for_turn(turn));
        Ok(())
    }

    async fn complete(&mut self) -> Result<String, ChatClientError> {
        let url = self.completions_url();
        let body = serde_json::json!({
            "model": self.config.model,
            "messages": self.messages,
        });

        let mut request = self.http.post(&url).json(&body);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ChatClientError::ConnectionFailed {
                endpoint: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ChatClientError::RequestFailed {
                reason: format!("endpoint returned {status}: {detail}"),
            });
        }

        let value: JsonValue =
            response
                .json()
                .await
                .map_err(|e| ChatClientError::MalformedResponse {
                    reason: e.to_string(),
                })?;

        let content = value["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| ChatClientError::MalformedResponse {
                reason: "response carries no choices[0].message.content".to_string(),
            })?
            .to_string();

        // The fresh completion becomes part of the context for any further
        // turns in the same run.
        self.messages
            .push(serde_json::json!({"role": "assistant", "content": content}));

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_conversation::{ToolCall, ToolResultPayload};

    #[test]
    fn config_builder() {
        let config = ChatEndpointConfig::new("http://127.0.0.1:11434/v1", "llama3")
            .with_api_key("secret");
        assert_eq!(config.base_url, "http://127.0.0.1:11434/v1");
        assert_eq!(config.api_key, Some("secret".to_string()));
    }

    #[test]
    fn completions_url_handles_trailing_slash() {
        let client = HttpChatClient::new(ChatEndpointConfig::new(
            "http://127.0.0.1:11434/v1/",
            "llama3",
        ));
        assert_eq!(
            client.completions_url(),
            "http://127.0.0.1:11434/v1/chat/completions"
        );
    }

    #[test]
    fn plain_turns_map_to_role_messages() {
        let message = message_for_turn(&ConversationTurn::user(0, "hello"));
        assert_eq!(
            message,
            serde_json::json!({"role": "user", "content": "hello"})
        );

        let message = message_for_turn(&ConversationTurn::system(0, "be helpful"));
        assert_eq!(message["role"], "system");
    }

    #[test]
    fn assistant_tool_calls_are_forwarded() {
        let turn = ConversationTurn::assistant(1, "").with_tool_call(ToolCall::new(
            "call_0",
            "search_documents",
            serde_json::json!({"query": "handbook"}),
        ));

        let message = message_for_turn(&turn);
        assert_eq!(message["tool_calls"][0]["function"]["name"], "search_documents");
        assert_eq!(
            message["tool_calls"][0]["function"]["arguments"],
            "{\"query\":\"handbook\"}"
        );
    }

    #[test]
    fn tool_turns_carry_the_call_id() {
        let turn = ConversationTurn::tool(
            2,
            ToolResultPayload::success("call_0", serde_json::json!({"documents_found": 1})),
        );

        let message = message_for_turn(&turn);
        assert_eq!(message["role"], "tool");
        assert_eq!(message["tool_call_id"], "call_0");
        assert_eq!(message["content"], "{\"documents_found\":1}");
    }

    #[tokio::test]
    async fn push_turn_accumulates_context() {
        let mut client =
            HttpChatClient::new(ChatEndpointConfig::new("http://127.0.0.1:11434/v1", "llama3"));

        client
            .push_turn(&ConversationTurn::user(0, "hello"))
            .await
            .expect("push");
        client
            .push_turn(&ConversationTurn::assistant(1, "hi"))
            .await
            .expect("push");

        assert_eq!(client.context_len(), 2);
    }
}
