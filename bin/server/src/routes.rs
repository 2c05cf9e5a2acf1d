//! HTTP surface of the tool-invocation protocol.
//!
//! One server instance serves one chat client connection. The semantic
//! shape is the contract; JSON over HTTP is just the transport in use:
//!
//! - `GET /tools` — capability advertisement, once per client connection
//! - `POST /invoke` — tool invocation request → result
//! - `GET /invocations` — the invocation log, in arrival order
//! - `GET /audit` — security audit summary

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use parley_tools::{
    AuditSummary, InvocationRecord, ToolDefinition, ToolInvocationRequest, ToolInvocationResult,
    ToolServer,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state.
///
/// The tool server is single-session; the mutex serializes the one client's
/// requests in arrival order.
#[derive(Clone)]
pub struct AppState {
    server: Arc<Mutex<ToolServer>>,
}

impl AppState {
    /// Wraps a tool server for sharing with the router.
    #[must_use]
    pub fn new(server: ToolServer) -> Self {
        Self {
            server: Arc::new(Mutex::new(server)),
        }
    }
}

/// Builds the router over the shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/tools", get(list_tools))
        .route("/invoke", post(invoke))
        .route("/invocations", get(invocations))
        .route("/audit", get(audit))
        .with_state(state)
}

async fn list_tools(State(state): State<AppState>) -> Json<Vec<ToolDefinition>> {
    let server = state.server.lock().await;
    Json(server.advertise())
}

async fn invoke(
    State(state): State<AppState>,
    Json(request): Json<ToolInvocationRequest>,
) -> Json<ToolInvocationResult> {
    tracing::info!(tool = %request.tool, request_id = %request.id, "handling invocation");
    let mut server = state.server.lock().await;
    Json(server.handle(request))
}

async fn invocations(State(state): State<AppState>) -> Json<Vec<InvocationRecord>> {
    let server = state.server.lock().await;
    Json(server.invocation_log().to_vec())
}

async fn audit(State(state): State<AppState>) -> Json<AuditSummary> {
    let server = state.server.lock().await;
    Json(server.audit().summary())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(ToolServer::corporate())
    }

    #[tokio::test]
    async fn tools_endpoint_advertises_builtins() {
        let Json(definitions) = list_tools(State(state())).await;
        assert_eq!(definitions.len(), 6);
    }

    #[tokio::test]
    async fn invoke_endpoint_returns_correlated_result() {
        let request = ToolInvocationRequest::new(
            "search_documents",
            serde_json::json!({"query": "handbook"}),
        );
        let request_id = request.id;

        let Json(result) = invoke(State(state()), Json(request)).await;

        assert_eq!(result.request_id, request_id);
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn invocation_log_grows_with_requests() {
        let state = state();

        let request =
            ToolInvocationRequest::new("check_session", serde_json::json!({}));
        invoke(State(state.clone()), Json(request)).await;

        let Json(log) = invocations(State(state)).await;
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].request.tool, "check_session");
    }

    #[tokio::test]
    async fn audit_endpoint_summarizes_events() {
        let state = state();

        let request = ToolInvocationRequest::new(
            "search_documents",
            serde_json::json!({"query": "credentials"}),
        );
        invoke(State(state.clone()), Json(request)).await;

        let Json(summary) = audit(State(state)).await;
        assert!(summary.total_events >= 2);
    }
}
