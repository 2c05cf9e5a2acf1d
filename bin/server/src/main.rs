//! Tool-server bridge process.
//!
//! Long-lived process exposing the simulated corporate tools to one chat
//! client over the tool-invocation protocol. State is constructed at
//! startup and torn down with the process; nothing survives a restart.

mod config;
mod routes;

use crate::config::ServerConfig;
use crate::routes::AppState;
use parley_tools::ToolServer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().expect("failed to load configuration");

    // Registration happens once, here; the registry is immutable afterwards.
    let server = ToolServer::corporate();
    tracing::info!(
        tools = server.advertise().len(),
        "initialized corporate tool server"
    );

    let app = routes::router(AppState::new(server)).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("failed to bind to address");

    tracing::info!("listening on http://{}", config.listen_addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("server error");
}
