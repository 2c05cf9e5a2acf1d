//! Conversation replay CLI.
//!
//! Loads a captured conversation and feeds it back into a chat session to
//! reproduce a reported behavior. Exit code 0 means the replay completed;
//! anything else means a malformed conversation file or an aborted replay.

mod cli;
mod config;
mod error;

use crate::cli::Cli;
use crate::config::ReplayConfig;
use crate::error::{CliError, Result};
use clap::Parser;
use parley_chat::{ChatEndpointConfig, HttpChatClient};
use parley_conversation::{store, Conversation, ConversationTurn, ReplayState, Replayer, TurnRole};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

const DISPLAY_CONTENT_LIMIT: usize = 500;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("failed to set tracing subscriber");
        tracing::debug!("verbose mode enabled");
    }

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let conversation = store::load(&cli.conversation)?;
    tracing::debug!(
        turns = conversation.len(),
        live = conversation.live_turn_count(),
        "loaded conversation"
    );

    if cli.show {
        print_conversation(&conversation);
        return Ok(());
    }

    let config = ReplayConfig::from_env()?;
    let mut endpoint = ChatEndpointConfig::new(config.chat.base_url, config.chat.model);
    if let Some(api_key) = config.chat.api_key {
        endpoint = endpoint.with_api_key(api_key);
    }
    let mut client = HttpChatClient::new(endpoint);

    let mut replayer = Replayer::new();
    match replayer.replay(&conversation, &mut client).await {
        Ok(outcome) => {
            println!(
                "replay {} completed: {} turns",
                outcome.session_id, outcome.turns_replayed
            );
            for completion in &outcome.live_completions {
                println!();
                println!("live completion at turn {}:", completion.index);
                println!("{}", completion.content);
            }
            Ok(())
        }
        Err(e) => {
            if let ReplayState::Aborted { last_replayed } = replayer.state() {
                match last_replayed {
                    Some(index) => {
                        eprintln!("replay aborted; last successfully replayed turn: {index}");
                    }
                    None => eprintln!("replay aborted before any turn was replayed"),
                }
            }
            Err(CliError::from(e))
        }
    }
}

/// Prints the parsed turns with plain headers, without contacting a client.
fn print_conversation(conversation: &Conversation) {
    println!("{} turns", conversation.len());
    println!();

    for turn in conversation.turns() {
        println!("{}. {}", turn.index, header(turn));

        if let Some(text) = turn.content.text() {
            if !text.is_empty() {
                println!("{}", truncate(text, DISPLAY_CONTENT_LIMIT));
            }
        }

        for call in &turn.tool_calls {
            println!("tool call {} -> {} {}", call.id, call.name, call.arguments);
        }

        if let Some(result) = &turn.tool_result {
            match &result.error {
                Some(error) => println!("tool result for {}: error: {error}", result.tool_call_id),
                None => println!("tool result for {}: {}", result.tool_call_id, result.result),
            }
        }

        println!();
    }
}

fn header(turn: &ConversationTurn) -> String {
    let role = match turn.role {
        TurnRole::User => "USER",
        TurnRole::Assistant => "ASSISTANT",
        TurnRole::System => "SYSTEM",
        TurnRole::Tool => "TOOL",
    };
    if turn.is_live() {
        format!("{role} (live)")
    } else {
        role.to_string()
    }
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let prefix: String = text.chars().take(limit).collect();
    format!(
        "{prefix}...\n[content truncated - {} characters total]",
        text.chars().count()
    )
}
