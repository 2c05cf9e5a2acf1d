//! Error type for the replay CLI.

use parley_conversation::{MalformedConversation, ReplayError};
use std::fmt;

/// Anything that can end a CLI run with a non-zero exit code.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be loaded.
    Config(config::ConfigError),
    /// The conversation file failed to load.
    Load(MalformedConversation),
    /// The replay aborted.
    Replay(ReplayError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration error: {e}"),
            Self::Load(e) => write!(f, "{e}"),
            Self::Replay(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<config::ConfigError> for CliError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<MalformedConversation> for CliError {
    fn from(e: MalformedConversation) -> Self {
        Self::Load(e)
    }
}

impl From<ReplayError> for CliError {
    fn from(e: ReplayError) -> Self {
        Self::Replay(e)
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
