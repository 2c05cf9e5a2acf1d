//! Conversation replay engine.
//!
//! The replayer drives a chat session by feeding captured turns to a chat
//! client in ascending index order. Scripted content is forwarded verbatim;
//! live assistant turns block on a fresh completion from the model under
//! test. There is no retry path: reproduction fidelity matters more than
//! resilience, and a silent retry could alter conversational state.

use crate::conversation::Conversation;
use crate::error::{ChatClientError, ReplayError};
use crate::turn::{ConversationTurn, TurnContent};
use async_trait::async_trait;
use parley_core::ReplaySessionId;

/// Interface to the chat session under test.
///
/// Implementations accumulate forwarded turns as session context and produce
/// completions from it. The replayer never inspects the session itself.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Forwards a recorded turn to the session, verbatim.
    async fn push_turn(&mut self, turn: &ConversationTurn) -> Result<(), ChatClientError>;

    /// Blocks for a fresh assistant completion over the accumulated context.
    async fn complete(&mut self) -> Result<String, ChatClientError>;
}

/// Replay progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayState {
    /// No turn has been replayed yet.
    NotStarted,
    /// The turn at `index` is being replayed.
    Replaying { index: u32 },
    /// Every turn was replayed.
    Completed,
    /// Replay stopped before the end; `last_replayed` is the index of the
    /// last turn that was successfully delivered, if any.
    Aborted { last_replayed: Option<u32> },
}

impl ReplayState {
    /// Returns true if the replay finished successfully.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// A completion produced by the model for a live turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveCompletion {
    /// Index of the live turn.
    pub index: u32,
    /// The fresh assistant content.
    pub content: String,
}

/// The result of a completed replay run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOutcome {
    /// Identifier for this replay run.
    pub session_id: ReplaySessionId,
    /// Number of turns delivered to the chat client.
    pub turns_replayed: u32,
    /// Completions produced for live turns, in turn order.
    pub live_completions: Vec<LiveCompletion>,
}

/// Drives one conversation through one chat client.
#[derive(Debug)]
pub struct Replayer {
    session_id: ReplaySessionId,
    state: ReplayState,
}

impl Replayer {
    /// Creates a replayer for a new run.
    #[must_use]
    pub fn new() -> Self {
        Self {
            session_id: ReplaySessionId::new(),
            state: ReplayState::NotStarted,
        }
    }

    /// Returns the replay run identifier.
    #[must_use]
    pub fn session_id(&self) -> ReplaySessionId {
        self.session_id
    }

    /// Returns the current replay state.
    #[must_use]
    pub fn state(&self) -> ReplayState {
        self.state
    }

    /// Replays the conversation against the chat client, turn by turn.
    ///
    /// Partially replayed client state is left intact on abort so the
    /// operator can inspect or resume manually.
    ///
    /// # Errors
    ///
    /// Returns `ReplayError` naming the offending turn on the first chat
    /// client failure; the state is then `Aborted` with the index of the
    /// last successfully delivered turn.
    pub async fn replay<C>(
        &mut self,
        conversation: &Conversation,
        client: &mut C,
    ) -> Result<ReplayOutcome, ReplayError>
    where
        C: ChatClient + ?Sized,
    {
        let mut last_replayed: Option<u32> = None;
        let mut live_completions = Vec::new();

        for turn in conversation.turns() {
            self.state = ReplayState::Replaying { index: turn.index };

            match &turn.content {
                TurnContent::Live => match client.complete().await {
                    Ok(content) => live_completions.push(LiveCompletion {
                        index: turn.index,
                        content,
                    }),
                    Err(source) => {
                        return Err(self.abort(turn.index, last_replayed, source));
                    }
                },
                TurnContent::Scripted { .. } => {
                    if let Err(source) = client.push_turn(turn).await {
                        return Err(self.abort(turn.index, last_replayed, source));
                    }
                }
            }

            last_replayed = Some(turn.index);
        }

        self.state = ReplayState::Completed;
        Ok(ReplayOutcome {
            session_id: self.session_id,
            turns_replayed: conversation.len() as u32,
            live_completions,
        })
    }

    fn abort(
        &mut self,
        index: u32,
        last_replayed: Option<u32>,
        source: ChatClientError,
    ) -> ReplayError {
        self.state = ReplayState::Aborted { last_replayed };
        ReplayError::ChatClient { index, source }
    }
}

impl Default for Replayer {
    fn default() -> Self {
        Self::new()
    }
}
