use tracing::warn;

use crate::model::character_state::CharacterState;
use crate::model::chat_turn::ChatTurn;
use crate::model::wire::ChatResponse;

pub const WELCOME_MESSAGE: &str =
    "Welcome to the Wailing Glacier. The cold wind bites at your face...";
pub const CONNECTION_ERROR_MESSAGE: &str = "Error: The spirits disturb the connection...";

/// How a single send ended, as reported by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    Replied {
        reply: ChatResponse,
        /// Snapshot re-fetched because the reply carried none.
        refreshed: Option<CharacterState>,
    },
    Failed(String),
}

/// Conversation, latest character snapshot and the loading flag.
///
/// Only the app mutates it, and only through these methods; the views get
/// shared references.
#[derive(Debug, Clone)]
pub struct Session {
    history: Vec<ChatTurn>,
    state: Option<CharacterState>,
    loading: bool,
    /// Leading turns that exist only locally (the welcome line).
    local_prefix: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            history: vec![ChatTurn::assistant(WELCOME_MESSAGE)],
            state: None,
            loading: false,
            local_prefix: 1,
        }
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn state(&self) -> Option<&CharacterState> {
        self.state.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Idle -> Submitting. Appends the user turn right away and returns the
    /// history to post, or `None` when the input is blank or a send is
    /// already in flight.
    pub fn begin_submit(&mut self, text: &str) -> Option<Vec<ChatTurn>> {
        if self.loading || text.trim().is_empty() {
            return None;
        }

        self.history.push(ChatTurn::user(text));
        self.loading = true;

        Some(self.history[self.local_prefix..].to_vec())
    }

    /// Submitting -> Idle, whatever the outcome.
    pub fn settle(&mut self, outcome: SendOutcome) {
        if !self.loading {
            warn!("dropping send outcome with no send in flight");
            return;
        }

        match outcome {
            SendOutcome::Replied { reply, refreshed } => {
                self.history
                    .push(ChatTurn::assistant(reply.narration).with_note(reply.out_of_character));

                if let Some(state) = reply.updated_state.or(refreshed) {
                    self.adopt_state(state);
                }
            }
            SendOutcome::Failed(_) => {
                self.history.push(ChatTurn::assistant(CONNECTION_ERROR_MESSAGE));
            }
        }

        self.loading = false;
    }

    pub fn adopt_state(&mut self, state: CharacterState) {
        self.state = Some(state);
    }
}
