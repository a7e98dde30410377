use serde_json::Value;

use crate::model::character_state::CharacterState;
use crate::model::chat_turn::ChatTurn;
use crate::model::session::SendOutcome;

pub enum EngineCommand {
    CheckHealth,
    RefreshState,
    SendMessage {
        message: String,
        history: Vec<ChatTurn>,
    },
}

#[derive(Debug)]
pub enum EngineResponse {
    Health(Result<Value, String>),

    StateLoaded(CharacterState),
    StateFailed(String),

    /// Exactly one per `SendMessage`.
    MessageSettled(SendOutcome),
}
