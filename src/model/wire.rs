use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::model::character_state::CharacterState;
use crate::model::chat_turn::ChatTurn;

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub character_name: &'a str,
    pub session_history: &'a [ChatTurn],
}

/// Successful answer of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatResponse {
    pub narration: String,
    #[serde(default)]
    pub out_of_character: Option<String>,
    /// `None` when absent or not a character (the backend sends
    /// `{"error": ...}` for unknown names).
    #[serde(default, deserialize_with = "character_or_none")]
    pub updated_state: Option<CharacterState>,
}

fn character_or_none<'de, D>(deserializer: D) -> Result<Option<CharacterState>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;

    Ok(raw.filter(|v| !v.is_null()).and_then(|v| {
        serde_json::from_value(v)
            .map_err(|e| warn!(error = %e, "ignoring updated_state that is not a character"))
            .ok()
    }))
}

/// Error body the backend attaches to non-success statuses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    /// Usually a string; FastAPI validation failures send a list.
    #[serde(default)]
    pub detail: Option<Value>,
}
