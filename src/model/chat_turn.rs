use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the conversation. Never edited after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,

    /// Game-master aside shown under the narration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_of_character: Option<String>,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            out_of_character: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            out_of_character: None,
        }
    }

    /// The backend sends `""` when it has nothing to add out of character.
    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.out_of_character = note.filter(|n| !n.trim().is_empty());
        self
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}
