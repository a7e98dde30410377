use serde::{Deserialize, Serialize};

use crate::ui::settings_io;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_CHARACTER_NAME: &str = "Kraven";

pub const API_URL_ENV: &str = "HOLODECK_API_URL";
pub const CHARACTER_ENV: &str = "HOLODECK_CHARACTER";

/// Where the game master lives and who we play. Fixed for the whole session.
///
/// Defaults can be overridden by `client.json` in the app config directory,
/// which in turn is overridden by `HOLODECK_API_URL` / `HOLODECK_CHARACTER`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_url: String,
    pub character_name: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            character_name: DEFAULT_CHARACTER_NAME.into(),
        }
    }
}

impl ClientConfig {
    pub fn load() -> Self {
        settings_io::load_client_config().with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let present = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = present(API_URL_ENV) {
            self.api_url = url;
        }
        if let Some(name) = present(CHARACTER_ENV) {
            self.character_name = name;
        }
        self
    }
}
