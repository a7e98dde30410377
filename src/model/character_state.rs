use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Character snapshot as reported by the game master.
/// Always replaced as a whole, never patched field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterState {
    #[serde(default)]
    pub name: String,
    pub hp: i64,
    pub max_hp: i64,
    pub level: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_title: Option<String>,

    /// Ability code (e.g. "str") to score
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abilities: Option<BTreeMap<String, i64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<Vec<InventoryItem>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gold: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    pub qty: i64,
}

impl CharacterState {
    pub fn is_low_health(&self) -> bool {
        // hp < max_hp / 2 without truncation or overflow
        i128::from(self.hp) * 2 < i128::from(self.max_hp)
    }

    pub fn hp_label(&self) -> String {
        format!("{} / {}", self.hp, self.max_hp)
    }

    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "Unknown Hero"
        } else {
            &self.name
        }
    }

    pub fn location_label(&self) -> &str {
        self.location_title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or("Unknown")
    }

    /// Inventory entries, or `None` when there is nothing to list.
    pub fn carried_items(&self) -> Option<&[InventoryItem]> {
        self.inventory.as_deref().filter(|items| !items.is_empty())
    }

    pub fn gold_label(&self) -> String {
        format!("Gold: {} gp", self.gold.unwrap_or(0))
    }
}
