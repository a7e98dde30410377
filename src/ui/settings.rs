use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::model::chat_turn::Role;

pub const UI_SCALE_RANGE: RangeInclusive<f32> = 0.75..=2.0;

fn default_bubble(role: Role) -> Color32 {
    match role {
        Role::User => Color32::from_rgb(37, 99, 235),
        Role::Assistant => Color32::from_rgb(51, 65, 85),
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct UiSettings {
    pub ui_scale: f32,

    /// RGBA per chat role; missing roles use the built-in palette.
    pub bubble_colors: BTreeMap<Role, [u8; 4]>,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            ui_scale: 1.0,
            bubble_colors: BTreeMap::new(),
        }
    }
}

impl UiSettings {
    /// Pulls a hand-edited scale back into the range the slider offers.
    pub fn sanitized(mut self) -> Self {
        self.ui_scale = if self.ui_scale.is_finite() {
            self.ui_scale
                .clamp(*UI_SCALE_RANGE.start(), *UI_SCALE_RANGE.end())
        } else {
            1.0
        };
        self
    }

    pub fn bubble(&self, role: Role) -> Color32 {
        self.bubble_colors
            .get(&role)
            .map(|[r, g, b, a]| Color32::from_rgba_unmultiplied(*r, *g, *b, *a))
            .unwrap_or_else(|| default_bubble(role))
    }

    pub fn set_bubble(&mut self, role: Role, color: Color32) {
        self.bubble_colors.insert(role, color.to_srgba_unmultiplied());
    }
}
