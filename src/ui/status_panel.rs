use eframe::egui;

use crate::model::character_state::CharacterState;

const GOOD_HP: egui::Color32 = egui::Color32::from_rgb(34, 197, 94);
const LOW_HP: egui::Color32 = egui::Color32::from_rgb(239, 68, 68);
const LOCATION: egui::Color32 = egui::Color32::from_rgb(165, 180, 252);
const GOLD: egui::Color32 = egui::Color32::from_rgb(234, 179, 8);

pub fn draw_status_panel(ctx: &egui::Context, state: Option<&CharacterState>) {
    egui::SidePanel::left("status")
        .resizable(true)
        .default_width(300.0)
        .min_width(240.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match state {
                Some(state) => draw_character(ui, state),
                None => {
                    ui.add_space(8.0);
                    ui.weak("Loading status...");
                }
            });
        });
}

/* =========================
   Character UI
   ========================= */

fn draw_character(ui: &mut egui::Ui, state: &CharacterState) {
    ui.add_space(6.0);
    ui.heading(state.display_name());
    ui.separator();

    ui.columns(2, |cols| {
        cols[0].vertical_centered(|ui| {
            ui.small("HP");
            let color = if state.is_low_health() { LOW_HP } else { GOOD_HP };
            ui.label(egui::RichText::new(state.hp_label()).size(22.0).strong().color(color));
        });
        cols[1].vertical_centered(|ui| {
            ui.small("LEVEL");
            ui.label(egui::RichText::new(state.level.to_string()).size(22.0).strong());
        });
    });

    ui.add_space(8.0);
    ui.strong("Current Location");
    ui.label(egui::RichText::new(state.location_label()).color(LOCATION));

    if let Some(abilities) = &state.abilities {
        ui.add_space(8.0);
        ui.strong("Abilities");
        egui::Grid::new("abilities")
            .num_columns(3)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                for (i, (code, score)) in abilities.iter().enumerate() {
                    ui.vertical_centered(|ui| {
                        ui.small(code.to_uppercase());
                        ui.monospace(score.to_string());
                    });
                    if i % 3 == 2 {
                        ui.end_row();
                    }
                }
            });
    }

    if let Some(items) = state.carried_items() {
        ui.add_space(8.0);
        ui.strong("Inventory");
        for item in items {
            ui.horizontal(|ui| {
                ui.label(&item.name);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(format!("x{}", item.qty));
                });
            });
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
            ui.label(egui::RichText::new(state.gold_label()).color(GOLD));
        });
    }
}
