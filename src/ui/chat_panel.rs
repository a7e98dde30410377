use eframe::egui;
use egui::Layout;

use crate::model::chat_turn::ChatTurn;
use crate::model::session::Session;
use crate::model::chat_turn::Role;
use crate::ui::settings::UiSettings;

pub const THINKING_TEXT: &str = "The DM is thinking...";
pub const INPUT_HINT: &str = "What do you do?";

/// Draws the conversation and the input bar. Returns the raw text of an
/// accepted submission; the input box is cleared when that happens.
pub fn draw_chat_panel(
    ctx: &egui::Context,
    session: &Session,
    input_text: &mut String,
    settings: &UiSettings,
    scroll_to_latest: bool,
) -> Option<String> {
    let input_id = egui::Id::new("chat_input_box");
    let mut submitted = None;

    // ---------- Input bar ----------
    egui::TopBottomPanel::bottom("chat_input").show(ctx, |ui| {
        ui.add_space(6.0);
        let enabled = !session.is_loading();
        let mut send_now = false;

        ui.horizontal(|ui| {
            let response = ui.add_enabled(
                enabled,
                egui::TextEdit::singleline(input_text)
                    .id(input_id)
                    .hint_text(INPUT_HINT)
                    .desired_width(ui.available_width() - 60.0),
            );

            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                send_now = true;
            }

            if ui.add_enabled(enabled, egui::Button::new("Send")).clicked() {
                send_now = true;
            }
        });
        ui.add_space(6.0);

        if send_now {
            submitted = accept_input(input_text, session.is_loading());

            // Keep cursor focused
            ui.memory_mut(|m| m.request_focus(input_id));
        }
    });

    // ---------- Chat history ----------
    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for turn in session.history() {
                    draw_turn(ui, settings, turn);
                }

                if session.is_loading() {
                    ui.add_space(6.0);
                    bubble(
                        ui,
                        settings.bubble(Role::Assistant),
                        egui::RichText::new(THINKING_TEXT).italics().weak(),
                        None,
                    );
                }

                if scroll_to_latest {
                    ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                }
            });
    });

    submitted
}

/// Takes the input for sending unless it is blank or a send is in flight.
pub fn accept_input(input_text: &mut String, loading: bool) -> Option<String> {
    if loading || input_text.trim().is_empty() {
        return None;
    }
    Some(std::mem::take(input_text))
}

fn draw_turn(ui: &mut egui::Ui, settings: &UiSettings, turn: &ChatTurn) {
    ui.add_space(6.0);

    let text = egui::RichText::new(&turn.content).color(egui::Color32::WHITE);
    let note = turn.out_of_character.as_deref();

    if turn.is_user() {
        ui.with_layout(Layout::right_to_left(egui::Align::TOP), |ui| {
            bubble(ui, settings.bubble(Role::User), text, note);
        });
    } else {
        bubble(ui, settings.bubble(Role::Assistant), text, note);
    }
}

fn bubble(ui: &mut egui::Ui, color: egui::Color32, text: egui::RichText, note: Option<&str>) {
    let max_width = ui.available_width() * 0.8;

    egui::Frame::new()
        .fill(color)
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(10, 6))
        .show(ui, |ui| {
            ui.set_max_width(max_width);
            ui.with_layout(Layout::top_down(egui::Align::LEFT), |ui| {
                ui.label(text);

                if let Some(note) = note {
                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!("DM Note: {note}"))
                            .small()
                            .italics()
                            .color(egui::Color32::from_rgb(148, 163, 184)),
                    );
                }
            });
        });
}
