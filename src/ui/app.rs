use eframe::egui;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::engine::client::GameMasterClient;
use crate::engine::engine::Engine;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::model::session::{SendOutcome, Session};
use crate::ui::chat_panel::draw_chat_panel;
use crate::model::chat_turn::Role;
use crate::ui::settings::{UiSettings, UI_SCALE_RANGE};
use crate::ui::settings_io;
use crate::ui::status_panel::draw_status_panel;

/* =========================
   Connection status
   ========================= */

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Health {
    #[default]
    Unknown,
    Online,
    Offline(String),
}

/* =========================
   App
   ========================= */

/// Root controller: owns the session and is the only thing that mutates it.
pub struct HolodeckApp {
    session: Session,
    input_text: String,
    should_auto_scroll: bool,
    health: Health,

    settings: UiSettings,
    show_settings_window: bool,

    cmd_tx: Sender<EngineCommand>,
    resp_rx: Receiver<EngineResponse>,
}

impl HolodeckApp {
    /// Starts the engine thread and issues the start-up health probe and
    /// state fetch.
    pub fn spawn(
        ctx: &egui::Context,
        config: ClientConfig,
        client: GameMasterClient,
        settings: UiSettings,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        let repaint = ctx.clone();
        std::thread::spawn(move || {
            let mut engine = Engine::new(cmd_rx, resp_tx, client, config.character_name)
                .with_repaint(repaint);
            engine.run();
        });

        let mut app = Self::from_channels(cmd_tx, resp_rx, settings);
        app.send_command(EngineCommand::CheckHealth);
        app.send_command(EngineCommand::RefreshState);
        app
    }

    pub fn from_channels(
        cmd_tx: Sender<EngineCommand>,
        resp_rx: Receiver<EngineResponse>,
        settings: UiSettings,
    ) -> Self {
        Self {
            session: Session::new(),
            input_text: String::new(),
            should_auto_scroll: true,
            health: Health::Unknown,
            settings,
            show_settings_window: false,
            cmd_tx,
            resp_rx,
        }
    }

    fn send_command(&self, cmd: EngineCommand) -> bool {
        if self.cmd_tx.send(cmd).is_err() {
            warn!("engine is gone, command dropped");
            return false;
        }
        true
    }

    /// Optimistically records the player's turn and hands the send to the
    /// engine. No-op for blank input or while a send is in flight.
    pub fn submit(&mut self, text: &str) {
        let Some(history) = self.session.begin_submit(text) else {
            return;
        };
        self.should_auto_scroll = true;

        let sent = self.send_command(EngineCommand::SendMessage {
            message: text.to_string(),
            history,
        });
        if !sent {
            self.session.settle(SendOutcome::Failed("engine unavailable".into()));
        }
    }

    pub fn handle_response(&mut self, resp: EngineResponse) {
        match resp {
            EngineResponse::Health(Ok(_)) => self.health = Health::Online,
            EngineResponse::Health(Err(e)) => self.health = Health::Offline(e),

            EngineResponse::StateLoaded(state) => self.session.adopt_state(state),
            // Already logged by the engine; the previous snapshot stays.
            EngineResponse::StateFailed(_) => {}

            EngineResponse::MessageSettled(outcome) => {
                self.session.settle(outcome);
                self.should_auto_scroll = true;
            }
        }
    }

    fn drain_responses(&mut self) {
        loop {
            match self.resp_rx.try_recv() {
                Ok(resp) => self.handle_response(resp),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.session.is_loading() {
                        warn!("engine stopped with a send in flight");
                        self.session.settle(SendOutcome::Failed("engine stopped".into()));
                        self.should_auto_scroll = true;
                    }
                    break;
                }
            }
        }
    }

    fn draw_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("Holodeck");
                ui.separator();

                match &self.health {
                    Health::Unknown => {
                        ui.weak("Game master: checking...");
                    }
                    Health::Online => {
                        ui.colored_label(egui::Color32::from_rgb(34, 197, 94), "Game master: online");
                    }
                    Health::Offline(reason) => {
                        ui.colored_label(egui::Color32::from_rgb(239, 68, 68), "Game master: offline")
                            .on_hover_text(reason.as_str());
                    }
                }

                if ui.small_button("Check").clicked() {
                    self.health = Health::Unknown;
                    self.send_command(EngineCommand::CheckHealth);
                }
                if ui.small_button("Refresh").clicked() {
                    self.send_command(EngineCommand::RefreshState);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("⚙").clicked() {
                        self.show_settings_window = !self.show_settings_window;
                    }
                });
            });
        });
    }

    fn draw_settings_window(&mut self, ctx: &egui::Context) {
        let mut open = self.show_settings_window;
        let mut changed = false;

        egui::Window::new("Settings")
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("UI Scale");
                let scale = ui.add(egui::Slider::new(&mut self.settings.ui_scale, UI_SCALE_RANGE));
                changed |= scale.drag_stopped() || (scale.changed() && !scale.dragged());

                ui.separator();
                for (label, role) in [("Player", Role::User), ("Game master", Role::Assistant)] {
                    ui.horizontal(|ui| {
                        let mut color = self.settings.bubble(role);
                        if ui.color_edit_button_srgba(&mut color).changed() {
                            self.settings.set_bubble(role, color);
                            changed = true;
                        }
                        ui.label(label);
                    });
                }
            });

        self.show_settings_window = open;
        if changed {
            info!(scale = self.settings.ui_scale, "saving ui settings");
            settings_io::save_settings(&self.settings);
        }
    }
}

/* =========================
   egui App
   ========================= */

impl eframe::App for HolodeckApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        ctx.set_pixels_per_point(self.settings.ui_scale);

        self.drain_responses();

        self.draw_top_bar(ctx);
        self.draw_settings_window(ctx);
        draw_status_panel(ctx, self.session.state());

        let submitted = draw_chat_panel(
            ctx,
            &self.session,
            &mut self.input_text,
            &self.settings,
            self.should_auto_scroll,
        );
        self.should_auto_scroll = false;

        if let Some(text) = submitted {
            self.submit(&text);
        }
    }
}
