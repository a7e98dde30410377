use std::sync::mpsc::{Receiver, Sender};

use tracing::{debug, error, info, warn};

use crate::engine::client::GameMaster;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::model::chat_turn::ChatTurn;
use crate::model::session::SendOutcome;

/// Worker that owns the game master connection. Commands are handled one at
/// a time in arrival order; every command yields exactly one response.
pub struct Engine<G> {
    rx: Receiver<EngineCommand>,
    tx: Sender<EngineResponse>,
    game_master: G,
    character_name: String,
    repaint: Option<egui::Context>,
}

impl<G: GameMaster> Engine<G> {
    pub fn new(
        rx: Receiver<EngineCommand>,
        tx: Sender<EngineResponse>,
        game_master: G,
        character_name: String,
    ) -> Self {
        Self {
            rx,
            tx,
            game_master,
            character_name,
            repaint: None,
        }
    }

    /// Wake the UI after every response.
    pub fn with_repaint(mut self, ctx: egui::Context) -> Self {
        self.repaint = Some(ctx);
        self
    }

    pub fn run(&mut self) {
        info!(character = %self.character_name, "engine started");

        while let Ok(cmd) = self.rx.recv() {
            let resp = self.handle(cmd);

            if self.tx.send(resp).is_err() {
                break;
            }
            if let Some(ctx) = &self.repaint {
                ctx.request_repaint();
            }
        }

        info!("engine stopped");
    }

    pub fn handle(&self, cmd: EngineCommand) -> EngineResponse {
        match cmd {
            EngineCommand::CheckHealth => {
                let result = self.game_master.check_health().map_err(|e| e.to_string());
                match &result {
                    Ok(body) => info!(%body, "game master is up"),
                    Err(e) => warn!(error = %e, "game master health check failed"),
                }
                EngineResponse::Health(result)
            }

            EngineCommand::RefreshState => match self.game_master.get_game_state(&self.character_name) {
                Ok(state) => EngineResponse::StateLoaded(state),
                Err(e) => {
                    warn!(error = %e, "Failed to fetch state");
                    EngineResponse::StateFailed(e.to_string())
                }
            },

            EngineCommand::SendMessage { message, history } => {
                EngineResponse::MessageSettled(self.send(&message, &history))
            }
        }
    }

    fn send(&self, message: &str, history: &[ChatTurn]) -> SendOutcome {
        let reply = match self
            .game_master
            .send_message(message, &self.character_name, history)
        {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, status = ?e.status(), "send failed");
                return SendOutcome::Failed(e.to_string());
            }
        };

        if reply.updated_state.is_some() {
            return SendOutcome::Replied {
                reply,
                refreshed: None,
            };
        }

        debug!("reply carried no state, re-fetching");
        let refreshed = match self.game_master.get_game_state(&self.character_name) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!(error = %e, "Failed to fetch state");
                None
            }
        };

        SendOutcome::Replied { reply, refreshed }
    }
}
