mod config;
mod engine;
mod model;
mod ui;

use tracing::info;

use crate::config::ClientConfig;
use crate::engine::client::GameMasterClient;
use crate::ui::app::HolodeckApp;
use crate::ui::settings_io;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    let config = ClientConfig::load();
    info!(api_url = %config.api_url, character = %config.character_name, "starting holodeck client");

    let client = GameMasterClient::new(&config.api_url)?;
    let settings = settings_io::load_settings();

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Holodeck",
        options,
        Box::new(move |cc| {
            Ok(Box::new(HolodeckApp::spawn(&cc.egui_ctx, config, client, settings)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("window closed with error: {e}"))
}
