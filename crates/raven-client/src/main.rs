use anyhow::Result;
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use raven_client::config::ClientConfig;
use raven_client::ui;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "raven=debug,raven_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Raven client...");

    let config = ClientConfig::load_or_default();
    tracing::info!("Connecting to {} as {}", config.server_url, config.current_user);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 720.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Raven"),
        ..Default::default()
    };

    eframe::run_native(
        "Raven",
        options,
        Box::new(move |cc| Ok(Box::new(ui::RavenApp::new(cc, config)?))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run eframe: {}", e))?;

    Ok(())
}
