mod ui;

use crate::ui::InspectorApp;
use color_eyre::{eyre::eyre, Result};
use eframe::egui;
use framekit::config::{ensure_default_settings, settings_path, EngineSettings};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let settings = setup_config().await?;
    setup_logging_env(settings.tracing_level());
    info!("Settings: {:?}", settings);

    info!("Starting inspector UI");
    let window = &settings.window;
    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = egui::ViewportBuilder::default()
        .with_title(window.title.clone())
        .with_inner_size([window.width as f32, window.height as f32])
        .with_fullscreen(window.fullscreen);

    let title = window.title.clone();
    eframe::run_native(
        &title,
        native_options,
        Box::new(move |cc| Ok(Box::new(InspectorApp::new(cc, settings)?))),
    )
    .map_err(|e| eyre!("UI terminated with error: {}", e))?;

    info!("Inspector closed");
    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    Ok(())
}

fn setup_logging_env(level: Level) {
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}

async fn setup_config() -> Result<EngineSettings> {
    let path = settings_path().map_err(|e| eyre!("Failed to locate settings: {}", e))?;
    ensure_default_settings(&path)
        .await
        .map_err(|e| eyre!("Failed to load settings from {}: {}", path.display(), e))
}
