mod app;
mod convert;
mod messages;
mod panels;
mod state;
mod worker;

use std::path::PathBuf;

use idframe_core::config::WizardConfig;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Optional first argument: wizard config TOML.
    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => match WizardConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Failed to load config {}: {e}", path.display());
                WizardConfig::default()
            }
        },
        None => WizardConfig::default(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([860.0, 560.0])
            .with_title("idframe"),
        ..Default::default()
    };

    eframe::run_native(
        "idframe",
        options,
        Box::new(move |cc| Ok(Box::new(app::IdframeApp::new(&cc.egui_ctx, config)?))),
    )
}
