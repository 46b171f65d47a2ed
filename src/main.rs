mod app;
mod config;
mod gui;
mod log;
mod trial;

use std::path::PathBuf;

use app::PerceptApp;
use config::{AppConfig, CONFIG_FILE};

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    ::log::info!("Starting PerceptMap v{}", env!("CARGO_PKG_VERSION"));

    let config_path = PathBuf::from(CONFIG_FILE);
    let config = AppConfig::load_or_create(&config_path);

    if !config.save_path.exists() {
        if let Err(e) = std::fs::create_dir_all(&config.save_path) {
            ::log::warn!(
                "Could not create save path {}: {}",
                config.save_path.display(),
                e
            );
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([900.0, 600.0])
            .with_decorations(!config.window_borderless)
            .with_title("PerceptMap"),
        ..Default::default()
    };

    eframe::run_native(
        "PerceptMap",
        options,
        Box::new(move |cc| Ok(Box::new(PerceptApp::new(cc, config, config_path)))),
    )
}
