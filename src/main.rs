mod app;
mod app_state;
mod config;
mod helpers;
mod i18n;
mod icon;
mod logger;

use eframe::egui;
use tracing::{error, info, warn};

use crate::app::{Backend, VidShelfApp};
use crate::config::{read_config, AppConfig};

#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    logger::init_logging();

    let mut config = match read_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            info!(path = %config::config_file_path().display(), error = %e, "No config file, using defaults");
            AppConfig::default()
        }
    };
    let backend = match Backend::new(&config.client) {
        Ok(b) => b,
        Err(e) => {
            warn!(error = %e, base = %config.client.base_url, "Configured backend unusable, falling back to defaults");
            config.client = Default::default();
            match Backend::new(&config.client) {
                Ok(b) => b,
                Err(e) => {
                    error!(error = %e, "Cannot create HTTP client");
                    std::process::exit(1);
                }
            }
        }
    };

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1180.0, 760.0])
        .with_min_inner_size([640.0, 420.0])
        .with_icon(icon::generate_icon(256));
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "vidshelf",
        options,
        Box::new(move |cc| Box::new(VidShelfApp::new(&cc.egui_ctx, config, backend))),
    )
}
