mod about_dialog;
mod app;
mod editor_view;
mod native;
mod preferences_dialog;

use anyhow::anyhow;
use eframe::{egui, NativeOptions};
use quillpad_core::APP_NAME;
use quillpad_settings::layout::{MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH};
use quillpad_settings::{SettingsStore, WindowGeometry};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn open_settings() -> SettingsStore {
    match SettingsStore::open_default() {
        Ok(store) => store,
        Err(err) => {
            warn!(error = %err, "settings will not be persisted");
            SettingsStore::in_memory()
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let store = open_settings();
    if let Some(path) = store.path() {
        info!(path = %path.display(), "using settings file");
    }
    let geometry = WindowGeometry::restore(&store);

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_NAME)
            .with_position([geometry.x, geometry.y])
            .with_inner_size([geometry.width, geometry.height])
            .with_min_inner_size([MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT])
            .with_maximized(geometry.maximized),
        ..Default::default()
    };
    eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |cc| Box::new(app::MainWindow::new(cc, store))),
    )
    .map_err(|err| anyhow!("failed to start {APP_NAME}: {err}"))
}
