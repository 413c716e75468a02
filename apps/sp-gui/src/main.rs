#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
#![allow(clippy::collapsible_if)]

mod app;
mod plot_surfaces;
mod preference_window;
mod styling;
mod views;

use app::StellapyApp;
use sp_app::{APP_ID, AppError, AppResult, WINDOW_TITLE, bootstrap};

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    // Paths are checked (and repaired) before any window exists.
    let shell = bootstrap(&sp_config::default_config_path())?;

    let icon = eframe::icon_data::from_png_bytes(&shell.icon_png).map_err(|e| {
        AppError::Gui(format!(
            "Failed to decode window icon {}: {}",
            shell.config.borrow().icon_path().display(),
            e
        ))
    })?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_title(WINDOW_TITLE)
            .with_app_id(APP_ID)
            .with_icon(icon)
            .with_visible(false),
        ..Default::default()
    };

    eframe::run_native(
        APP_ID,
        options,
        Box::new(|cc| Ok(Box::new(StellapyApp::new(cc, shell)?))),
    )
    .map_err(|e| AppError::Gui(e.to_string()))
}
