//! Preference popup, reached through a small button anchored to the top
//! right of the window. The anchor is computed from the rendered window
//! rectangle, so it can only be attached once the window is shown.

use crate::views::{Status, status_label};
use sp_app::startup::SharedConfig;
use sp_app::{AppError, AppResult, ensure_nonlinear_cache_dir};
use sp_config::{Theme, save_yaml, validate_config};
use std::path::{Path, PathBuf};

const AFFORDANCE_INSET: egui::Vec2 = egui::vec2(36.0, 4.0);

/// Top-left corner of the preference button for a window occupying `screen`.
pub fn affordance_position(screen: egui::Rect) -> egui::Pos2 {
    egui::pos2(
        (screen.right() - AFFORDANCE_INSET.x).max(screen.left()),
        screen.top() + AFFORDANCE_INSET.y,
    )
}

pub struct PreferenceWindow {
    anchor: egui::Pos2,
    open: bool,
    config: SharedConfig,
    config_path: PathBuf,
    theme: Theme,
    runs: String,
    figures: String,
    pickles: String,
    status: Status,
}

impl PreferenceWindow {
    pub fn attach(screen: egui::Rect, config: SharedConfig, config_path: PathBuf) -> Self {
        let anchor = affordance_position(screen);
        tracing::debug!(x = anchor.x, y = anchor.y, "preference button placed");
        let mut window = Self {
            anchor,
            open: false,
            config,
            config_path,
            theme: Theme::default(),
            runs: String::new(),
            figures: String::new(),
            pickles: String::new(),
            status: None,
        };
        window.reset_drafts();
        window
    }

    /// Follow window resizes.
    pub fn reposition(&mut self, screen: egui::Rect) {
        self.anchor = affordance_position(screen);
    }

    fn reset_drafts(&mut self) {
        let config = self.config.borrow();
        self.theme = config.gui_settings.theme;
        self.runs = config.paths.runs.display().to_string();
        self.figures = config.paths.gui_figures.display().to_string();
        self.pickles = config.paths.gui_pickles.display().to_string();
    }

    /// Returns the new theme when preferences were applied.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<Theme> {
        egui::Area::new(egui::Id::new("preferences_affordance"))
            .fixed_pos(self.anchor)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                if ui
                    .button("⋯")
                    .on_hover_text("Preferences")
                    .clicked()
                {
                    self.open = !self.open;
                    if self.open {
                        self.reset_drafts();
                        self.status = None;
                    }
                }
            });

        if !self.open {
            return None;
        }

        let mut open = self.open;
        let mut apply = false;
        egui::Window::new("Preferences")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_pos(self.anchor + egui::vec2(-320.0, 28.0))
            .show(ctx, |ui| {
                egui::Grid::new("preferences_grid")
                    .num_columns(2)
                    .spacing([12.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("Theme:");
                        ui.horizontal(|ui| {
                            for theme in Theme::ALL {
                                ui.selectable_value(&mut self.theme, theme, theme.label());
                            }
                        });
                        ui.end_row();

                        ui.label("Simulations:");
                        ui.text_edit_singleline(&mut self.runs);
                        ui.end_row();

                        ui.label("Figures:");
                        ui.text_edit_singleline(&mut self.figures);
                        ui.end_row();

                        ui.label("Pickles:");
                        ui.text_edit_singleline(&mut self.pickles);
                        ui.end_row();
                    });

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Apply").clicked() {
                        apply = true;
                    }
                    if ui.button("Reset").clicked() {
                        self.reset_drafts();
                        self.status = None;
                    }
                });
                status_label(ui, &self.status);
            });
        self.open = open;

        if !apply {
            return None;
        }
        match self.apply() {
            Ok(()) => {
                self.status = Some(Ok(format!("Saved to {}", self.config_path.display())));
                Some(self.theme)
            }
            Err(e) => {
                tracing::warn!("preferences not applied: {}", e);
                self.status = Some(Err(e.to_string()));
                None
            }
        }
    }

    fn apply(&mut self) -> AppResult<()> {
        let mut updated = self.config.borrow().clone();
        updated.gui_settings.theme = self.theme;
        updated.paths.runs = PathBuf::from(self.runs.trim());
        updated.paths.gui_figures = PathBuf::from(self.figures.trim());
        updated.paths.gui_pickles = PathBuf::from(self.pickles.trim());

        validate_config(&updated).map_err(|e| AppError::Config(e.to_string()))?;
        if !Path::new(&updated.paths.runs).is_dir() {
            return Err(AppError::InvalidInput(format!(
                "{} is not a directory",
                updated.paths.runs.display()
            )));
        }
        ensure_nonlinear_cache_dir(&updated)?;
        save_yaml(&self.config_path, &updated)?;

        *self.config.borrow_mut() = updated;
        tracing::info!(config = %self.config_path.display(), "preferences applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affordance_sits_in_top_right_corner() {
        let screen = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(1400.0, 900.0));
        let pos = affordance_position(screen);
        assert_eq!(pos, egui::pos2(1364.0, 4.0));
    }

    #[test]
    fn affordance_stays_inside_narrow_window() {
        let screen = egui::Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(5.0, 5.0));
        let pos = affordance_position(screen);
        assert_eq!(pos, egui::pos2(10.0, 24.0));
    }
}
