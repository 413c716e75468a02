use crate::plot_surfaces::PlotSurfaces;
use crate::preference_window::PreferenceWindow;
use crate::styling::apply_theme;
use crate::views::{SelectionView, SpatialTab, TimeTracesView, ViewAction};
use sp_app::startup::SharedConfig;
use sp_app::{
    AppResult, ShellContext, ShellLifecycle, ShellPhase, ShellResources, TabKind,
    ensure_nonlinear_cache_dir, run_shutdown,
};
use sp_research::SharedProgress;
use std::path::PathBuf;

struct TabSet {
    selection: SelectionView,
    time: TimeTracesView,
    spatial: SpatialTab,
}

pub struct StellapyApp {
    egui_ctx: egui::Context,
    lifecycle: ShellLifecycle,
    config: SharedConfig,
    config_path: PathBuf,
    progress: SharedProgress,
    tabs: Option<TabSet>,
    active_tab: TabKind,
    preferences: Option<PreferenceWindow>,
    plots: PlotSurfaces,
    notice: Option<String>,
}

impl StellapyApp {
    /// Runs with the window created but hidden: builds the tabs around the
    /// shared research and makes sure the nonlinear cache directory exists.
    pub fn new(cc: &eframe::CreationContext<'_>, shell: ShellContext) -> AppResult<Self> {
        let mut lifecycle = ShellLifecycle::new();
        apply_theme(&cc.egui_ctx, shell.config.borrow().gui_settings.theme);

        let tabs = TabSet {
            selection: SelectionView::new(shell.tab_context(TabKind::Simulations)),
            time: TimeTracesView::new(shell.tab_context(TabKind::NonlinearTime)),
            spatial: SpatialTab::new(shell.tab_context(TabKind::NonlinearSpatial)),
        };

        let cache_dir = ensure_nonlinear_cache_dir(&shell.config.borrow())?;
        tracing::info!(dir = %cache_dir.display(), "nonlinear cache directory ready");
        lifecycle.mark_populated()?;

        let notice = shell.config_repaired.then(|| {
            format!(
                "Paths were reset to defaults in {}",
                shell.config_path.display()
            )
        });

        Ok(Self {
            egui_ctx: cc.egui_ctx.clone(),
            lifecycle,
            config: shell.config,
            config_path: shell.config_path,
            progress: shell.progress,
            tabs: Some(tabs),
            active_tab: TabKind::first(),
            preferences: None,
            plots: PlotSurfaces::default(),
            notice,
        })
    }

    /// Advances the startup sequence on the frames following creation.
    fn step_lifecycle(&mut self, ctx: &egui::Context) {
        let outcome = match self.lifecycle.phase() {
            ShellPhase::Populated => {
                ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
                ctx.request_repaint();
                self.lifecycle.mark_shown()
            }
            ShellPhase::Shown => {
                self.preferences = Some(PreferenceWindow::attach(
                    ctx.screen_rect(),
                    self.config.clone(),
                    self.config_path.clone(),
                ));
                self.active_tab = TabKind::first();
                self.lifecycle.attach_preferences()
            }
            _ => Ok(()),
        };
        if let Err(e) = outcome {
            tracing::error!("{}", e);
        }
    }

    fn close(&mut self) {
        let report = run_shutdown(self);
        for error in report.errors() {
            tracing::error!("{}", error);
        }
        if let Err(e) = self.lifecycle.finish_close() {
            tracing::error!("{}", e);
        }
    }
}

impl ShellResources for StellapyApp {
    fn stop_dispatcher(&mut self) -> AppResult<()> {
        self.egui_ctx
            .send_viewport_cmd(egui::ViewportCommand::Close);
        Ok(())
    }

    fn release_window(&mut self) -> AppResult<()> {
        self.preferences = None;
        self.tabs = None;
        Ok(())
    }

    fn close_plot_surfaces(&mut self) -> AppResult<()> {
        let ctx = self.egui_ctx.clone();
        tracing::debug!(open = self.plots.len(), "closing plot surfaces");
        self.plots.close_all(&ctx);
        Ok(())
    }
}

impl eframe::App for StellapyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.viewport().close_requested()) && self.lifecycle.request_close() {
            self.close();
            return;
        }
        if self.lifecycle.is_closing() {
            return;
        }
        self.step_lifecycle(ctx);

        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for kind in TabKind::ALL {
                    ui.selectable_value(&mut self.active_tab, kind, kind.title());
                }
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            let progress = self.progress.borrow();
            ui.horizontal(|ui| {
                ui.label(progress.stage().label());
                let (done, total) = progress.counts();
                if total > 0 {
                    ui.weak(format!("{}/{}", done, total));
                }
                ui.add(
                    egui::ProgressBar::new(progress.fraction())
                        .desired_width(240.0)
                        .show_percentage(),
                );
                if let Some(message) = progress.message() {
                    ui.label(message);
                }
                if let Some(notice) = &self.notice {
                    ui.separator();
                    ui.label(notice);
                    if ui.small_button("Dismiss").clicked() {
                        self.notice = None;
                    }
                }
            });
        });

        let mut action = ViewAction::None;
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(tabs) = self.tabs.as_mut() else {
                return;
            };
            match self.active_tab {
                TabKind::Simulations => tabs.selection.show(ui),
                TabKind::NonlinearTime => action = tabs.time.show(ui),
                TabKind::NonlinearSpatial => action = tabs.spatial.show(ui),
            }
        });
        if let ViewAction::PopOut(figure) = action {
            self.plots.pop_out(figure);
        }
        if !self.plots.is_empty() {
            self.plots.show(ctx);
        }

        if self.lifecycle.phase().is_visible()
            && let Some(preferences) = self.preferences.as_mut()
        {
            preferences.reposition(ctx.screen_rect());
            if let Some(theme) = preferences.show(ctx) {
                apply_theme(ctx, theme);
            }
        }

        if self.progress.borrow().is_busy() {
            ctx.request_repaint();
        }
    }
}
