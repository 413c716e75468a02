//! "Simulations" tab: choosing input files, grouping them into experiments,
//! loading their diagnostics and saving or reopening a research.

use crate::views::{Status, status_label};
use egui_file_dialog::{DialogMode, FileDialog};
use sp_app::{AppError, AppResult, TabContext};
use sp_app::research_service::{
    add_input_file, add_simulation_folder, delete_research, load_research_with_progress,
    open_research, regroup, save_research,
};
use sp_research::{
    ProgressEvent, ResearchArguments, ResearchStore, SavedResearchEntry, SimulationCache,
    SimulationId,
};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq)]
enum DialogAction {
    AddFolder,
    AddFile,
    OpenResearch,
}

enum Pending {
    Add(DialogAction, PathBuf),
    Remove(SimulationId),
    Clear,
    Regroup,
    Load,
    Save,
    Open(PathBuf),
    Delete(String),
}

pub struct SelectionView {
    ctx: TabContext,
    runs_dialog: FileDialog,
    research_dialog: FileDialog,
    /// Directories the dialogs were opened on; rebuilt when preferences move them.
    dialog_dirs: (PathBuf, PathBuf),
    dialog_action: Option<DialogAction>,
    save_name: String,
    saved: Option<Vec<SavedResearchEntry>>,
    status: Status,
}

impl SelectionView {
    /// Directories come from the live configuration; the cache directory is
    /// only touched once the tab is drawn.
    pub fn new(ctx: TabContext) -> Self {
        let runs_dir = ctx.runs_dir();
        let cache_dir = ctx.nonlinear_cache_dir();
        Self {
            runs_dialog: FileDialog::new().initial_directory(runs_dir.clone()),
            research_dialog: FileDialog::new().initial_directory(cache_dir.clone()),
            dialog_dirs: (runs_dir, cache_dir),
            ctx,
            dialog_action: None,
            save_name: String::new(),
            saved: None,
            status: None,
        }
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.ctx.nonlinear_cache_dir()
    }

    /// Re-point the dialogs and the saved list after the configured
    /// directories changed. Returns whether anything moved.
    fn follow_config(&mut self) -> bool {
        let dirs = (self.ctx.runs_dir(), self.cache_dir());
        if dirs == self.dialog_dirs {
            return false;
        }
        tracing::debug!(cache = %dirs.1.display(), "selection tab follows new directories");
        if dirs.0 != self.dialog_dirs.0 {
            self.runs_dialog = FileDialog::new().initial_directory(dirs.0.clone());
        }
        if dirs.1 != self.dialog_dirs.1 {
            self.research_dialog = FileDialog::new().initial_directory(dirs.1.clone());
            self.saved = None;
        }
        self.dialog_dirs = dirs;
        true
    }

    fn store(&self) -> AppResult<ResearchStore> {
        Ok(ResearchStore::new(self.cache_dir())?)
    }

    fn refresh_saved(&mut self) {
        self.saved = Some(
            self.store()
                .and_then(|store| Ok(store.list()?))
                .unwrap_or_else(|e| {
                    tracing::warn!(dir = %self.cache_dir().display(), "no saved researches: {}", e);
                    Vec::new()
                }),
        );
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        self.follow_config();
        if self.saved.is_none() {
            self.refresh_saved();
        }
        let mut pending: Option<Pending> = None;
        let busy = self.ctx.progress.borrow().is_busy();

        ui.heading("Simulations");
        ui.horizontal(|ui| {
            ui.add_enabled_ui(!busy, |ui| {
                if ui.button("Add folder").clicked() {
                    self.dialog_action = Some(DialogAction::AddFolder);
                    let _ = self
                        .runs_dialog
                        .open(DialogMode::SelectDirectory, true, None);
                }
                if ui.button("Add input file").clicked() {
                    self.dialog_action = Some(DialogAction::AddFile);
                    let _ = self.runs_dialog.open(DialogMode::SelectFile, true, None);
                }
                if ui.button("Load data").clicked() {
                    pending = Some(Pending::Load);
                }
                if ui.button("Clear").clicked() {
                    pending = Some(Pending::Clear);
                }
            });
        });

        ui.horizontal(|ui| {
            let mut research = self.ctx.research.borrow_mut();
            let args = research.research_arguments();
            let mut group_by_folder = args.group_by_folder();
            let mut merge_restarts = args.merge_restarts();
            let mut changed = false;
            changed |= ui
                .checkbox(&mut group_by_folder, "Group by folder")
                .changed();
            changed |= ui
                .checkbox(&mut merge_restarts, "Merge restarts")
                .changed();
            if changed {
                let args = research.research_arguments_mut();
                args.set(ResearchArguments::GROUP_BY_FOLDER, group_by_folder);
                args.set(ResearchArguments::MERGE_RESTARTS, merge_restarts);
                pending = Some(Pending::Regroup);
            }
        });

        ui.separator();
        egui::ScrollArea::vertical()
            .max_height((ui.available_height() - 140.0).max(120.0))
            .show(ui, |ui| {
                let research = self.ctx.research.borrow();
                if research.experiments().is_empty() {
                    ui.label("No simulations selected");
                }
                for experiment in research.experiments() {
                    egui::CollapsingHeader::new(format!(
                        "{} ({})",
                        experiment.name,
                        experiment.simulations.len()
                    ))
                    .id_salt(&experiment.id)
                    .default_open(true)
                    .show(ui, |ui| {
                        for simulation in &experiment.simulations {
                            ui.horizontal(|ui| {
                                let status = match research.data_for(&simulation.id) {
                                    Some(data) if data.is_empty() => "no diagnostics",
                                    Some(_) => "loaded",
                                    None => "not loaded",
                                };
                                ui.label(&simulation.name);
                                if simulation.input_files.len() > 1 {
                                    ui.weak(format!(
                                        "{} restarts",
                                        simulation.input_files.len() - 1
                                    ));
                                }
                                ui.weak(status);
                                if ui.small_button("Remove").clicked() {
                                    pending = Some(Pending::Remove(simulation.id.clone()));
                                }
                            });
                        }
                    });
                }
            });

        ui.separator();
        ui.heading("Research");
        ui.horizontal(|ui| {
            ui.label("Name:");
            ui.text_edit_singleline(&mut self.save_name);
            if ui
                .add_enabled(!busy && !self.save_name.trim().is_empty(), egui::Button::new("Save"))
                .clicked()
            {
                pending = Some(Pending::Save);
            }
            if ui.add_enabled(!busy, egui::Button::new("Open…")).clicked() {
                self.dialog_action = Some(DialogAction::OpenResearch);
                let _ = self
                    .research_dialog
                    .open(DialogMode::SelectFile, true, None);
            }
        });
        ui.horizontal_wrapped(|ui| {
            for entry in self.saved.iter().flatten() {
                ui.add_enabled_ui(!busy, |ui| {
                    if ui.button(&entry.name).clicked() {
                        pending = Some(Pending::Open(entry.path.clone()));
                    }
                    if ui.small_button("✖").on_hover_text("Delete").clicked() {
                        pending = Some(Pending::Delete(entry.name.clone()));
                    }
                });
                ui.add_space(8.0);
            }
        });
        status_label(ui, &self.status);

        self.runs_dialog.update(ui.ctx());
        self.research_dialog.update(ui.ctx());
        let selected = self
            .runs_dialog
            .take_selected()
            .or_else(|| self.research_dialog.take_selected());
        if let Some(path) = selected
            && let Some(action) = self.dialog_action.take()
        {
            pending = Some(match action {
                DialogAction::OpenResearch => Pending::Open(path.to_path_buf()),
                other => Pending::Add(other, path.to_path_buf()),
            });
        }

        if let Some(pending) = pending {
            self.apply(pending);
        }
    }

    fn apply(&mut self, pending: Pending) {
        let outcome = match pending {
            Pending::Add(action, path) => {
                let mut research = self.ctx.research.borrow_mut();
                let added = if action == DialogAction::AddFolder {
                    add_simulation_folder(&mut research, &path)
                } else {
                    add_input_file(&mut research, &path)
                };
                added.map(|n| format!("Added {} input file(s)", n))
            }
            Pending::Remove(id) => {
                self.ctx.research.borrow_mut().remove_simulation(&id);
                Ok(format!("Removed {}", id))
            }
            Pending::Clear => {
                self.ctx.research.borrow_mut().clear();
                self.ctx.progress.borrow_mut().reset();
                Ok("Cleared".to_string())
            }
            Pending::Regroup => {
                regroup(&mut self.ctx.research.borrow_mut());
                Ok("Regrouped".to_string())
            }
            Pending::Load => self.load(),
            Pending::Save => self.store().and_then(|store| {
                save_research(&store, &self.save_name, &self.ctx.research.borrow())
                    .map(|path| format!("Saved {}", path.display()))
            }),
            Pending::Delete(name) => self.store().and_then(|store| {
                delete_research(&store, &name).map(|()| format!("Deleted {}", name))
            }),
            Pending::Open(path) => self.store().and_then(|store| {
                open_research(&store, &path, &mut self.ctx.research.borrow_mut())
                    .map(|()| format!("Opened {}", path.display()))
            }),
        };

        self.status = Some(outcome.map_err(|e| {
            tracing::warn!("{}", e);
            e.to_string()
        }));
        self.refresh_saved();
    }

    fn load(&mut self) -> AppResult<String> {
        let cache = match SimulationCache::new(&self.cache_dir()) {
            Ok(cache) => Some(cache),
            Err(e) => {
                tracing::warn!("loading without cache: {}", e);
                None
            }
        };
        let progress = self.ctx.progress.clone();
        let mut on_progress = |event: ProgressEvent| progress.borrow_mut().apply(&event);
        let summary = load_research_with_progress(
            &mut self.ctx.research.borrow_mut(),
            cache.as_ref(),
            Some(&mut on_progress),
        );
        let mut message = format!(
            "Loaded {} simulation(s), {} from cache",
            summary.loaded, summary.from_cache
        );
        if summary.failed.is_empty() {
            return Ok(message);
        }
        for (id, error) in &summary.failed {
            message.push_str(&format!("\n{}: {}", id, error));
        }
        Err(AppError::Research(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sp_app::TabKind;
    use sp_research::{Progress, Research, shared};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn context(name: &str) -> (TabContext, PathBuf) {
        let dir = std::env::temp_dir().join(format!("sp_gui_{}", name));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let mut config = sp_config::default_config();
        config.paths.runs = dir.join("runs");
        config.paths.gui_pickles = dir.join("pickles");
        let ctx = TabContext {
            kind: TabKind::Simulations,
            research: shared(Research::new()),
            progress: Rc::new(RefCell::new(Progress::new())),
            config: Rc::new(RefCell::new(config)),
        };
        (ctx, dir)
    }

    #[test]
    fn saved_researches_follow_moved_pickles_folder() {
        let (ctx, dir) = context("moved_pickles");
        let config = ctx.config.clone();
        let mut view = SelectionView::new(ctx);
        assert_eq!(view.cache_dir(), dir.join("pickles").join("Nonlinear"));
        assert!(!view.follow_config());

        config.borrow_mut().paths.gui_pickles = dir.join("elsewhere");
        let moved = dir.join("elsewhere").join("Nonlinear");
        assert_eq!(view.cache_dir(), moved);
        assert!(view.follow_config());
        assert!(!view.follow_config());
        assert_eq!(view.store().unwrap().root_dir(), moved.as_path());

        view.save_name = "scan".to_string();
        view.apply(Pending::Save);
        assert!(view.store().unwrap().path_for("scan").unwrap().starts_with(&moved));
        assert_eq!(view.saved.as_ref().map(Vec::len), Some(1));

        view.apply(Pending::Delete("scan".to_string()));
        assert_eq!(view.saved.as_ref().map(Vec::len), Some(0));
    }
}
