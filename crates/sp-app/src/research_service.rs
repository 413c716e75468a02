//! Filling the shared research: selecting input files, grouping them and
//! loading their nonlinear diagnostics.

use crate::error::{AppError, AppResult};
use sp_research::{
    LoadStage, ProgressEvent, Research, ResearchStore, SimulationCache, SimulationId,
    compute_simulation_key, group_input_files, read_simulation,
};
use std::path::{Path, PathBuf};

const INPUT_EXTENSION: &str = "in";

/// Outcome of a load pass over all simulations.
#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    pub loaded: usize,
    pub from_cache: usize,
    pub failed: Vec<(SimulationId, String)>,
}

/// Add every `*.in` file below `folder` (recursively, sorted) and regroup.
pub fn add_simulation_folder(research: &mut Research, folder: &Path) -> AppResult<usize> {
    if !folder.is_dir() {
        return Err(AppError::InvalidInput(format!(
            "{} is not a directory",
            folder.display()
        )));
    }
    let mut files = Vec::new();
    collect_input_files(folder, &mut files)?;
    files.sort();

    let added = research.add_input_files(files);
    if added > 0 {
        regroup(research);
    }
    tracing::info!(folder = %folder.display(), added, "added simulation folder");
    Ok(added)
}

pub fn add_input_file(research: &mut Research, file: &Path) -> AppResult<usize> {
    if file.extension().is_none_or(|e| e != INPUT_EXTENSION) {
        return Err(AppError::InvalidInput(format!(
            "{} is not a stella input file (*.{})",
            file.display(),
            INPUT_EXTENSION
        )));
    }
    let added = research.add_input_files([file.to_path_buf()]);
    if added > 0 {
        regroup(research);
    }
    Ok(added)
}

fn collect_input_files(dir: &Path, out: &mut Vec<PathBuf>) -> AppResult<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_input_files(&path, out)?;
        } else if path.extension().is_some_and(|e| e == INPUT_EXTENSION) {
            out.push(path);
        }
    }
    Ok(())
}

/// Rebuild experiments from the input files and the current research arguments.
pub fn regroup(research: &mut Research) {
    let experiments = group_input_files(research.input_files(), research.research_arguments());
    research.set_experiments(experiments);
}

pub fn load_research(research: &mut Research, cache: Option<&SimulationCache>) -> LoadSummary {
    load_research_with_progress(research, cache, None)
}

/// Load the diagnostics of every simulation that has no data yet.
///
/// A simulation that fails to load is reported in the summary and skipped;
/// the others still load.
pub fn load_research_with_progress(
    research: &mut Research,
    cache: Option<&SimulationCache>,
    mut progress: Option<&mut dyn FnMut(ProgressEvent)>,
) -> LoadSummary {
    emit_progress(
        &mut progress,
        ProgressEvent::stage(LoadStage::Grouping, 0, 0, None),
    );
    if research.experiments().is_empty() && !research.input_files().is_empty() {
        regroup(research);
    }

    let pending: Vec<_> = research
        .simulations()
        .filter(|s| research.data_for(&s.id).is_none())
        .cloned()
        .collect();
    let total = pending.len();
    let mut summary = LoadSummary::default();

    for (done, simulation) in pending.into_iter().enumerate() {
        emit_progress(
            &mut progress,
            ProgressEvent::stage(
                LoadStage::Reading,
                done,
                total,
                Some(simulation.id.to_string()),
            ),
        );

        let key = match cache.map(|_| compute_simulation_key(&simulation)).transpose() {
            Ok(key) => key,
            Err(e) => {
                summary.failed.push((simulation.id.clone(), e.to_string()));
                continue;
            }
        };

        if let (Some(cache), Some(key)) = (cache, key.as_deref())
            && let Ok(Some(data)) = cache.load(key)
        {
            tracing::debug!(simulation = %simulation.id, "loaded from cache");
            research.insert_data(simulation.id.clone(), data);
            summary.loaded += 1;
            summary.from_cache += 1;
            continue;
        }

        match read_simulation(&simulation) {
            Ok(data) => {
                if let (Some(cache), Some(key)) = (cache, key.as_deref()) {
                    emit_progress(
                        &mut progress,
                        ProgressEvent::stage(LoadStage::Caching, done, total, None),
                    );
                    if let Err(e) = cache.save(key, &data) {
                        tracing::warn!(simulation = %simulation.id, "could not cache: {}", e);
                    }
                }
                research.insert_data(simulation.id.clone(), data);
                summary.loaded += 1;
            }
            Err(e) => {
                tracing::warn!(simulation = %simulation.id, "load failed: {}", e);
                summary.failed.push((simulation.id.clone(), e.to_string()));
            }
        }
    }

    let stage = if summary.failed.is_empty() {
        LoadStage::Done
    } else {
        LoadStage::Failed
    };
    let message = format!(
        "{} loaded ({} from cache), {} failed",
        summary.loaded,
        summary.from_cache,
        summary.failed.len()
    );
    emit_progress(
        &mut progress,
        ProgressEvent::stage(stage, total, total, Some(message)),
    );
    tracing::info!(
        loaded = summary.loaded,
        from_cache = summary.from_cache,
        failed = summary.failed.len(),
        "research loaded"
    );
    summary
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(ProgressEvent)>,
    event: ProgressEvent,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(event);
    }
}

pub fn save_research(store: &ResearchStore, name: &str, research: &Research) -> AppResult<PathBuf> {
    Ok(store.save(name, research)?)
}

pub fn delete_research(store: &ResearchStore, name: &str) -> AppResult<()> {
    store.delete(name)?;
    tracing::info!(name, "deleted saved research");
    Ok(())
}

/// Replace the contents of the shared research by a saved one.
pub fn open_research(store: &ResearchStore, path: &Path, research: &mut Research) -> AppResult<()> {
    let saved = store.load(path)?;
    tracing::info!(path = %path.display(), saved_at = %saved.saved_at, "opened research");
    research.replace_with(saved.research);
    Ok(())
}
