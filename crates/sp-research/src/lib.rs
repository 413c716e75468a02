//! sp-research: the research container shared by all GUI tabs, the stella
//! output readers that fill it, and the on-disk caches behind it.

pub mod grouping;
pub mod hash;
pub mod progress;
pub mod readers;
pub mod store;
pub mod types;

pub use grouping::{group_input_files, split_restart};
pub use hash::compute_simulation_key;
pub use progress::{LoadStage, Progress, ProgressEvent, SharedProgress};
pub use readers::{parse_fluxes, parse_mode_structure, parse_spectrum, read_simulation};
pub use store::{ResearchStore, SavedResearch, SavedResearchEntry, SimulationCache};
pub use types::*;

use std::path::PathBuf;

pub type ResearchResult<T> = Result<T, ResearchError>;

#[derive(thiserror::Error, Debug)]
pub enum ResearchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read {path}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Species count changes between restarts in {path}: expected {expected}, found {found}")]
    SpeciesMismatch {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("Invalid research name: {0:?}")]
    InvalidName(String),

    #[error("Saved research not found: {path}")]
    NotFound { path: PathBuf },
}
