//! Shared application service layer for the stellapy nonlinear GUI.
//!
//! Everything the window does that is not drawing lives here: the startup
//! sequence, the tab catalogue and the context each tab is handed, the window
//! lifecycle, the guarded shutdown, research loading and plot queries.

pub mod error;
pub mod export;
pub mod lifecycle;
pub mod query;
pub mod research_service;
pub mod shutdown;
pub mod startup;
pub mod tabs;

pub use error::{AppError, AppResult};
pub use lifecycle::{ShellLifecycle, ShellPhase};
pub use research_service::{
    LoadSummary, add_input_file, add_simulation_folder, delete_research, load_research, load_research_with_progress,
    open_research, regroup, save_research,
};
pub use shutdown::{ShellResources, ShutdownReport, ShutdownStep, run_shutdown};
pub use startup::{APP_ID, ShellContext, WINDOW_TITLE, bootstrap, ensure_nonlinear_cache_dir};
pub use tabs::{TabContext, TabKind};
