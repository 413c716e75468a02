//! Startup sequence of the window, up to (not including) drawing it.
//!
//! Order: configuration check, icon, shared state. The nonlinear cache
//! directory is ensured separately by the caller once the selection tab
//! exists, still before the window is shown.

use crate::error::{AppError, AppResult};
use crate::tabs::{TabContext, TabKind};
use sp_config::{Config, check_paths_to_code_and_simulations};
use sp_research::{Progress, Research, SharedProgress, SharedResearch};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub const WINDOW_TITLE: &str = "Stellapy: graphical environment for the gyrokinetic code stella";
pub const APP_ID: &str = "Stellapy";

pub type SharedConfig = Rc<RefCell<Config>>;

pub struct ShellContext {
    pub config: SharedConfig,
    pub config_path: PathBuf,
    pub config_repaired: bool,
    /// Raw PNG bytes; decoding is up to the window toolkit.
    pub icon_png: Vec<u8>,
    pub research: SharedResearch,
    pub progress: SharedProgress,
}

impl ShellContext {
    pub fn tab_context(&self, kind: TabKind) -> TabContext {
        TabContext {
            kind,
            research: Rc::clone(&self.research),
            progress: Rc::clone(&self.progress),
            config: Rc::clone(&self.config),
        }
    }
}

pub fn bootstrap(config_path: &Path) -> AppResult<ShellContext> {
    let check = check_paths_to_code_and_simulations(config_path);
    if check.repaired {
        tracing::info!(config = %config_path.display(), "using default configuration");
    }

    let icon_png = read_icon(&check.config)?;

    let research = sp_research::shared(Research::new());
    let progress = Rc::new(RefCell::new(Progress::new()));
    tracing::info!("research container initialized");

    Ok(ShellContext {
        config: Rc::new(RefCell::new(check.config)),
        config_path: check.path,
        config_repaired: check.repaired,
        icon_png,
        research,
        progress,
    })
}

pub fn read_icon(config: &Config) -> AppResult<Vec<u8>> {
    let path = config.icon_path();
    std::fs::read(&path).map_err(|source| AppError::IconRead { path, source })
}

pub fn ensure_nonlinear_cache_dir(config: &Config) -> AppResult<PathBuf> {
    let dir = config.nonlinear_cache_dir();
    std::fs::create_dir_all(&dir).map_err(|source| AppError::CreateDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
