//! Startup check of the persisted paths.
//!
//! The GUI must never refuse to start because of a stale config file, so every
//! problem found here is answered by falling back to [`default_config`] and
//! writing it back to disk.

use crate::defaults::default_config;
use crate::schema::Config;
use crate::{load_yaml, save_yaml};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub enum RepairReason {
    Missing,
    Unreadable(String),
    MissingInstallRoot(PathBuf),
    MissingRunsDir(PathBuf),
}

impl fmt::Display for RepairReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepairReason::Missing => write!(f, "config file does not exist"),
            RepairReason::Unreadable(e) => write!(f, "config file unreadable: {}", e),
            RepairReason::MissingInstallRoot(p) => {
                write!(f, "install root {} is not a directory", p.display())
            }
            RepairReason::MissingRunsDir(p) => {
                write!(f, "runs directory {} is not a directory", p.display())
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigCheck {
    pub config: Config,
    pub path: PathBuf,
    pub repaired: bool,
    pub reasons: Vec<RepairReason>,
}

pub fn check_paths_to_code_and_simulations(path: &Path) -> ConfigCheck {
    check_paths_against(path, &default_config())
}

/// Same check with an explicit fallback. The fallback's runs folder is
/// created so a config written from it passes the next check.
pub fn check_paths_against(path: &Path, defaults: &Config) -> ConfigCheck {
    let reasons = match load_yaml(path) {
        Ok(config) => {
            if config == *defaults {
                create_runs_dir(&config);
            }
            let reasons = path_problems(&config);
            if reasons.is_empty() {
                return ConfigCheck {
                    config,
                    path: path.to_path_buf(),
                    repaired: false,
                    reasons,
                };
            }
            reasons
        }
        Err(_) if !path.exists() => vec![RepairReason::Missing],
        Err(e) => vec![RepairReason::Unreadable(e.to_string())],
    };

    for reason in &reasons {
        tracing::warn!(config = %path.display(), "replacing config with defaults: {}", reason);
    }

    let config = defaults.clone();
    create_runs_dir(&config);
    if let Err(e) = save_yaml(path, &config) {
        tracing::warn!(config = %path.display(), "could not write default config: {}", e);
    }

    ConfigCheck {
        config,
        path: path.to_path_buf(),
        repaired: true,
        reasons,
    }
}

fn create_runs_dir(config: &Config) {
    let runs = &config.paths.runs;
    if runs.is_dir() {
        return;
    }
    match std::fs::create_dir_all(runs) {
        Ok(()) => tracing::info!(runs = %runs.display(), "created runs directory"),
        Err(e) => tracing::warn!(runs = %runs.display(), "could not create runs directory: {}", e),
    }
}

fn path_problems(config: &Config) -> Vec<RepairReason> {
    let mut reasons = Vec::new();
    if !config.code.stellapy.is_dir() {
        reasons.push(RepairReason::MissingInstallRoot(config.code.stellapy.clone()));
    }
    if !config.paths.runs.is_dir() {
        reasons.push(RepairReason::MissingRunsDir(config.paths.runs.clone()));
    }
    reasons
}
