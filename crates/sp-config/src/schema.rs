//! Configuration schema.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the nonlinear sub-directory below the pickles root.
pub const NONLINEAR_CACHE_DIR: &str = "Nonlinear";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub version: u32,
    pub code: CodeSection,
    pub paths: PathsSection,
    #[serde(default)]
    pub gui_settings: GuiSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodeSection {
    /// Install root of the application; GUI assets live below it.
    pub stellapy: PathBuf,
    /// Source directory of the stella code.
    pub stella: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathsSection {
    /// Directory holding the simulation folders.
    pub runs: PathBuf,
    #[serde(default)]
    pub gui_figures: PathBuf,
    #[serde(default)]
    pub gui_pickles: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GuiSettings {
    #[serde(default)]
    pub theme: Theme,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    #[serde(alias = "awdark")]
    Dark,
    #[serde(alias = "awlight")]
    Light,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Dark, Theme::Light];

    pub fn label(self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}

impl Config {
    pub fn icon_path(&self) -> PathBuf {
        self.code
            .stellapy
            .join("GUI")
            .join("images")
            .join("stellarator_long.png")
    }

    pub fn nonlinear_cache_dir(&self) -> PathBuf {
        self.paths.gui_pickles.join(NONLINEAR_CACHE_DIR)
    }
}
