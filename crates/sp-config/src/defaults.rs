//! Default configuration, used on first start and whenever the stored one is unusable.

use crate::migrate::LATEST_VERSION;
use crate::schema::{CodeSection, Config, GuiSettings, PathsSection};
use std::path::PathBuf;

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("stellapy")
        .join("config.yaml")
}

pub fn default_config() -> Config {
    let home = dirs::home_dir().unwrap_or_else(std::env::temp_dir);

    // The executable ships next to its GUI/ asset folder.
    let install_root = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    let figures = dirs::picture_dir().unwrap_or_else(|| home.join("figures"));
    let pickles = dirs::cache_dir()
        .unwrap_or_else(|| home.join(".cache"))
        .join("stellapy")
        .join("pickles");

    Config {
        version: LATEST_VERSION,
        code: CodeSection {
            stellapy: install_root,
            stella: home.join("stella"),
        },
        paths: PathsSection {
            runs: home.join("runs"),
            gui_figures: figures,
            gui_pickles: pickles,
        },
        gui_settings: GuiSettings::default(),
    }
}
