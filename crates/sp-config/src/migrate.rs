//! Config version migration.

use crate::ConfigError;
use crate::defaults::default_config;
use crate::schema::Config;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut config: Config) -> Result<Config, ConfigError> {
    while config.version < LATEST_VERSION {
        config = migrate_one_version(config)?;
    }
    Ok(config)
}

fn migrate_one_version(config: Config) -> Result<Config, ConfigError> {
    match config.version {
        0 => migrate_v0_to_v1(config),
        v => Err(ConfigError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 0 files predate the GUI figure and pickle directories.
fn migrate_v0_to_v1(mut config: Config) -> Result<Config, ConfigError> {
    let defaults = default_config();
    if config.paths.gui_figures.as_os_str().is_empty() {
        config.paths.gui_figures = defaults.paths.gui_figures;
    }
    if config.paths.gui_pickles.as_os_str().is_empty() {
        config.paths.gui_pickles = defaults.paths.gui_pickles;
    }
    config.version = 1;
    Ok(config)
}
