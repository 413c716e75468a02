//! Structural validation of a loaded config.

use crate::schema::Config;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Empty path for {field}")]
    EmptyPath { field: &'static str },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_config(config: &Config) -> Result<(), ValidationError> {
    if config.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    let fields = [
        ("code.stellapy", &config.code.stellapy),
        ("code.stella", &config.code.stella),
        ("paths.runs", &config.paths.runs),
        ("paths.gui_figures", &config.paths.gui_figures),
        ("paths.gui_pickles", &config.paths.gui_pickles),
    ];
    for (field, path) in fields {
        if path.as_os_str().is_empty() {
            return Err(ValidationError::EmptyPath { field });
        }
    }

    Ok(())
}
