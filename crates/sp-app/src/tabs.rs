//! The fixed tab catalogue and the context handed to every tab.

use crate::startup::SharedConfig;
use sp_research::{SharedProgress, SharedResearch};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabKind {
    Simulations,
    NonlinearTime,
    NonlinearSpatial,
}

impl TabKind {
    /// Notebook order; the first entry is selected once the window is shown.
    pub const ALL: [TabKind; 3] = [
        TabKind::Simulations,
        TabKind::NonlinearTime,
        TabKind::NonlinearSpatial,
    ];

    pub fn title(self) -> &'static str {
        match self {
            TabKind::Simulations => "Simulations",
            TabKind::NonlinearTime => "Nonlinear time traces",
            TabKind::NonlinearSpatial => "Nonlinear spectra and parallel mode structure",
        }
    }

    pub fn first() -> TabKind {
        Self::ALL[0]
    }
}

/// What a tab may reach: the shared research, the progress indicator and the
/// live configuration. Clones share the same underlying instances.
#[derive(Clone)]
pub struct TabContext {
    pub kind: TabKind,
    pub research: SharedResearch,
    pub progress: SharedProgress,
    pub config: SharedConfig,
}

impl TabContext {
    pub fn figures_dir(&self) -> PathBuf {
        self.config.borrow().paths.gui_figures.clone()
    }

    pub fn runs_dir(&self) -> PathBuf {
        self.config.borrow().paths.runs.clone()
    }

    pub fn nonlinear_cache_dir(&self) -> PathBuf {
        self.config.borrow().nonlinear_cache_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_tabs_in_fixed_order() {
        let titles: Vec<&str> = TabKind::ALL.iter().map(|t| t.title()).collect();
        assert_eq!(
            titles,
            vec![
                "Simulations",
                "Nonlinear time traces",
                "Nonlinear spectra and parallel mode structure",
            ]
        );
        assert_eq!(TabKind::first(), TabKind::Simulations);
    }
}
