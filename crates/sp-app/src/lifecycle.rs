//! Window lifecycle.
//!
//! ```text
//! Building -> Populated -> Shown -> Running -> ClosingCleanup -> Terminated
//!                                  (close from any live phase) ^
//! ```

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellPhase {
    /// Window exists but is hidden while tabs are constructed.
    Building,
    /// Tabs constructed, window still hidden.
    Populated,
    /// Window visible; its geometry is known from the next frame on.
    Shown,
    /// Preference affordance attached, first tab selected.
    Running,
    ClosingCleanup,
    Terminated,
}

impl ShellPhase {
    pub fn name(self) -> &'static str {
        match self {
            ShellPhase::Building => "Building",
            ShellPhase::Populated => "Populated",
            ShellPhase::Shown => "Shown",
            ShellPhase::Running => "Running",
            ShellPhase::ClosingCleanup => "ClosingCleanup",
            ShellPhase::Terminated => "Terminated",
        }
    }

    pub fn is_visible(self) -> bool {
        matches!(self, ShellPhase::Shown | ShellPhase::Running)
    }
}

#[derive(Debug, Clone)]
pub struct ShellLifecycle {
    phase: ShellPhase,
}

impl Default for ShellLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellLifecycle {
    pub fn new() -> Self {
        Self {
            phase: ShellPhase::Building,
        }
    }

    pub fn phase(&self) -> ShellPhase {
        self.phase
    }

    fn advance(&mut self, from: ShellPhase, to: ShellPhase) -> AppResult<()> {
        if self.phase != from {
            return Err(AppError::Lifecycle {
                from: self.phase.name(),
                to: to.name(),
            });
        }
        tracing::debug!(from = from.name(), to = to.name(), "window lifecycle");
        self.phase = to;
        Ok(())
    }

    pub fn mark_populated(&mut self) -> AppResult<()> {
        self.advance(ShellPhase::Building, ShellPhase::Populated)
    }

    pub fn mark_shown(&mut self) -> AppResult<()> {
        self.advance(ShellPhase::Populated, ShellPhase::Shown)
    }

    /// The preference affordance is placed from rendered geometry, so it may
    /// only be attached once the window has been shown.
    pub fn attach_preferences(&mut self) -> AppResult<()> {
        self.advance(ShellPhase::Shown, ShellPhase::Running)
    }

    /// Returns true when the caller must run the cleanup sequence.
    pub fn request_close(&mut self) -> bool {
        match self.phase {
            ShellPhase::ClosingCleanup | ShellPhase::Terminated => false,
            _ => {
                tracing::info!(from = self.phase.name(), "close requested");
                self.phase = ShellPhase::ClosingCleanup;
                true
            }
        }
    }

    pub fn finish_close(&mut self) -> AppResult<()> {
        self.advance(ShellPhase::ClosingCleanup, ShellPhase::Terminated)
    }

    pub fn is_closing(&self) -> bool {
        matches!(
            self.phase,
            ShellPhase::ClosingCleanup | ShellPhase::Terminated
        )
    }
}
