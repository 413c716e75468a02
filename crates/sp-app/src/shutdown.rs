//! Close-time cleanup of the window.
//!
//! Two global resources outlive individual widgets: the window's event
//! dispatcher and the plot surfaces. On the close signal all three steps
//! are attempted in order, each on its own, so a failing or panicking step
//! never leaves the later ones undone.

use crate::error::{AppError, AppResult};
use std::panic::{AssertUnwindSafe, catch_unwind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownStep {
    StopDispatcher,
    ReleaseWindow,
    ClosePlotSurfaces,
}

impl ShutdownStep {
    pub const ORDER: [ShutdownStep; 3] = [
        ShutdownStep::StopDispatcher,
        ShutdownStep::ReleaseWindow,
        ShutdownStep::ClosePlotSurfaces,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShutdownStep::StopDispatcher => "stop event loop",
            ShutdownStep::ReleaseWindow => "release window",
            ShutdownStep::ClosePlotSurfaces => "close plot surfaces",
        }
    }
}

pub trait ShellResources {
    fn stop_dispatcher(&mut self) -> AppResult<()>;
    fn release_window(&mut self) -> AppResult<()>;
    fn close_plot_surfaces(&mut self) -> AppResult<()>;
}

#[derive(Debug, Clone, Default)]
pub struct ShutdownReport {
    pub completed: Vec<ShutdownStep>,
    pub failed: Vec<(ShutdownStep, String)>,
}

impl ShutdownReport {
    pub fn attempted(&self) -> usize {
        self.completed.len() + self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn errors(&self) -> Vec<AppError> {
        self.failed
            .iter()
            .map(|(step, message)| AppError::Cleanup {
                step: step.name(),
                message: message.clone(),
            })
            .collect()
    }
}

pub fn run_shutdown<R: ShellResources + ?Sized>(resources: &mut R) -> ShutdownReport {
    let mut report = ShutdownReport::default();

    for step in ShutdownStep::ORDER {
        let outcome = catch_unwind(AssertUnwindSafe(|| match step {
            ShutdownStep::StopDispatcher => resources.stop_dispatcher(),
            ShutdownStep::ReleaseWindow => resources.release_window(),
            ShutdownStep::ClosePlotSurfaces => resources.close_plot_surfaces(),
        }));

        match outcome {
            Ok(Ok(())) => report.completed.push(step),
            Ok(Err(e)) => {
                tracing::warn!(step = step.name(), "cleanup step failed: {}", e);
                report.failed.push((step, e.to_string()));
            }
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "panic".to_string());
                tracing::warn!(step = step.name(), "cleanup step panicked: {}", message);
                report.failed.push((step, message));
            }
        }
    }

    tracing::info!(
        completed = report.completed.len(),
        failed = report.failed.len(),
        "shutdown finished"
    );
    report
}
