use std::cell::RefCell;
use std::rc::Rc;

/// The single progress indicator of a window.
pub type SharedProgress = Rc<RefCell<Progress>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStage {
    #[default]
    Idle,
    Grouping,
    Reading,
    Caching,
    Done,
    Failed,
}

impl LoadStage {
    pub fn label(self) -> &'static str {
        match self {
            LoadStage::Idle => "Idle",
            LoadStage::Grouping => "Grouping input files",
            LoadStage::Reading => "Reading diagnostics",
            LoadStage::Caching => "Writing cache",
            LoadStage::Done => "Done",
            LoadStage::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub stage: LoadStage,
    pub done: usize,
    pub total: usize,
    pub message: Option<String>,
}

impl ProgressEvent {
    pub fn stage(stage: LoadStage, done: usize, total: usize, message: Option<String>) -> Self {
        Self {
            stage,
            done,
            total,
            message,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Progress {
    stage: LoadStage,
    done: usize,
    total: usize,
    message: Option<String>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &ProgressEvent) {
        self.stage = event.stage;
        self.done = event.done.min(event.total);
        self.total = event.total;
        if event.message.is_some() {
            self.message = event.message.clone();
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn stage(&self) -> LoadStage {
        self.stage
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn counts(&self) -> (usize, usize) {
        (self.done, self.total)
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self.stage,
            LoadStage::Grouping | LoadStage::Reading | LoadStage::Caching
        )
    }

    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            return if self.stage == LoadStage::Done { 1.0 } else { 0.0 };
        }
        self.done as f32 / self.total as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_follows_events() {
        let mut progress = Progress::new();
        assert_eq!(progress.fraction(), 0.0);
        assert!(!progress.is_busy());

        progress.apply(&ProgressEvent::stage(LoadStage::Reading, 1, 4, None));
        assert_eq!(progress.fraction(), 0.25);
        assert!(progress.is_busy());

        progress.apply(&ProgressEvent::stage(
            LoadStage::Done,
            0,
            0,
            Some("nothing to load".to_string()),
        ));
        assert_eq!(progress.fraction(), 1.0);
        assert_eq!(progress.message(), Some("nothing to load"));
    }

    #[test]
    fn done_is_clamped_to_total() {
        let mut progress = Progress::new();
        progress.apply(&ProgressEvent::stage(LoadStage::Reading, 7, 3, None));
        assert_eq!(progress.counts(), (3, 3));
    }

    #[test]
    fn message_survives_silent_events() {
        let mut progress = Progress::new();
        progress.apply(&ProgressEvent::stage(
            LoadStage::Reading,
            0,
            2,
            Some("run1".to_string()),
        ));
        progress.apply(&ProgressEvent::stage(LoadStage::Reading, 1, 2, None));
        assert_eq!(progress.message(), Some("run1"));
        progress.reset();
        assert_eq!(progress.stage(), LoadStage::Idle);
    }
}
