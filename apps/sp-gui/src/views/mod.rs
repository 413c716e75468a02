pub mod selection_view;
pub mod spatial_view;
pub mod time_view;

use crate::plot_surfaces::PlotFigure;

pub use selection_view::SelectionView;
pub use spatial_view::SpatialTab;
pub use time_view::TimeTracesView;

/// Requests a tab hands back to the window after drawing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewAction {
    #[default]
    None,
    PopOut(PlotFigure),
}

/// Outcome of the last user action of a tab; errors are drawn in red.
pub type Status = Option<Result<String, String>>;

pub fn status_label(ui: &mut egui::Ui, status: &Status) {
    match status {
        Some(Ok(message)) => {
            ui.label(message);
        }
        Some(Err(message)) => {
            ui.colored_label(ui.visuals().error_fg_color, message);
        }
        None => {}
    }
}
