//! Plot drawing shared by the tabs, and the pop-out plot windows that have
//! to be closed together with the main window.

use egui_plot::{Legend, Line, LineStyle, Plot, PlotPoints};
use sp_app::export::NamedSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct PlotFigure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<NamedSeries>,
    /// Drawn dashed, e.g. time averages.
    pub overlays: Vec<NamedSeries>,
    /// Plot log10(y); non-positive values are dropped.
    pub log_y: bool,
}

impl PlotFigure {
    pub fn new(title: impl Into<String>, x_label: &str, y_label: &str) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            series: Vec::new(),
            overlays: Vec::new(),
            log_y: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }
}

fn to_log(points: &[[f64; 2]]) -> Vec<[f64; 2]> {
    points
        .iter()
        .filter(|p| p[1] > 0.0)
        .map(|p| [p[0], p[1].log10()])
        .collect()
}

pub fn draw_plot(ui: &mut egui::Ui, id: &str, figure: &PlotFigure) {
    let y_label = if figure.log_y {
        format!("log10 {}", figure.y_label)
    } else {
        figure.y_label.clone()
    };
    let points = |s: &NamedSeries| -> PlotPoints {
        if figure.log_y {
            to_log(&s.points).into()
        } else {
            s.points.clone().into()
        }
    };

    Plot::new(id)
        .legend(Legend::default())
        .x_axis_label(figure.x_label.clone())
        .y_axis_label(y_label)
        .show(ui, |plot_ui| {
            for s in &figure.series {
                plot_ui.line(Line::new(points(s)).name(&s.name));
            }
            for s in &figure.overlays {
                plot_ui.line(
                    Line::new(points(s))
                        .name(&s.name)
                        .style(LineStyle::dashed_loose()),
                );
            }
        });
}

/// Plots popped out of the tabs into their own native windows.
#[derive(Default)]
pub struct PlotSurfaces {
    next: u64,
    open: Vec<(egui::ViewportId, PlotFigure)>,
}

impl PlotSurfaces {
    pub fn pop_out(&mut self, figure: PlotFigure) {
        let id = egui::ViewportId::from_hash_of(("plot_surface", self.next));
        self.next += 1;
        tracing::debug!(title = %figure.title, "opened plot window");
        self.open.push((id, figure));
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// Draw every open plot window; windows whose close button was pressed
    /// are dropped.
    pub fn show(&mut self, ctx: &egui::Context) {
        let mut closed = Vec::new();
        for (id, figure) in &self.open {
            ctx.show_viewport_immediate(
                *id,
                egui::ViewportBuilder::default()
                    .with_title(figure.title.clone())
                    .with_inner_size([720.0, 480.0]),
                |ctx, _class| {
                    egui::CentralPanel::default().show(ctx, |ui| {
                        draw_plot(ui, &format!("{:?}", id), figure);
                    });
                    if ctx.input(|i| i.viewport().close_requested()) {
                        closed.push(*id);
                    }
                },
            );
        }
        self.open.retain(|(id, _)| !closed.contains(id));
    }

    /// Close every plot window. Returns how many were open.
    pub fn close_all(&mut self, ctx: &egui::Context) -> usize {
        let count = self.open.len();
        for (id, _) in self.open.drain(..) {
            ctx.send_viewport_cmd_to(id, egui::ViewportCommand::Close);
        }
        if count > 0 {
            tracing::info!(count, "closed plot windows");
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn figure(title: &str) -> PlotFigure {
        let mut figure = PlotFigure::new(title, "t", "Q");
        figure.series.push(NamedSeries {
            name: "run".to_string(),
            points: vec![[0.0, 1.0], [1.0, 2.0]],
        });
        figure
    }

    #[test]
    fn close_all_empties_surfaces() {
        let ctx = egui::Context::default();
        let mut surfaces = PlotSurfaces::default();
        surfaces.pop_out(figure("a"));
        surfaces.pop_out(figure("b"));
        assert_eq!(surfaces.len(), 2);
        assert_eq!(surfaces.close_all(&ctx), 2);
        assert!(surfaces.is_empty());
        assert_eq!(surfaces.close_all(&ctx), 0);
    }

    #[test]
    fn log_drops_non_positive_values() {
        let points = to_log(&[[0.0, 0.0], [1.0, 100.0], [2.0, -1.0]]);
        assert_eq!(points, vec![[1.0, 2.0]]);
    }

    #[test]
    fn empty_figure() {
        assert!(PlotFigure::new("x", "t", "Q").is_empty());
        assert!(!figure("a").is_empty());
    }
}
