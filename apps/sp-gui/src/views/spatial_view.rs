//! "Nonlinear spectra and parallel mode structure" tab.

use crate::plot_surfaces::{PlotFigure, draw_plot};
use crate::views::{Status, ViewAction, status_label};
use sp_app::TabContext;
use sp_app::export::{NamedSeries, export_series_csv};
use sp_app::query::{SpatialView, spatial_series};

pub struct SpatialTab {
    ctx: TabContext,
    view: SpatialView,
    normalize: bool,
    log_y: bool,
    cached: Option<(u64, SpatialView, bool, PlotFigure)>,
    status: Status,
}

impl SpatialTab {
    pub fn new(ctx: TabContext) -> Self {
        Self {
            ctx,
            view: SpatialView::default(),
            normalize: false,
            log_y: true,
            cached: None,
            status: None,
        }
    }

    fn plot(&mut self) -> PlotFigure {
        let revision = self.ctx.research.borrow().revision();
        if let Some((rev, view, normalize, figure)) = &self.cached
            && *rev == revision
            && *view == self.view
            && *normalize == self.normalize
        {
            let mut figure = figure.clone();
            figure.log_y = self.log_y;
            return figure;
        }

        let research = self.ctx.research.borrow();
        let mut figure = PlotFigure::new(self.view.label(), self.view.x_label(), self.view.y_label());
        for simulation in research.simulations() {
            if let Some(points) = research
                .data_for(&simulation.id)
                .and_then(|data| spatial_series(data, self.view, self.normalize))
            {
                figure.series.push(NamedSeries {
                    name: simulation.id.to_string(),
                    points,
                });
            }
        }
        drop(research);

        self.cached = Some((revision, self.view, self.normalize, figure.clone()));
        figure.log_y = self.log_y;
        figure
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> ViewAction {
        let mut action = ViewAction::None;

        ui.horizontal(|ui| {
            for view in SpatialView::ALL {
                ui.selectable_value(&mut self.view, view, view.label());
            }
            ui.separator();
            ui.checkbox(&mut self.normalize, "Normalize");
            ui.checkbox(&mut self.log_y, "Log scale");
        });

        let figure = self.plot();

        ui.horizontal(|ui| {
            if ui.button("Pop out").clicked() && !figure.is_empty() {
                action = ViewAction::PopOut(figure.clone());
            }
            if ui.button("Export CSV").clicked() {
                let stem = match self.view {
                    SpatialView::PhiVsKx => "phi2_vs_kx",
                    SpatialView::PhiVsKy => "phi2_vs_ky",
                    SpatialView::ModeStructure => "phi2_vs_z",
                };
                self.status = Some(
                    match export_series_csv(
                        &self.ctx.figures_dir(),
                        stem,
                        &figure.x_label,
                        &figure.y_label,
                        &figure.series,
                    ) {
                        Ok(path) => Ok(format!("Exported {}", path.display())),
                        Err(e) => Err(e.to_string()),
                    },
                );
            }
        });
        status_label(ui, &self.status);
        ui.separator();

        if figure.is_empty() {
            ui.label(match self.view {
                SpatialView::ModeStructure => "No parallel mode structure loaded",
                _ => "No spectra loaded",
            });
        } else {
            draw_plot(ui, "spatial_plot", &figure);
        }

        action
    }
}
