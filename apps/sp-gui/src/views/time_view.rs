//! "Nonlinear time traces" tab: flux traces of every loaded simulation with
//! their saturated (time averaged) values.

use crate::plot_surfaces::{PlotFigure, draw_plot};
use crate::views::{Status, ViewAction, status_label};
use egui_extras::{Column, TableBuilder};
use sp_app::TabContext;
use sp_app::export::{NamedSeries, export_series_csv};
use sp_app::query::{
    FluxQuantity, averaging_start, flux_series, saturated_fluxes, species_count, time_average,
};
use sp_research::SimulationId;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Selection {
    revision: u64,
    quantity: FluxQuantity,
    species: usize,
    fraction: f64,
    show_averages: bool,
}

struct Computed {
    selection: Selection,
    plot: PlotFigure,
    saturated: Vec<(SimulationId, Option<f64>)>,
    species: usize,
}

pub struct TimeTracesView {
    ctx: TabContext,
    quantity: FluxQuantity,
    species: usize,
    fraction: f64,
    show_averages: bool,
    computed: Option<Computed>,
    status: Status,
}

impl TimeTracesView {
    pub fn new(ctx: TabContext) -> Self {
        Self {
            ctx,
            quantity: FluxQuantity::default(),
            species: 0,
            fraction: 0.5,
            show_averages: true,
            computed: None,
            status: None,
        }
    }

    fn selection(&self) -> Selection {
        Selection {
            revision: self.ctx.research.borrow().revision(),
            quantity: self.quantity,
            species: self.species,
            fraction: self.fraction,
            show_averages: self.show_averages,
        }
    }

    /// Recompute only when the research or the controls changed.
    fn refresh(&mut self) {
        let selection = self.selection();
        if self
            .computed
            .as_ref()
            .is_some_and(|c| c.selection == selection)
        {
            return;
        }

        let research = self.ctx.research.borrow();
        let mut plot = PlotFigure::new(
            format!("{} (species {})", self.quantity.label(), self.species + 1),
            "t",
            self.quantity.label(),
        );
        for simulation in research.simulations() {
            let Some(traces) = research
                .data_for(&simulation.id)
                .and_then(|d| d.fluxes.as_ref())
            else {
                continue;
            };
            let Ok(points) = flux_series(traces, self.quantity, self.species) else {
                continue;
            };
            if self.show_averages
                && let (Some(start), Some(last)) =
                    (averaging_start(&points, self.fraction), points.last())
                && let Some(avg) = time_average(&points, start)
            {
                plot.overlays.push(NamedSeries {
                    name: format!("{} (average)", simulation.id),
                    points: vec![[start, avg], [last[0], avg]],
                });
            }
            plot.series.push(NamedSeries {
                name: simulation.id.to_string(),
                points,
            });
        }

        let saturated = saturated_fluxes(&research, self.quantity, self.species, self.fraction);
        let species = species_count(&research);
        drop(research);

        self.computed = Some(Computed {
            selection,
            plot,
            saturated,
            species,
        });
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> ViewAction {
        self.refresh();
        let mut action = ViewAction::None;
        let Some(computed) = self.computed.as_ref() else {
            return action;
        };
        let species_total = computed.species;
        if species_total > 0 && self.species >= species_total {
            self.species = 0;
        }

        ui.horizontal(|ui| {
            ui.label("Quantity:");
            for quantity in FluxQuantity::ALL {
                ui.selectable_value(&mut self.quantity, quantity, quantity.label());
            }
            ui.separator();
            ui.label("Species:");
            egui::ComboBox::from_id_salt("time_species")
                .selected_text(format!("{}", self.species + 1))
                .show_ui(ui, |ui| {
                    for s in 0..species_total.max(1) {
                        ui.selectable_value(&mut self.species, s, format!("{}", s + 1));
                    }
                });
        });
        ui.horizontal(|ui| {
            ui.checkbox(&mut self.show_averages, "Show averages");
            ui.add(
                egui::Slider::new(&mut self.fraction, 0.0..=0.95)
                    .text("average from t/t_last"),
            );
            ui.separator();
            if ui.button("Pop out").clicked() && !computed.plot.is_empty() {
                action = ViewAction::PopOut(computed.plot.clone());
            }
            if ui.button("Export CSV").clicked() {
                let stem = format!("time_traces_{}_species{}", self.quantity.short(), self.species + 1);
                self.status = Some(
                    match export_series_csv(
                        &self.ctx.figures_dir(),
                        &stem,
                        &computed.plot.x_label,
                        &computed.plot.y_label,
                        &computed.plot.series,
                    ) {
                        Ok(path) => Ok(format!("Exported {}", path.display())),
                        Err(e) => Err(e.to_string()),
                    },
                );
            }
        });
        status_label(ui, &self.status);
        ui.separator();

        if computed.plot.is_empty() {
            ui.label("No flux traces loaded");
            return action;
        }

        let table_height = 160.0;
        let plot_height = (ui.available_height() - table_height).max(200.0);
        ui.allocate_ui(egui::vec2(ui.available_width(), plot_height), |ui| {
            draw_plot(ui, "time_traces_plot", &computed.plot);
        });

        ui.separator();
        ui.strong(format!("Saturated {}", self.quantity.label().to_lowercase()));
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .column(Column::initial(320.0))
            .column(Column::remainder())
            .header(22.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Simulation");
                });
                header.col(|ui| {
                    ui.strong(self.quantity.short());
                });
            })
            .body(|mut body| {
                for (id, value) in &computed.saturated {
                    body.row(22.0, |mut row| {
                        row.col(|ui| {
                            ui.label(id.as_str());
                        });
                        row.col(|ui| {
                            match value {
                                Some(v) => ui.monospace(format!("{:.4e}", v)),
                                None => ui.weak("-"),
                            };
                        });
                    });
                }
            });

        action
    }
}
