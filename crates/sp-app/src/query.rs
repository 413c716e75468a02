//! Query helpers turning loaded simulation data into plot series.

use sp_research::{FluxTraces, ModeStructure, Research, SimulationData, SimulationId, Spectrum};

use crate::error::{AppError, AppResult};

pub type Series = Vec<[f64; 2]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FluxQuantity {
    Pflux,
    Vflux,
    #[default]
    Qflux,
}

impl FluxQuantity {
    pub const ALL: [FluxQuantity; 3] = [FluxQuantity::Pflux, FluxQuantity::Vflux, FluxQuantity::Qflux];

    pub fn label(self) -> &'static str {
        match self {
            FluxQuantity::Pflux => "Particle flux",
            FluxQuantity::Vflux => "Momentum flux",
            FluxQuantity::Qflux => "Heat flux",
        }
    }

    pub fn short(self) -> &'static str {
        match self {
            FluxQuantity::Pflux => "pflux",
            FluxQuantity::Vflux => "vflux",
            FluxQuantity::Qflux => "qflux",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpatialView {
    PhiVsKx,
    #[default]
    PhiVsKy,
    ModeStructure,
}

impl SpatialView {
    pub const ALL: [SpatialView; 3] = [
        SpatialView::PhiVsKx,
        SpatialView::PhiVsKy,
        SpatialView::ModeStructure,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SpatialView::PhiVsKx => "|phi|² vs kx",
            SpatialView::PhiVsKy => "|phi|² vs ky",
            SpatialView::ModeStructure => "Parallel mode structure",
        }
    }

    pub fn x_label(self) -> &'static str {
        match self {
            SpatialView::PhiVsKx => "kx rho_i",
            SpatialView::PhiVsKy => "ky rho_i",
            SpatialView::ModeStructure => "z",
        }
    }

    pub fn y_label(self) -> &'static str {
        match self {
            SpatialView::PhiVsKx | SpatialView::PhiVsKy => "|phi|²",
            SpatialView::ModeStructure => "|phi|² (z)",
        }
    }
}

/// Flux of one species against time.
pub fn flux_series(traces: &FluxTraces, quantity: FluxQuantity, species: usize) -> AppResult<Series> {
    let fluxes = traces.species.get(species).ok_or_else(|| {
        AppError::InvalidInput(format!(
            "Species {} out of range ({} species)",
            species,
            traces.species.len()
        ))
    })?;
    let values = match quantity {
        FluxQuantity::Pflux => &fluxes.pflux,
        FluxQuantity::Vflux => &fluxes.vflux,
        FluxQuantity::Qflux => &fluxes.qflux,
    };
    Ok(traces
        .time
        .iter()
        .zip(values)
        .map(|(t, v)| [*t, *v])
        .collect())
}

/// Start of the averaging window: a fraction of the last time in the series.
pub fn averaging_start(points: &[[f64; 2]], fraction: f64) -> Option<f64> {
    points.last().map(|p| p[0] * fraction.clamp(0.0, 1.0))
}

/// Trapezoidal time average over `t >= t_start`.
pub fn time_average(points: &[[f64; 2]], t_start: f64) -> Option<f64> {
    let window: Vec<[f64; 2]> = points.iter().copied().filter(|p| p[0] >= t_start).collect();
    match window.as_slice() {
        [] => None,
        [only] => Some(only[1]),
        [first, .., last] => {
            let span = last[0] - first[0];
            if span <= 0.0 {
                let sum: f64 = window.iter().map(|p| p[1]).sum();
                return Some(sum / window.len() as f64);
            }
            let integral: f64 = window
                .windows(2)
                .map(|w| 0.5 * (w[0][1] + w[1][1]) * (w[1][0] - w[0][0]))
                .sum();
            Some(integral / span)
        }
    }
}

/// Saturated flux of every loaded simulation, in experiment order.
pub fn saturated_fluxes(
    research: &Research,
    quantity: FluxQuantity,
    species: usize,
    fraction: f64,
) -> Vec<(SimulationId, Option<f64>)> {
    research
        .simulations()
        .filter_map(|simulation| {
            let traces = research.data_for(&simulation.id)?.fluxes.as_ref()?;
            let series = flux_series(traces, quantity, species).ok();
            let value = series.and_then(|s| {
                let start = averaging_start(&s, fraction)?;
                time_average(&s, start)
            });
            Some((simulation.id.clone(), value))
        })
        .collect()
}

/// Largest species count among the loaded simulations.
pub fn species_count(research: &Research) -> usize {
    research
        .data()
        .values()
        .filter_map(|d| d.fluxes.as_ref())
        .map(|f| f.species.len())
        .max()
        .unwrap_or(0)
}

pub fn spectrum_vs_kx(spectrum: &Spectrum) -> Series {
    spectrum
        .kx
        .iter()
        .zip(&spectrum.phi2)
        .map(|(kx, row)| [*kx, row.iter().sum()])
        .collect()
}

pub fn spectrum_vs_ky(spectrum: &Spectrum) -> Series {
    spectrum
        .ky
        .iter()
        .enumerate()
        .map(|(iky, ky)| [*ky, spectrum.phi2.iter().filter_map(|row| row.get(iky)).sum()])
        .collect()
}

pub fn mode_structure_series(mode: &ModeStructure) -> Series {
    mode.z.iter().zip(&mode.phi2).map(|(z, p)| [*z, *p]).collect()
}

/// Scale so the largest absolute value is 1; an all-zero series is returned as is.
pub fn normalize_to_max(mut series: Series) -> Series {
    let max = series.iter().map(|p| p[1].abs()).fold(0.0_f64, f64::max);
    if max > 0.0 {
        for p in &mut series {
            p[1] /= max;
        }
    }
    series
}

pub fn spatial_series(data: &SimulationData, view: SpatialView, normalize: bool) -> Option<Series> {
    let series = match view {
        SpatialView::PhiVsKx => spectrum_vs_kx(data.spectrum.as_ref()?),
        SpatialView::PhiVsKy => spectrum_vs_ky(data.spectrum.as_ref()?),
        SpatialView::ModeStructure => mode_structure_series(data.mode_structure.as_ref()?),
    };
    Some(if normalize { normalize_to_max(series) } else { series })
}
