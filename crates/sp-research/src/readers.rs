//! Readers for the reduced ASCII diagnostics stella writes next to each input file.
//!
//! All files are whitespace separated columns; `#` starts a header or comment
//! line and blank lines are skipped.

use crate::types::{FluxTraces, ModeStructure, Simulation, SimulationData, SpeciesFluxes, Spectrum};
use crate::{ResearchError, ResearchResult};
use std::path::{Path, PathBuf};

pub const FLUXES_EXTENSION: &str = "fluxes";
pub const SPECTRUM_EXTENSION: &str = "phi2_vs_kxky";
pub const MODE_STRUCTURE_EXTENSION: &str = "phi_vs_z";

/// Diagnostic extensions, in the order they are read and hashed.
pub const DIAGNOSTIC_EXTENSIONS: [&str; 3] =
    [FLUXES_EXTENSION, SPECTRUM_EXTENSION, MODE_STRUCTURE_EXTENSION];

pub fn diagnostic_path(input_file: &Path, extension: &str) -> PathBuf {
    input_file.with_extension(extension)
}

fn rows(text: &str, path: &Path) -> ResearchResult<Vec<(usize, Vec<f64>)>> {
    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let values = line
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|_| ResearchError::Parse {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    message: format!("not a number: {:?}", token),
                })
            })
            .collect::<ResearchResult<Vec<f64>>>()?;
        out.push((idx + 1, values));
    }
    Ok(out)
}

/// `t pflx_1..pflx_n vflx_1..vflx_n qflx_1..qflx_n`
pub fn parse_fluxes(text: &str, path: &Path) -> ResearchResult<FluxTraces> {
    let rows = rows(text, path)?;
    let n_species = match rows.first() {
        Some((line, values)) => {
            if values.len() < 4 || (values.len() - 1) % 3 != 0 {
                return Err(ResearchError::Parse {
                    path: path.to_path_buf(),
                    line: *line,
                    message: format!(
                        "expected 1 + 3 x species columns, found {}",
                        values.len()
                    ),
                });
            }
            (values.len() - 1) / 3
        }
        None => 0,
    };

    let mut traces = FluxTraces {
        time: Vec::with_capacity(rows.len()),
        species: (0..n_species)
            .map(|_| SpeciesFluxes {
                pflux: Vec::with_capacity(rows.len()),
                vflux: Vec::with_capacity(rows.len()),
                qflux: Vec::with_capacity(rows.len()),
            })
            .collect(),
    };

    for (line, values) in rows {
        if values.len() != 1 + 3 * n_species {
            return Err(ResearchError::Parse {
                path: path.to_path_buf(),
                line,
                message: format!(
                    "expected {} columns, found {}",
                    1 + 3 * n_species,
                    values.len()
                ),
            });
        }
        traces.time.push(values[0]);
        for (s, species) in traces.species.iter_mut().enumerate() {
            species.pflux.push(values[1 + s]);
            species.vflux.push(values[1 + n_species + s]);
            species.qflux.push(values[1 + 2 * n_species + s]);
        }
    }

    Ok(traces)
}

/// `kx ky phi2`, one row per grid point.
pub fn parse_spectrum(text: &str, path: &Path) -> ResearchResult<Spectrum> {
    let rows = rows(text, path)?;
    for (line, values) in &rows {
        if values.len() != 3 {
            return Err(ResearchError::Parse {
                path: path.to_path_buf(),
                line: *line,
                message: format!("expected 3 columns (kx ky phi2), found {}", values.len()),
            });
        }
    }

    let kx = distinct_sorted(rows.iter().map(|(_, v)| v[0]));
    let ky = distinct_sorted(rows.iter().map(|(_, v)| v[1]));
    let mut phi2 = vec![vec![0.0; ky.len()]; kx.len()];
    for (_, values) in &rows {
        if let (Some(ikx), Some(iky)) = (index_of(&kx, values[0]), index_of(&ky, values[1])) {
            phi2[ikx][iky] = values[2];
        }
    }

    Ok(Spectrum { kx, ky, phi2 })
}

/// `z re im` or `z phi2`.
pub fn parse_mode_structure(text: &str, path: &Path) -> ResearchResult<ModeStructure> {
    let rows = rows(text, path)?;
    let mut mode = ModeStructure {
        z: Vec::with_capacity(rows.len()),
        phi2: Vec::with_capacity(rows.len()),
    };
    for (line, values) in rows {
        let phi2 = match values.as_slice() {
            [_, re, im] => re * re + im * im,
            [_, phi2] => *phi2,
            _ => {
                return Err(ResearchError::Parse {
                    path: path.to_path_buf(),
                    line,
                    message: format!("expected 2 or 3 columns, found {}", values.len()),
                });
            }
        };
        mode.z.push(values[0]);
        mode.phi2.push(phi2);
    }
    Ok(mode)
}

fn read_optional(path: &Path) -> ResearchResult<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    std::fs::read_to_string(path)
        .map(Some)
        .map_err(|source| ResearchError::FileRead {
            path: path.to_path_buf(),
            source,
        })
}

/// Read every diagnostic of a simulation, concatenating restarted flux traces.
pub fn read_simulation(simulation: &Simulation) -> ResearchResult<SimulationData> {
    let mut data = SimulationData::default();

    for input_file in &simulation.input_files {
        let path = diagnostic_path(input_file, FLUXES_EXTENSION);
        if let Some(text) = read_optional(&path)? {
            let traces = parse_fluxes(&text, &path)?;
            match data.fluxes.as_mut() {
                Some(existing) if !existing.is_empty() => {
                    if !traces.is_empty() && existing.species.len() != traces.species.len() {
                        return Err(ResearchError::SpeciesMismatch {
                            path,
                            expected: existing.species.len(),
                            found: traces.species.len(),
                        });
                    }
                    existing.append_restart(traces);
                }
                _ => data.fluxes = Some(traces),
            }
        }

        let path = diagnostic_path(input_file, SPECTRUM_EXTENSION);
        if let Some(text) = read_optional(&path)? {
            data.spectrum = Some(parse_spectrum(&text, &path)?);
        }

        let path = diagnostic_path(input_file, MODE_STRUCTURE_EXTENSION);
        if let Some(text) = read_optional(&path)? {
            data.mode_structure = Some(parse_mode_structure(&text, &path)?);
        }
    }

    if data.is_empty() {
        tracing::warn!(simulation = %simulation.id, "no nonlinear diagnostics found");
    }

    Ok(data)
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

fn distinct_sorted(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.dedup_by(|a, b| approx_eq(*a, *b));
    values
}

fn index_of(grid: &[f64], value: f64) -> Option<usize> {
    grid.iter().position(|g| approx_eq(*g, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn here() -> PathBuf {
        PathBuf::from("run.fluxes")
    }

    #[test]
    fn fluxes_split_per_species() {
        let text = "\
# time pflx vflx qflx
0.0  1.0 2.0  3.0 4.0  5.0 6.0
1.0  1.1 2.1  3.1 4.1  5.1 6.1
";
        let traces = parse_fluxes(text, &here()).unwrap();
        assert_eq!(traces.time, vec![0.0, 1.0]);
        assert_eq!(traces.species.len(), 2);
        assert_eq!(traces.species[0].pflux, vec![1.0, 1.1]);
        assert_eq!(traces.species[1].vflux, vec![4.0, 4.1]);
        assert_eq!(traces.species[1].qflux, vec![6.0, 6.1]);
    }

    #[test]
    fn fluxes_reject_bad_column_count() {
        let err = parse_fluxes("0.0 1.0 2.0\n", &here()).unwrap_err();
        assert!(matches!(err, ResearchError::Parse { line: 1, .. }));

        let err = parse_fluxes("0 1 2 3\n1 1 2\n", &here()).unwrap_err();
        assert!(matches!(err, ResearchError::Parse { line: 2, .. }));
    }

    #[test]
    fn fluxes_reject_non_numbers() {
        let err = parse_fluxes("0 1 2 nan?\n", &here()).unwrap_err();
        assert!(err.to_string().contains("not a number"));
    }

    #[test]
    fn spectrum_fills_grid() {
        let text = "\
# kx ky phi2
-0.5 0.0 1.0
0.0  0.0 2.0
0.0  0.5 3.0
-0.5 0.5 4.0
";
        let spectrum = parse_spectrum(text, &here()).unwrap();
        assert_eq!(spectrum.kx, vec![-0.5, 0.0]);
        assert_eq!(spectrum.ky, vec![0.0, 0.5]);
        assert_eq!(spectrum.phi2, vec![vec![1.0, 4.0], vec![2.0, 3.0]]);
    }

    #[test]
    fn spectrum_missing_points_are_zero() {
        let spectrum = parse_spectrum("0 0 1\n1 1 2\n", &here()).unwrap();
        assert_eq!(spectrum.phi2, vec![vec![1.0, 0.0], vec![0.0, 2.0]]);
    }

    #[test]
    fn mode_structure_from_complex_or_squared() {
        let mode = parse_mode_structure("-3.14 3 4\n0 1 0\n", &here()).unwrap();
        assert_eq!(mode.z, vec![-3.14, 0.0]);
        assert_eq!(mode.phi2, vec![25.0, 1.0]);

        let mode = parse_mode_structure("0 0.25\n", &here()).unwrap();
        assert_eq!(mode.phi2, vec![0.25]);

        assert!(parse_mode_structure("0 1 2 3\n", &here()).is_err());
    }
}
