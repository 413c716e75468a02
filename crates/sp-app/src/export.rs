//! CSV export of plotted series into the figure directory.

use crate::error::{AppError, AppResult};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct NamedSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

pub fn series_to_csv(x_label: &str, y_label: &str, series: &[NamedSeries]) -> String {
    let mut csv = format!("series,{},{}\n", csv_field(x_label), csv_field(y_label));
    for s in series {
        let name = csv_field(&s.name);
        for [x, y] in &s.points {
            csv.push_str(&format!("{},{},{}\n", name, x, y));
        }
    }
    csv
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Write `<dir>/<stem>.csv`, creating `dir` if needed.
pub fn export_series_csv(
    dir: &Path,
    stem: &str,
    x_label: &str,
    y_label: &str,
    series: &[NamedSeries],
) -> AppResult<PathBuf> {
    if series.iter().all(|s| s.points.is_empty()) {
        return Err(AppError::InvalidInput("Nothing to export".to_string()));
    }
    let file_name: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    std::fs::create_dir_all(dir).map_err(|source| AppError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(format!("{}.csv", file_name));
    std::fs::write(&path, series_to_csv(x_label, y_label, series))?;
    tracing::info!(path = %path.display(), "exported series");
    Ok(path)
}
