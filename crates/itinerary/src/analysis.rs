//! Stage statistics for a directory of GPX files.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::errors::RouteError;
use crate::gpx_parser::parse_gpx_bytes;
use crate::route_metrics::{RouteMetrics, RouteSummary};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", path.display())]
    Route {
        path: PathBuf,
        #[source]
        source: RouteError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageSummary {
    pub file_name: String,
    /// Display name derived from the file stem, e.g. `Etapa 1`.
    pub stage: String,
    #[serde(flatten)]
    pub summary: RouteSummary,
}

pub fn analyze_file(path: impl AsRef<Path>) -> Result<StageSummary, AnalysisError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let route_error = |source: RouteError| AnalysisError::Route {
        path: path.to_path_buf(),
        source,
    };
    let points = parse_gpx_bytes(&bytes).map_err(route_error)?;
    let metrics = RouteMetrics::build(&points).map_err(route_error)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(StageSummary {
        stage: stage_name(&file_name),
        file_name,
        summary: RouteSummary::from_route(&points, &metrics),
    })
}

/// Analyzes every `*.gpx` file in `dir`, in file name order. Files that
/// cannot be parsed are logged and left out.
pub fn analyze_dir(dir: impl AsRef<Path>) -> Result<Vec<StageSummary>, AnalysisError> {
    let dir = dir.as_ref();
    let io_error = |source| AnalysisError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        let is_gpx = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gpx"));
        if is_gpx && path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        warn!("No GPX files found in {}", dir.display());
    }

    let results: Vec<_> = files.par_iter().map(|path| analyze_file(path)).collect();

    let mut stages = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(stage) => {
                info!(
                    "{}: {} km, {} m gain, {} points",
                    stage.file_name,
                    stage.summary.distance_km,
                    stage.summary.elevation_gain_m,
                    stage.summary.trackpoints
                );
                stages.push(stage);
            }
            Err(e) => warn!("Skipping {e}"),
        }
    }

    Ok(stages)
}

/// `etapa-1.gpx` becomes `Etapa 1`, `etapa-4-opcional.gpx` becomes
/// `Etapa 4 opcional`.
pub fn stage_name(file_name: &str) -> String {
    let stem = file_name.split('.').next().unwrap_or(file_name);
    let words = stem.replace(['-', '_'], " ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gpx(elevations: &[f64]) -> String {
        let points: String = elevations
            .iter()
            .enumerate()
            .map(|(i, e)| {
                format!(
                    r#"<trkpt lat="{}" lon="-73.5"><ele>{e}</ele></trkpt>"#,
                    6.0 + i as f64 * 0.01
                )
            })
            .collect();
        format!("<gpx><trk><trkseg>{points}</trkseg></trk></gpx>")
    }

    #[test]
    fn test_stage_name() {
        assert_eq!(stage_name("etapa-1.gpx"), "Etapa 1");
        assert_eq!(stage_name("etapa-4-opcional.gpx"), "Etapa 4 opcional");
        assert_eq!(stage_name("etapa 2.gpx"), "Etapa 2");
        assert_eq!(stage_name(""), "");
    }

    #[test]
    fn test_analyze_dir_sorted_and_skips_bad_files() {
        let dir = std::env::temp_dir().join(format!("itinerary-analysis-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("etapa-2.gpx"), gpx(&[100.0, 150.0, 120.0])).unwrap();
        std::fs::write(dir.join("etapa-1.gpx"), gpx(&[1500.0, 1520.0])).unwrap();
        std::fs::write(dir.join("etapa-3.gpx"), "<gpx></gpx>").unwrap();
        std::fs::write(dir.join("notes.txt"), "not a route").unwrap();

        let stages = analyze_dir(&dir).unwrap();
        let names: Vec<&str> = stages.iter().map(|s| s.file_name.as_str()).collect();
        assert_eq!(names, vec!["etapa-1.gpx", "etapa-2.gpx"]);

        assert_eq!(stages[0].stage, "Etapa 1");
        assert_eq!(stages[0].summary.elevation_gain_m, 20.0);
        assert_eq!(stages[0].summary.trackpoints, 2);
        // 0.01 degrees of latitude per step
        assert_eq!(stages[0].summary.distance_km, 1.1);

        assert_eq!(stages[1].summary.elevation_gain_m, 50.0);
        assert_eq!(stages[1].summary.min_elevation_m, Some(100.0));
        assert_eq!(stages[1].summary.max_elevation_m, Some(150.0));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_analyze_missing_dir() {
        assert!(matches!(
            analyze_dir("/definitely/not/here"),
            Err(AnalysisError::Io { .. })
        ));
    }

    #[test]
    fn test_analyze_file_reports_route_errors() {
        let path = std::env::temp_dir().join(format!("itinerary-empty-{}.gpx", std::process::id()));
        std::fs::write(&path, "<gpx/>").unwrap();

        assert!(matches!(
            analyze_file(&path),
            Err(AnalysisError::Route {
                source: RouteError::EmptyRoute,
                ..
            })
        ));

        std::fs::remove_file(path).ok();
    }
}
