//! GPX fixture files on disk.

use std::path::Path;

use itinerary::errors::RouteError;
use itinerary::gpx_parser::parse_gpx_bytes;
use itinerary::models::Trackpoint;
use thiserror::Error;

use crate::gpx::generate_gpx;

#[derive(Debug, Error)]
pub enum GpxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("GPX parse error: {0}")]
    Parse(#[from] RouteError),
}

/// Reads and writes GPX fixtures.
pub struct GpxLoader;

impl GpxLoader {
    /// Loads the track points of a GPX file.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<Trackpoint>, GpxError> {
        let bytes = std::fs::read(path)?;
        Ok(parse_gpx_bytes(&bytes)?)
    }

    /// Writes track points as a single-track GPX 1.1 file, creating parent
    /// directories as needed.
    pub fn write_file(
        path: impl AsRef<Path>,
        points: &[Trackpoint],
        name: &str,
    ) -> Result<(), GpxError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, generate_gpx(points, name))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_load() {
        let points = vec![
            Trackpoint::new(6.2, -73.5, Some(1650.0)),
            Trackpoint::new(6.21, -73.49, None),
        ];

        let temp_path = std::env::temp_dir()
            .join(format!("test-data-{}", std::process::id()))
            .join("etapa-1.gpx");
        GpxLoader::write_file(&temp_path, &points, "Etapa 1").unwrap();

        let loaded = GpxLoader::load_file(&temp_path).unwrap();
        assert_eq!(loaded, points);

        std::fs::remove_file(temp_path).ok();
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            GpxLoader::load_file("/no/such/etapa.gpx"),
            Err(GpxError::Io(_))
        ));
    }
}
