//! Track geometry sources.
//!
//! - [`ProceduralGenerator`]: synthetic routes with configurable spacing and noise
//! - [`GpxLoader`]: existing GPX files on disk

mod gpx_files;
mod procedural;

pub use gpx_files::GpxLoader;
pub use procedural::{ProceduralGenerator, RouteConfig};
