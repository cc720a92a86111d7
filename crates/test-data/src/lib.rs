//! Synthetic GPX stages for itinerary tests and demo sites.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use rand::SeedableRng;
//! use test_data::prelude::*;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let points = ProceduralGenerator::new(42)
//!     .with_start(6.2, -73.5)
//!     .generate(45_000.0, &mut rng);
//! GpxLoader::write_file("site/assets/routes/etapa-1.gpx", &points, "Etapa 1")?;
//! ```

pub mod config;
pub mod gpx;
pub mod sources;
pub mod terrain;

pub use itinerary::models::Trackpoint;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::Trackpoint;
    pub use crate::config::{BoundingBox, Region};
    pub use crate::gpx::generate_gpx;
    pub use crate::sources::{GpxLoader, ProceduralGenerator, RouteConfig};
    pub use crate::terrain::ElevationGenerator;
}
