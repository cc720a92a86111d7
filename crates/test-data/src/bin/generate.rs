//! Writes a demo site's stage GPX files.
//!
//! Run with:
//! ```
//! cargo run -p test-data --bin generate -- --out site/assets/routes
//! ```

use std::path::PathBuf;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use test_data::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Generate synthetic stage GPX files")]
struct Args {
    /// Output directory
    #[arg(long, default_value = "site/assets/routes")]
    out: PathBuf,

    /// Seed for reproducible routes
    #[arg(long, default_value_t = 12345)]
    seed: u64,
}

/// (file stem, distance in meters, start)
const STAGES: [(&str, f64, (f64, f64)); 4] = [
    ("etapa-1", 42_000.0, (6.20, -73.50)),
    ("etapa-2", 55_000.0, (5.95, -73.55)),
    ("etapa-3", 38_000.0, (5.70, -73.40)),
    ("etapa-4-opcional", 25_000.0, (5.55, -73.60)),
];

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);

    for (i, (stem, distance, (lat, lon))) in STAGES.iter().enumerate() {
        let generator = ProceduralGenerator::for_region(
            Region::BOYACA,
            ElevationGenerator::andes((args.seed as u32).wrapping_add(i as u32)),
        )
        .with_start(*lat, *lon);

        let points = generator.generate(*distance, &mut rng);
        let path = args.out.join(format!("{stem}.gpx"));
        GpxLoader::write_file(&path, &points, &format!("Etapa {}", i + 1))?;

        tracing::info!("Wrote {} ({} points)", path.display(), points.len());
    }

    Ok(())
}
