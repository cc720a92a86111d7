use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use itinerary::{
    analysis::analyze_dir, chart::DEFAULT_CHART_CAP, config::AppConfig, pages::process_route,
    run_server,
};
use serde_json::json;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Itinerary route maps and elevation profiles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the site assets and per-day route views (the default)
    Serve {
        #[arg(long, env = "PORT")]
        port: Option<u16>,
        /// Site directory holding `assets/`
        #[arg(long, env = "SITE_DIR")]
        site_dir: Option<PathBuf>,
        /// Itinerary TOML; the built-in table is used otherwise
        #[arg(long, env = "ITINERARY_CONFIG")]
        itinerary: Option<PathBuf>,
    },
    /// Print distance and climbing totals for every GPX file in a directory
    Analyze {
        #[arg(default_value = "routes")]
        dir: PathBuf,
    },
    /// Print the summary and chart series of one GPX file as JSON
    Inspect {
        file: PathBuf,
        #[arg(long, default_value_t = DEFAULT_CHART_CAP)]
        cap: usize,
    },
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        None => run_server(AppConfig::from_env()).await,
        Some(Command::Serve {
            port,
            site_dir,
            itinerary,
        }) => {
            let mut config = AppConfig::from_env();
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(site_dir) = site_dir {
                config.site_dir = site_dir;
            }
            if itinerary.is_some() {
                config.itinerary_path = itinerary;
            }
            run_server(config).await
        }
        Some(Command::Analyze { dir }) => analyze(dir),
        Some(Command::Inspect { file, cap }) => inspect(file, cap),
    }
}

fn analyze(dir: PathBuf) -> anyhow::Result<()> {
    let stages = analyze_dir(&dir)?;

    for stage in &stages {
        let summary = &stage.summary;
        println!("{}:", stage.stage);
        println!("  Distance: {} km", summary.distance_km);
        println!("  Elevation gain: {:.0} m", summary.elevation_gain_m);
        if let Some(min) = summary.min_elevation_m {
            println!("  Min elevation: {min:.0} m");
        }
        if let Some(max) = summary.max_elevation_m {
            println!("  Max elevation: {max:.0} m");
        }
        println!("  Track points: {}", summary.trackpoints);
        println!();
    }

    Ok(())
}

fn inspect(file: PathBuf, cap: usize) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let route = process_route(&text, cap).with_context(|| file.display().to_string())?;

    let output = json!({
        "summary": route.summary,
        "bounds": route.metrics.bounds(),
        "profile": route.profile,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
