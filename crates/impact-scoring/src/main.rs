//! CME Simulation CLI
//!
//! Runs the what-if CME scoring over a cable GeoJSON file.
//!
//! Usage:
//!   simulate-cme --cables data/cable_geo.geojson \
//!                --speed 1200 --lon -30 --lat 45 \
//!                --output simulation.json

use anyhow::Result;
use cable_atlas::loader;
use chrono::{DateTime, Utc};
use clap::Parser;
use impact_scoring::{run_simulation, CmeParameters};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "simulate-cme",
    about = "Score submarine cables against a hypothetical coronal mass ejection"
)]
struct Args {
    /// Path to cable GeoJSON file
    #[arg(short, long)]
    cables: PathBuf,

    /// CME speed in km/s (expected range 400-3000)
    #[arg(short, long)]
    speed: f64,

    /// Launch direction longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// Launch direction latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// CME start time (RFC 3339); defaults to now
    #[arg(long)]
    start: Option<DateTime<Utc>>,

    /// Output JSON file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cables = loader::load_cables_from_file(&args.cables)?;

    let params = CmeParameters {
        start_time: args.start.unwrap_or_else(Utc::now),
        speed: args.speed,
        direction_longitude: args.lon,
        direction_latitude: args.lat,
    };

    let outcome = run_simulation(&params, &cables)?;

    info!("CME arrival: {}", outcome.arrival_time);
    info!("Top 10 cables by impact score:");
    for p in outcome.predictions.iter().take(10) {
        info!(
            "  {:.3} | {:40} | {:?}",
            p.impact_score,
            &p.cable_name[..p.cable_name.len().min(40)],
            p.risk_level
        );
    }

    match &args.output {
        Some(path) => {
            info!("Writing output to {:?}", path);
            let file = File::create(path)?;
            serde_json::to_writer_pretty(BufWriter::new(file), &outcome)?;
        }
        None => println!("{}", serde_json::to_string_pretty(&outcome)?),
    }

    Ok(())
}
