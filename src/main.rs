// src/main.rs

use anyhow::{Context, Result};
use clap::Parser;
use lane_detection::opencv_backend::process_video;
use lane_detection::Config;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lane-detection", about = "Lane Detection System")]
struct Args {
    /// Path to input video file
    #[arg(short, long, value_name = "PATH")]
    input: PathBuf,
    /// Path to output video file
    #[arg(short, long, value_name = "PATH")]
    output: PathBuf,
    /// Show the annotated frames while processing ('q' quits)
    #[arg(short, long)]
    visualize: bool,
    /// Optional YAML configuration; defaults are used when absent
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Write the final statistics as JSON
    #[arg(long, value_name = "PATH")]
    stats_json: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lane_detection={}", config.logging.level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Processing video: {}", args.input.display());
    info!("Output will be saved to: {}", args.output.display());

    let report = match process_video(&args.input, &args.output, args.visualize, config) {
        Ok(report) => report,
        Err(e) => {
            error!("Failed to process video: {}", e);
            return Err(e).context("lane detection run failed");
        }
    };

    if let Some(path) = &args.stats_json {
        let json = serde_json::to_string_pretty(&report.stats.summary())?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write stats to {}", path.display()))?;
        info!("Stats written to {}", path.display());
    }

    info!("Processing complete!");
    Ok(())
}
