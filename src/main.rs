use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::info;
use ring_traffic::{Simulation, SimulationParameters, Summary};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "ring-traffic")]
#[command(about = "Stop-and-go traffic waves on a ring road")]
struct Cli {
    /// Scenario preset to run (stop-and-go or long-stop)
    #[arg(long, default_value = "stop-and-go")]
    preset: String,

    /// JSON file of simulation parameters; missing fields fall back to the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated time to run for, in seconds
    #[arg(long, default_value_t = 1200.0)]
    duration: f64,

    /// Log a summary every this many steps
    #[arg(long, default_value_t = 200)]
    every: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let params = match &cli.config {
        Some(path) => load_params(path)?,
        None => SimulationParameters::preset(&cli.preset)
            .ok_or_else(|| anyhow!("unknown preset {:?}", cli.preset))?,
    };
    let mut sim = Simulation::new(params).context("invalid simulation parameters")?;

    info!(
        "Simulating {} vehicles on a {} m ring for {} s",
        params.vehicle_count, params.circumference, cli.duration
    );
    info!(
        "Leader stops at {} s and every {} s after",
        params.first_stop_time, params.repeat_interval
    );

    let every = cli.every.max(1);
    let start = Instant::now();
    while sim.time() < cli.duration {
        sim.advance();
        if sim.frame() % every == 0 {
            info!("{}", Summary::of(sim.state(), sim.params()));
        }
    }

    info!("=== SIMULATION COMPLETE ===");
    info!("{}", Summary::of(sim.state(), sim.params()));
    info!(
        "{} frames in {:?} ({:?} per frame)",
        sim.frame(),
        start.elapsed(),
        start.elapsed().div_f64(sim.frame().max(1) as f64)
    );
    Ok(())
}

/// Reads simulation parameters from a JSON file.
fn load_params(path: &Path) -> Result<SimulationParameters> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}
