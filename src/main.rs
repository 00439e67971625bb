//! Car Drive headless driver
//!
//! Runs a seeded random agent against the simulation, resetting whenever an
//! episode ends, and logs progress. Set `RUST_LOG=info` (or `debug`) to see it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use car_drive::leaderboard::EpisodeEntry;
use car_drive::sim::{Action, Simulation};
use car_drive::{EnvConfig, Leaderboard};

/// Discrete actions sampled by the random agent (no explicit no-op)
const AGENT_ACTIONS: usize = 4;
/// Log the running reward every this many steps
const LOG_EVERY: u64 = 10;

#[derive(Parser, Debug)]
#[command(
    name = "car-drive",
    version,
    about = "Drive a seeded random agent through the Car Drive sandbox"
)]
struct Cli {
    /// Number of simulation steps to run.
    #[arg(long, default_value_t = 1000)]
    steps: u64,

    /// Seed for the agent's action stream.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Environment config (JSON). The built-in track is used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Leaderboard file to load, update and save.
    #[arg(long)]
    leaderboard: Option<PathBuf>,

    /// Print the final render snapshot as JSON.
    #[arg(long)]
    snapshot: bool,
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => EnvConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EnvConfig::default(),
    };
    let mut board = match &cli.leaderboard {
        Some(path) => Leaderboard::load(path)
            .with_context(|| format!("loading leaderboard {}", path.display()))?,
        None => Leaderboard::new(),
    };

    let mut sim = Simulation::new(&config).context("building simulation")?;
    let mut rng = Pcg32::seed_from_u64(cli.seed);
    sim.reset();

    for i in 0..cli.steps {
        let action = Action::Discrete(rng.random_range(0..AGENT_ACTIONS));
        let outcome = sim.step(action)?;

        if outcome.done {
            let entry = EpisodeEntry {
                total_reward: outcome.reward,
                steps: sim.state().vehicle.age,
                episode: sim.episode(),
                seed: cli.seed,
            };
            if let Some(rank) = board.record(entry) {
                log::info!("Episode {} placed #{} ({:.2})", sim.episode(), rank, outcome.reward);
            }
            sim.reset();
        }
        if i % LOG_EVERY == 0 {
            log::info!("step {}: reward {:.2}", i, sim.state().vehicle.reward);
        }
    }

    log::info!(
        "Finished {} steps over {} episodes, current reward {:.2}",
        cli.steps,
        sim.episode(),
        sim.state().vehicle.reward
    );

    if cli.snapshot {
        println!("{}", serde_json::to_string_pretty(&sim.snapshot())?);
    }
    if let Some(path) = &cli.leaderboard {
        board
            .save(path)
            .with_context(|| format!("saving leaderboard {}", path.display()))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    log::info!("Car Drive starting ({:?})", cli);

    run(&cli).inspect_err(|e| log::error!("{e:#}"))
}
