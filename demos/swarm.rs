use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use waypath_demos::{Swarm, SwarmConfig};

#[derive(Parser, Debug)]
#[command(version, about = "Agents routing across a lattice, a few paths per tick")]
struct Cli {
    /// JSON file with swarm settings. Flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,

    /// Number of agents.
    #[arg(long)]
    agents: Option<usize>,

    /// Number of ticks to simulate.
    #[arg(long)]
    ticks: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,

    /// Paths computed per batch.
    #[arg(long)]
    per_tick: Option<u32>,

    /// Ticks between batches.
    #[arg(long)]
    interval: Option<u32>,

    /// Print the effective settings as JSON and exit.
    #[arg(long)]
    dump_config: bool,
}

impl Cli {
    fn apply(&self, config: &mut SwarmConfig) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(agents) = self.agents {
            config.agents = agents;
        }
        if let Some(ticks) = self.ticks {
            config.ticks = ticks;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(n) = self.per_tick {
            config.scheduler.computations_per_tick = n;
        }
        if let Some(n) = self.interval {
            config.scheduler.ticks_between_batches = n;
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SwarmConfig::load(path)?,
        None => SwarmConfig::default(),
    };
    cli.apply(&mut config);

    if cli.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let mut swarm = Swarm::new(config)?;
    let stats = swarm.run();
    log::info!(
        "{} ticks: {} requested, {} found, {} failed, {} pending, {} batches",
        stats.ticks,
        stats.requested,
        stats.succeeded,
        stats.failed,
        swarm.pending(),
        stats.batches
    );
    log::info!(
        "{} steps walked, {} routes dropped, {} ticks paused",
        stats.steps,
        stats.rerouted,
        stats.paused_ticks
    );
    Ok(())
}
