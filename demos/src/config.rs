use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use waypath_paths::SearchOptions;
use waypath_sched::{ConfigError, SchedulerConfig};

/// Settings of a swarm run. Every field has a default, so a config file
/// only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    pub width: usize,
    pub height: usize,
    /// Probability of a cell starting blocked.
    pub obstacle_ratio: f64,
    pub agents: usize,
    pub ticks: u32,
    pub seed: u64,
    /// Every this many ticks a random cell flips between open and blocked.
    /// Zero disables it.
    pub toggle_every: u32,
    /// Ticks `[from, until)` during which the scheduler is paused.
    pub pause: Option<(u32, u32)>,
    pub scheduler: SchedulerConfig,
    pub search: SearchOptions,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            width: 48,
            height: 32,
            obstacle_ratio: 0.2,
            agents: 24,
            ticks: 600,
            seed: 0x5eed,
            toggle_every: 0,
            pause: None,
            scheduler: SchedulerConfig {
                computations_per_tick: 2,
                ticks_between_batches: 1,
            },
            search: SearchOptions::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SwarmConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid scheduler settings: {0}")]
    Scheduler(#[from] ConfigError),
    #[error("the lattice must be at least 1x1, got {width}x{height}")]
    EmptyLattice { width: usize, height: usize },
}

impl SwarmConfig {
    pub fn load(path: &Path) -> Result<Self, SwarmConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SwarmConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(SwarmConfigError::EmptyLattice {
                width: self.width,
                height: self.height,
            });
        }
        self.scheduler.validate()?;
        Ok(())
    }
}
