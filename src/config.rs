//! config.rs
//! Per-graph simulation settings.

use crate::error::{GraphError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_NSIM: usize = 1000;

/// Fixed for the lifetime of a `ScenarioGraph`; only the seed can be reset afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Seed of the graph's random stream.
    pub seed: u64,
    /// Number of simulated scenarios held by every random or derived value.
    pub nsim: usize,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self { seed: DEFAULT_SEED, nsim: DEFAULT_NSIM }
    }
}

impl ScenarioConfig {
    pub fn new(seed: u64, nsim: usize) -> Self {
        Self { seed, nsim }
    }

    pub fn validate(&self) -> Result<()> {
        if self.nsim == 0 {
            return Err(GraphError::InvalidConfig("nsim must be at least 1".into()));
        }
        Ok(())
    }
}
