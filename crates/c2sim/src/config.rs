//! Run configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

/// Parameters fixed for the duration of a run, loaded from YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Parallel environment instances
    #[serde(default = "default_one")]
    pub n_envs: usize,

    /// Tree variants evaluated per environment
    #[serde(default = "default_one")]
    pub n_trees: usize,

    /// Ticks per run
    #[serde(default = "default_n_steps")]
    pub n_steps: usize,

    #[serde(default = "default_team_size")]
    pub n_allies: usize,

    #[serde(default = "default_team_size")]
    pub n_enemies: usize,

    /// Tree bank: a YAML mapping or a directory of `.bt` files
    #[serde(default = "default_bank")]
    pub bank: PathBuf,
}

fn default_one() -> usize {
    1
}
fn default_n_steps() -> usize {
    100
}
fn default_team_size() -> usize {
    10
}
fn default_bank() -> PathBuf {
    PathBuf::from("bank")
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            n_envs: default_one(),
            n_trees: default_one(),
            n_steps: default_n_steps(),
            n_allies: default_team_size(),
            n_enemies: default_team_size(),
            bank: default_bank(),
        }
    }
}

impl RunConfig {
    /// Load and validate configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("n_envs", self.n_envs),
            ("n_trees", self.n_trees),
            ("n_steps", self.n_steps),
            ("n_allies", self.n_allies),
            ("n_enemies", self.n_enemies),
        ] {
            ensure!(value >= 1, "`{field}` must be at least 1, got {value}");
        }
        Ok(())
    }

    /// Members in one batched tick: every environment runs every tree variant.
    pub fn batch_size(&self) -> usize {
        self.n_envs * self.n_trees
    }

    /// Tree variant evaluated by batch slot `slot`.
    pub fn tree_index(&self, slot: usize) -> usize {
        slot % self.n_trees
    }

    /// Bank path with a relative path taken from `root`.
    pub fn resolve_bank(&self, root: &Path) -> PathBuf {
        root.join(&self.bank)
    }
}

#[cfg(feature = "core")]
impl RunConfig {
    pub fn layout(&self) -> c2sim_core::ObservationLayout {
        c2sim_core::ObservationLayout::smax(self.n_allies, self.n_enemies)
    }

    pub fn env(&self, terrain: c2sim_core::Terrain) -> c2sim_core::EnvInfo {
        c2sim_core::EnvInfo::new(self.n_allies, self.n_enemies, terrain)
    }
}
