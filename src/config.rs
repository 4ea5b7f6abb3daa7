use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

fn default_death_threshold() -> u32 {
    243
}

fn default_max_population() -> u64 {
    20_000
}

fn default_starting_population() -> u64 {
    16
}

fn default_human_mode_cutoff_tick() -> u64 {
    100
}

fn default_fertility_rate_with_humans() -> u32 {
    50
}

fn default_fertility_rate_no_males() -> u32 {
    10
}

/// Tunable simulation constants. Every field has a usable default, so an
/// empty settings file is valid.
///
/// `death_threshold` is measured against a uniform roll in [1, 10000], so the
/// default of 243 is a ~2.43% per-tick death chance per individual. Fertility
/// rates are measured against a roll in [1, 100] and are deliberately not
/// clamped: a rate of 100 or more makes every female lay each tick.
#[derive(Debug, Clone, Deserialize)]
pub struct SimSettings {
    #[serde(default = "default_death_threshold")]
    pub death_threshold: u32,
    #[serde(default = "default_max_population")]
    pub max_population: u64,
    #[serde(default = "default_starting_population")]
    pub starting_population: u64,
    #[serde(default = "default_human_mode_cutoff_tick")]
    pub human_mode_cutoff_tick: u64,
    #[serde(default = "default_fertility_rate_with_humans")]
    pub fertility_rate_with_humans: u32,
    #[serde(default = "default_fertility_rate_no_males")]
    pub fertility_rate_no_males: u32,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            death_threshold: default_death_threshold(),
            max_population: default_max_population(),
            starting_population: default_starting_population(),
            human_mode_cutoff_tick: default_human_mode_cutoff_tick(),
            fertility_rate_with_humans: default_fertility_rate_with_humans(),
            fertility_rate_no_males: default_fertility_rate_no_males(),
        }
    }
}

impl SimSettings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings: SimSettings = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(settings)
    }
}
