use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpeciesError {
    #[error("species '{species}' not found in the species data file")]
    NotFound { species: String },
    #[error("malformed entry for species '{species}': {detail}")]
    Malformed { species: String, detail: String },
}

/// Raw M:F ratio as it appears in the data file, e.g. `7:1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SexRatio {
    pub male: u32,
    pub female: u32,
}

impl SexRatio {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let (male, female) = raw
            .split_once(':')
            .ok_or_else(|| format!("sex_ratio '{raw}' is not of the form M:F"))?;
        let male: u32 = male
            .trim()
            .parse()
            .map_err(|_| format!("sex_ratio '{raw}' has a non-integer male part"))?;
        let female: u32 = female
            .trim()
            .parse()
            .map_err(|_| format!("sex_ratio '{raw}' has a non-integer female part"))?;
        if male == 0 && female == 0 {
            return Err(format!("sex_ratio '{raw}' is 0:0"));
        }
        Ok(Self { male, female })
    }

    /// Convert the raw ratio into `(p_male, p_female)` probabilities summing
    /// to 1.0, e.g. 7:1 becomes (0.875, 0.125).
    pub fn probabilities(&self) -> (f64, f64) {
        let total = (self.male + self.female) as f64;
        (self.male as f64 / total, self.female as f64 / total)
    }
}

/// Immutable per-species parameters resolved from the data file.
#[derive(Debug, Clone, Copy)]
pub struct SpeciesProfile {
    pub sex_ratio: SexRatio,
    pub egg_cycles: usize,
}

#[derive(Debug, Clone, Deserialize)]
struct RawEntry {
    #[serde(default)]
    sex_ratio: Option<String>,
    #[serde(default)]
    egg_cycles: Option<u64>,
}

/// Read-only keyed lookup over the species data document.
#[derive(Debug)]
pub struct SpeciesBook {
    entries: HashMap<String, RawEntry>,
}

impl SpeciesBook {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read species data file {}", path.display()))?;
        let entries: HashMap<String, RawEntry> = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Self { entries })
    }

    pub fn profile(&self, species: &str) -> Result<SpeciesProfile, SpeciesError> {
        let entry = self
            .entries
            .get(species)
            .ok_or_else(|| SpeciesError::NotFound {
                species: species.to_string(),
            })?;
        let malformed = |detail: String| SpeciesError::Malformed {
            species: species.to_string(),
            detail,
        };

        let raw_ratio = entry
            .sex_ratio
            .as_deref()
            .ok_or_else(|| malformed("missing field 'sex_ratio'".into()))?;
        let sex_ratio = SexRatio::parse(raw_ratio).map_err(malformed)?;

        let egg_cycles = entry
            .egg_cycles
            .ok_or_else(|| malformed("missing field 'egg_cycles'".into()))?;
        if egg_cycles == 0 {
            return Err(malformed("'egg_cycles' must be positive".into()));
        }

        Ok(SpeciesProfile {
            sex_ratio,
            egg_cycles: egg_cycles as usize,
        })
    }
}
