use anyhow::Result;
use blockwright_builder::{BuildStrategy, CostModel, Energy};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/builder.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Energy regenerated each tick.
    pub energy_per_tick: Energy,
    /// Energy storage cap.
    pub max_energy: Energy,
    /// Travel time of a building item per block of distance.
    pub ticks_per_block: f64,
    pub break_energy_unit: Energy,
    pub build_energy_unit: Energy,
    /// Cooldown after a placement whose schematic does not set one.
    pub default_place_ticks: u64,
    /// Stop the run after this many ticks (0 = no limit).
    pub max_ticks: u64,
    pub strategy: BuildStrategy,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        let costs = CostModel::default();
        Self {
            energy_per_tick: 10,
            max_energy: 1_000,
            ticks_per_block: blockwright_builder::DEFAULT_TICKS_PER_BLOCK,
            break_energy_unit: costs.break_energy_unit,
            build_energy_unit: costs.build_energy_unit,
            default_place_ticks: costs.default_place_ticks,
            // One hour of simulated time at 20 TPS.
            max_ticks: 72_000,
            strategy: BuildStrategy::BuildOnly,
        }
    }
}

impl BuilderConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<BuilderConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    BuilderConfig::default()
                }
            },
            Err(err) => {
                if path == Path::new(DEFAULT_CONFIG_PATH) && err.kind() == std::io::ErrorKind::NotFound {
                    warn!("Builder config not found at {}. Using defaults", path.display());
                } else {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                BuilderConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }

    pub fn cost_model(&self) -> CostModel {
        CostModel {
            break_energy_unit: self.break_energy_unit,
            build_energy_unit: self.build_energy_unit,
            default_place_ticks: self.default_place_ticks,
        }
    }
}
