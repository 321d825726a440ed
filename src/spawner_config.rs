use serde::{Deserialize, Serialize};

use crate::location::LocationKind;
use crate::world_state::BIRDIE_BEDTIME;

// --- Tuning Defaults ---

pub const DEFAULT_FEEDER_FLOCK_CHANCE: f64 = 0.4; // Chance per iteration that a feeder draws another flock
pub const DEFAULT_FEEDER_PERCH_CHANCE: f64 = 0.65; // Chance the first flock leaves one bird on the feeder
pub const DEFAULT_FARM_AMBIENT_CHANCE: f64 = 0.15; // Replaces the caller's ambient chance on the farm
pub const DEFAULT_MAX_REGION_TRIALS: u32 = 50;
pub const DEFAULT_REGION_SIZE: u32 = 3; // 3x3 patch around the landing tile
pub const DEFAULT_MAX_FLOCK_LOOP_ITERATIONS: u32 = 1000;
pub const DEFAULT_DEBUG_SPECIES_ID: &str = "Chickadee";

/// Tunables and flags for a `FlockSpawner`. Every field has a default, so a
/// JSON config only needs the values it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Debug mode: ambient spawning always places a single `debug_species_id` bird.
    pub always_spawn: bool,
    pub debug_species_id: String,
    /// No spawning at or after this time of day.
    pub bedtime: u32,
    pub excluded_location_kinds: Vec<LocationKind>,
    pub farm_ambient_chance: f64,
    pub feeder_flock_chance: f64,
    pub feeder_perch_chance: f64,
    pub max_region_trials: u32,
    pub region_size: u32,
    /// Hard stop for a flock loop whose draws keep succeeding while no clear region turns up.
    pub max_flock_loop_iterations: u32,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        SpawnerConfig {
            always_spawn: false,
            debug_species_id: DEFAULT_DEBUG_SPECIES_ID.to_string(),
            bedtime: BIRDIE_BEDTIME,
            excluded_location_kinds: vec![LocationKind::Desert, LocationKind::Railroad],
            farm_ambient_chance: DEFAULT_FARM_AMBIENT_CHANCE,
            feeder_flock_chance: DEFAULT_FEEDER_FLOCK_CHANCE,
            feeder_perch_chance: DEFAULT_FEEDER_PERCH_CHANCE,
            max_region_trials: DEFAULT_MAX_REGION_TRIALS,
            region_size: DEFAULT_REGION_SIZE,
            max_flock_loop_iterations: DEFAULT_MAX_FLOCK_LOOP_ITERATIONS,
        }
    }
}

impl SpawnerConfig {
    pub fn debug() -> Self {
        SpawnerConfig {
            always_spawn: true,
            ..SpawnerConfig::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let config: SpawnerConfig =
            serde_json::from_str(json).map_err(|e| format!("Failed to parse spawner config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, chance) in [
            ("farm_ambient_chance", self.farm_ambient_chance),
            ("feeder_flock_chance", self.feeder_flock_chance),
            ("feeder_perch_chance", self.feeder_perch_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(format!("{} must be within [0, 1], got {}", name, chance));
            }
        }
        if self.max_region_trials == 0 {
            return Err("max_region_trials must be at least 1".to_string());
        }
        if self.region_size == 0 {
            return Err("region_size must be at least 1".to_string());
        }
        if self.max_flock_loop_iterations == 0 {
            return Err("max_flock_loop_iterations must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn is_excluded(&self, kind: LocationKind) -> bool {
        self.excluded_location_kinds.contains(&kind)
    }
}
