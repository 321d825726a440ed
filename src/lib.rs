//! Feeder-driven and ambient bird flock spawning for tile-based game locations.
//!
//! The game engine implements [`SpawnLocation`] and [`Viewport`]; a
//! [`FlockSpawner`] is called once per location update and hands every flock
//! it decides on back to the location as a [`FlockSpawnRequest`].

// Screen size of one map tile, used for viewport checks
pub const TILE_SIZE_PX: i32 = 64;

pub mod birdie_database; // Species, feeder and food tables
pub mod feeder_scanner; // Stocked feeder discovery
pub mod flock_spawning; // Spawn planner: gate, feeder flocks, ambient flocks
pub mod location; // World capabilities consumed by the spawner
pub mod sandbox; // In-memory world for offline runs and tests
pub mod spatial_probe; // Clear-region search
pub mod spawner_config; // Tunables and debug flag
pub mod utils; // Weighted random selection
pub mod world_state; // Clock and seasons

pub use birdie_database::{BirdieConfig, BirdieDatabase, FeederConfig, FoodConfig, DEFAULT_BIRDIE_DATABASE};
pub use feeder_scanner::{scan_active_feeders, ActiveFeeder};
pub use flock_spawning::{FlockSpawner, SpawnReport};
pub use location::{
    FeederAttachment, FeederObject, FlockSpawnRequest, LocationKind, PixelRect, PlacedObject, SpawnLocation, Tile,
    TileRect, Viewport,
};
pub use spatial_probe::{find_clear_region, ProbeOutcome, SearchArea};
pub use spawner_config::SpawnerConfig;
pub use utils::weighted_random;
pub use world_state::{Season, WorldClock, BIRDIE_BEDTIME};
