/******************************************************************************
 *                                                                            *
 * Flock Spawning                                                             *
 *                                                                            *
 * Decides, once per location update, whether birds show up and where.      *
 *                                                                            *
 * - Nothing spawns after bedtime, indoors, or in excluded location kinds    *
 * - Stocked feeders draw flocks into the tiles around them                  *
 * - Ambient flocks land anywhere, with a chance that drops per flock        *
 * - Every flock needs a clear (and optionally off-screen) 3x3 patch        *
 *                                                                            *
 ******************************************************************************/

use rand::Rng;

use crate::birdie_database::{BirdieDatabase, DEFAULT_BIRDIE_DATABASE};
use crate::location::{FlockSpawnRequest, SpawnLocation, Viewport};
use crate::spawner_config::SpawnerConfig;
use crate::world_state::WorldClock;

pub mod ambient;
pub mod near_feeder;

/// What one spawn pass did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpawnReport {
    /// Requests handed to the location, in the order they were made.
    pub requests: Vec<FlockSpawnRequest>,
    /// Flocks that found a clear region.
    pub flocks_added: u32,
    /// Bodies of flock loops that ran.
    pub loop_iterations: u32,
    /// Flock loops stopped by `max_flock_loop_iterations`.
    pub iteration_ceiling_hits: u32,
    /// True when the time/location gate refused the pass.
    pub gated: bool,
}

impl SpawnReport {
    pub fn merge(&mut self, other: SpawnReport) {
        self.requests.extend(other.requests);
        self.flocks_added += other.flocks_added;
        self.loop_iterations += other.loop_iterations;
        self.iteration_ceiling_hits += other.iteration_ceiling_hits;
        self.gated |= other.gated;
    }

    pub fn birds_spawned(&self) -> u32 {
        self.requests.iter().map(|r| r.count).sum()
    }

    fn closed_gate() -> Self {
        SpawnReport {
            gated: true,
            ..SpawnReport::default()
        }
    }
}

pub struct FlockSpawner<'db, R> {
    config: SpawnerConfig,
    database: &'db BirdieDatabase,
    rng: R,
}

impl<R: Rng> FlockSpawner<'static, R> {
    /// Spawner over the built-in species, feeder and food tables.
    pub fn with_default_database(config: SpawnerConfig, rng: R) -> Result<Self, String> {
        FlockSpawner::new(config, &DEFAULT_BIRDIE_DATABASE, rng)
    }
}

impl<'db, R: Rng> FlockSpawner<'db, R> {
    pub fn new(config: SpawnerConfig, database: &'db BirdieDatabase, rng: R) -> Result<Self, String> {
        config.validate()?;
        Ok(FlockSpawner { config, database, rng })
    }

    pub fn config(&self) -> &SpawnerConfig {
        &self.config
    }

    pub fn database(&self) -> &'db BirdieDatabase {
        self.database
    }

    /// Gate shared by every entry point: daytime, outdoors, not an excluded kind.
    pub fn can_spawn_birdies<L>(&self, location: &L, clock: &WorldClock) -> bool
    where
        L: SpawnLocation + ?Sized,
    {
        !clock.is_past(self.config.bedtime) && location.is_outdoors() && !self.config.is_excluded(location.kind())
    }

    /// Full pass for one location: feeder flocks, then ambient flocks when `chance > 0`.
    pub fn add_birdies<L, V>(
        &mut self,
        location: &mut L,
        viewport: &V,
        clock: &WorldClock,
        chance: f64,
        only_offscreen: bool,
    ) -> SpawnReport
    where
        L: SpawnLocation + ?Sized,
        V: Viewport + ?Sized,
    {
        if !self.can_spawn_birdies(location, clock) {
            log::debug!(
                "No birdies in {:?} at {} (outdoors: {})",
                location.kind(),
                clock.time_of_day,
                location.is_outdoors()
            );
            return SpawnReport::closed_gate();
        }

        log::debug!("Adding birdies to {:?} at {}", location.kind(), clock.time_of_day);

        let mut report = self.spawn_near_feeders(location, viewport, clock, only_offscreen);
        if chance > 0.0 {
            report.merge(self.spawn_ambient(location, viewport, clock, chance, only_offscreen));
        }

        if !report.requests.is_empty() {
            log::info!(
                "Spawned {} birdies in {} requests ({} flocks) in {:?}",
                report.birds_spawned(),
                report.requests.len(),
                report.flocks_added,
                location.kind()
            );
        }
        report
    }

    /// Feeder flocks only, behind the same gate as `add_birdies`.
    pub fn add_birdies_near_feeders<L, V>(
        &mut self,
        location: &mut L,
        viewport: &V,
        clock: &WorldClock,
        only_offscreen: bool,
    ) -> SpawnReport
    where
        L: SpawnLocation + ?Sized,
        V: Viewport + ?Sized,
    {
        if !self.can_spawn_birdies(location, clock) {
            return SpawnReport::closed_gate();
        }
        self.spawn_near_feeders(location, viewport, clock, only_offscreen)
    }

    /// Ambient flocks only, behind the same gate as `add_birdies`.
    pub fn add_random_birdies<L, V>(
        &mut self,
        location: &mut L,
        viewport: &V,
        clock: &WorldClock,
        chance: f64,
        only_offscreen: bool,
    ) -> SpawnReport
    where
        L: SpawnLocation + ?Sized,
        V: Viewport + ?Sized,
    {
        if !self.can_spawn_birdies(location, clock) {
            return SpawnReport::closed_gate();
        }
        self.spawn_ambient(location, viewport, clock, chance, only_offscreen)
    }

    /// Counts one loop body against the safety ceiling. False once the ceiling is reached.
    fn within_iteration_ceiling(&self, iterations: &mut u32, report: &mut SpawnReport, what: &str) -> bool {
        if *iterations >= self.config.max_flock_loop_iterations {
            log::warn!(
                "{} flock loop hit the {} iteration ceiling with {} flocks placed",
                what,
                self.config.max_flock_loop_iterations,
                report.flocks_added
            );
            report.iteration_ceiling_hits += 1;
            return false;
        }
        *iterations += 1;
        report.loop_iterations += 1;
        true
    }
}

fn emit_flock<L>(location: &mut L, report: &mut SpawnReport, request: FlockSpawnRequest)
where
    L: SpawnLocation + ?Sized,
{
    match &request.feeder {
        Some(feeder) => log::info!(
            "Perching 1 {} on {} at {:?}",
            request.species_id,
            feeder.feeder_id,
            feeder.tile
        ),
        None => log::info!(
            "Adding flock of {} {} at {:?}",
            request.count,
            request.species_id,
            request.anchor
        ),
    }
    location.spawn_flock(&request);
    report.requests.push(request);
}
