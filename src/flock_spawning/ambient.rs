use rand::Rng;

use super::{emit_flock, FlockSpawner, SpawnReport};
use crate::birdie_database::BirdieConfig;
use crate::location::{FlockSpawnRequest, LocationKind, SpawnLocation, Viewport};
use crate::spatial_probe::{find_clear_region, SearchArea};
use crate::utils::{roll_chance, weighted_random};
use crate::world_state::WorldClock;

impl<'db, R: Rng> FlockSpawner<'db, R> {
    /// Ambient chance actually used for `location`. The farm ignores the caller's value.
    pub fn effective_ambient_chance<L>(&self, location: &L, chance: f64) -> f64
    where
        L: SpawnLocation + ?Sized,
    {
        if location.kind() == LocationKind::Farm {
            self.config.farm_ambient_chance
        } else {
            chance
        }
    }

    pub(super) fn spawn_ambient<L, V>(
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
        let mut report = SpawnReport::default();

        if location.critter_count() > 0 {
            log::debug!("{:?} already has critters, skipping ambient birdies", location.kind());
            return report;
        }

        let chance = self.effective_ambient_chance(&*location, chance);
        let database = self.database;
        let season = clock.season;
        let always_spawn = self.config.always_spawn;

        let debug_species: Option<&'db BirdieConfig> = if always_spawn {
            match database.birdie(&self.config.debug_species_id) {
                Some(species) => Some(species),
                None => {
                    log::warn!(
                        "Debug birdie '{}' is not in the database, skipping ambient birdies",
                        self.config.debug_species_id
                    );
                    return report;
                }
            }
        } else {
            None
        };

        if debug_species.is_none() && !database.birdies().iter().any(|b| b.ambient_weight(season) > 0.0) {
            log::warn!("No birdie has a positive ambient weight in {:?}, skipping", season);
            return report;
        }

        let mut flocks_added = 0;
        let mut iterations = 0;
        // Each placed flock makes the next one less likely
        while (always_spawn && flocks_added == 0)
            || roll_chance(&mut self.rng, chance / (flocks_added + 1) as f64)
        {
            if !self.within_iteration_ceiling(&mut iterations, &mut report, "Ambient") {
                break;
            }

            let species = match debug_species {
                Some(species) => species,
                None => match weighted_random(database.birdies(), |b| b.ambient_weight(season), &mut self.rng) {
                    Ok(species) => species,
                    Err(e) => {
                        log::warn!("Could not pick an ambient birdie: {}", e);
                        break;
                    }
                },
            };
            let flock_size = if always_spawn {
                1
            } else {
                self.rng.gen_range(1..=species.max_flock_size.max(1))
            };

            let outcome = find_clear_region(
                &*location,
                viewport,
                SearchArea::Anywhere,
                self.config.region_size,
                only_offscreen,
                self.config.max_region_trials,
                &mut self.rng,
            );
            if let Some(anchor) = outcome.anchor {
                let request = FlockSpawnRequest {
                    species_id: species.id.clone(),
                    count: flock_size,
                    anchor,
                    feeder: None,
                };
                emit_flock(location, &mut report, request);
                flocks_added += 1;
            }
        }

        report.flocks_added += flocks_added;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::birdie_database::DEFAULT_BIRDIE_DATABASE;
    use crate::location::TileRect;
    use crate::sandbox::{FixedViewport, SandboxLocation};
    use crate::spawner_config::SpawnerConfig;
    use crate::world_state::Season;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn noon() -> WorldClock {
        WorldClock::new(1200, Season::Summer)
    }

    #[test]
    fn test_farm_overrides_caller_chance() {
        let spawner = FlockSpawner::with_default_database(SpawnerConfig::default(), StepRng::new(0, 0)).unwrap();
        let farm = SandboxLocation::new(10, 10, LocationKind::Farm);
        let town = SandboxLocation::new(10, 10, LocationKind::Town);
        assert_eq!(spawner.effective_ambient_chance(&farm, 0.9), 0.15);
        assert_eq!(spawner.effective_ambient_chance(&town, 0.9), 0.9);
    }

    #[test]
    fn test_existing_critters_block_ambient_spawns() {
        let mut spawner =
            FlockSpawner::with_default_database(SpawnerConfig::debug(), StdRng::seed_from_u64(1)).unwrap();
        let mut location = SandboxLocation::new(40, 40, LocationKind::Forest).with_critters(1);
        let report =
            spawner.add_random_birdies(&mut location, &FixedViewport::nothing_visible(), &noon(), 1.0, false);
        assert!(report.requests.is_empty());
        assert_eq!(report.loop_iterations, 0);
    }

    #[test]
    fn test_debug_mode_spawns_one_chickadee() {
        let mut spawner =
            FlockSpawner::with_default_database(SpawnerConfig::debug(), StdRng::seed_from_u64(12)).unwrap();
        let mut location = SandboxLocation::new(40, 40, LocationKind::Forest);
        // Zero chance: only the forced first flock can spawn
        let report =
            spawner.add_random_birdies(&mut location, &FixedViewport::nothing_visible(), &noon(), 0.0, false);
        assert_eq!(report.flocks_added, 1);
        assert_eq!(report.requests.len(), 1);
        assert_eq!(report.requests[0].species_id, "Chickadee");
        assert_eq!(report.requests[0].count, 1);
    }

    #[test]
    fn test_debug_mode_without_debug_species_spawns_nothing() {
        let config = SpawnerConfig {
            debug_species_id: "Dodo".to_string(),
            ..SpawnerConfig::debug()
        };
        let mut spawner = FlockSpawner::with_default_database(config, StdRng::seed_from_u64(12)).unwrap();
        let mut location = SandboxLocation::new(40, 40, LocationKind::Forest);
        let report =
            spawner.add_random_birdies(&mut location, &FixedViewport::nothing_visible(), &noon(), 1.0, false);
        assert!(report.requests.is_empty());
    }

    #[test]
    fn test_blocked_location_stops_at_ceiling() {
        let config = SpawnerConfig {
            max_flock_loop_iterations: 25,
            ..SpawnerConfig::default()
        };
        let mut spawner = FlockSpawner::with_default_database(config, StdRng::seed_from_u64(3)).unwrap();
        let mut location = SandboxLocation::new(20, 20, LocationKind::Forest);
        location.block_rect(TileRect::new(0, 0, 20, 20));
        // A chance above 1 keeps winning the roll while no patch is ever clear
        let report =
            spawner.add_random_birdies(&mut location, &FixedViewport::nothing_visible(), &noon(), 2.0, false);
        assert_eq!(report.flocks_added, 0);
        assert_eq!(report.loop_iterations, 25);
        assert_eq!(report.iteration_ceiling_hits, 1);
        assert_eq!(location.area_checks(), 25 * 50);
    }

    #[test]
    fn test_ambient_flock_sizes_respect_species() {
        let viewport = FixedViewport::nothing_visible();
        for seed in 0..30 {
            let mut spawner =
                FlockSpawner::with_default_database(SpawnerConfig::default(), StdRng::seed_from_u64(seed)).unwrap();
            let mut location = SandboxLocation::new(50, 50, LocationKind::Forest);
            let report = spawner.add_random_birdies(&mut location, &viewport, &noon(), 0.8, false);
            for request in &report.requests {
                let species = DEFAULT_BIRDIE_DATABASE.birdie(&request.species_id).unwrap();
                assert!(request.count >= 1 && request.count <= species.max_flock_size);
                assert!(request.feeder.is_none());
            }
        }
    }
}
