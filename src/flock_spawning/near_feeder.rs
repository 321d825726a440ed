use rand::Rng;

use super::{emit_flock, FlockSpawner, SpawnReport};
use crate::birdie_database::MAX_FEEDER_RANGE;
use crate::feeder_scanner::{scan_active_feeders, ActiveFeeder};
use crate::location::{FeederAttachment, FlockSpawnRequest, SpawnLocation, TileRect, Viewport};
use crate::spatial_probe::{find_clear_region, SearchArea};
use crate::utils::{roll_chance, weighted_random};
use crate::world_state::{Season, WorldClock};

/// Tiles a feeder's flocks may land on: a square of side `2 * range + 1` around it.
pub fn feeder_search_rect(active: &ActiveFeeder<'_>) -> TileRect {
    let range = active.feeder.range.min(MAX_FEEDER_RANGE) as i32;
    TileRect::centered_at(active.tile, range * 2 + 1)
}

impl<'db, R: Rng> FlockSpawner<'db, R> {
    pub(super) fn spawn_near_feeders<L, V>(
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
        let database = self.database;
        let mut report = SpawnReport::default();
        for active in scan_active_feeders(&*location, database) {
            self.add_birdies_near_feeder(location, viewport, clock.season, &active, only_offscreen, &mut report);
        }
        report
    }

    fn add_birdies_near_feeder<L, V>(
        &mut self,
        location: &mut L,
        viewport: &V,
        season: Season,
        active: &ActiveFeeder<'db>,
        only_offscreen: bool,
        report: &mut SpawnReport,
    ) where
        L: SpawnLocation + ?Sized,
        V: Viewport + ?Sized,
    {
        let database = self.database;
        let feeder_rect = feeder_search_rect(active);

        let candidates = database.feeder_candidates(active.feeder, active.food, season);
        if candidates.is_empty() {
            log::warn!(
                "No birdie visits a {} feeder ({}) stocked with {} in {:?}, skipping",
                active.feeder.feeder_type,
                active.feeder.id,
                active.food.id,
                season
            );
            return;
        }

        log::debug!("Trying to spawn flocks within {:?} of {}", feeder_rect, active.feeder.id);

        let mut flocks_added = 0;
        let mut iterations = 0;
        while flocks_added < active.feeder.max_flocks && roll_chance(&mut self.rng, self.config.feeder_flock_chance) {
            if !self.within_iteration_ceiling(&mut iterations, report, "Feeder") {
                break;
            }

            let species = match weighted_random(&candidates, |(_, weight)| *weight, &mut self.rng) {
                Ok((species, _)) => *species,
                Err(e) => {
                    log::warn!("Could not pick a birdie for {}: {}", active.feeder.id, e);
                    continue;
                }
            };
            let mut flock_size = self.rng.gen_range(1..=species.max_flock_size.max(1));

            // Only the first iteration may leave a bird on the feeder itself
            let perch_on_feeder = iterations == 1
                && roll_chance(&mut self.rng, self.config.feeder_perch_chance)
                && (!only_offscreen || !viewport.is_tile_visible(active.tile));
            if perch_on_feeder {
                flock_size -= 1;
            }

            let outcome = find_clear_region(
                &*location,
                viewport,
                SearchArea::Within(feeder_rect),
                self.config.region_size,
                only_offscreen,
                self.config.max_region_trials,
                &mut self.rng,
            );
            if let Some(anchor) = outcome.anchor {
                flocks_added += 1;
                if flock_size > 0 {
                    let request = FlockSpawnRequest {
                        species_id: species.id.clone(),
                        count: flock_size,
                        anchor,
                        feeder: None,
                    };
                    emit_flock(location, report, request);
                }
            }

            if perch_on_feeder {
                let request = FlockSpawnRequest {
                    species_id: species.id.clone(),
                    count: 1,
                    anchor: active.tile,
                    feeder: Some(FeederAttachment {
                        feeder_id: active.feeder.id.clone(),
                        tile: active.tile,
                    }),
                };
                emit_flock(location, report, request);
            }
        }

        report.flocks_added += flocks_added;
    }
}
