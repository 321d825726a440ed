use crate::birdie_database::{BirdieDatabase, FeederConfig, FoodConfig};
use crate::location::{PlacedObject, SpawnLocation, Tile};

/// A stocked feeder with its resolved definitions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveFeeder<'a> {
    pub tile: Tile,
    pub feeder: &'a FeederConfig,
    pub food: &'a FoodConfig,
}

/// Stocked feeders in the location's own object order. Feeders whose
/// definition or food cannot be resolved are left out.
pub fn scan_active_feeders<'db, L>(location: &L, database: &'db BirdieDatabase) -> Vec<ActiveFeeder<'db>>
where
    L: SpawnLocation + ?Sized,
{
    location
        .objects()
        .into_iter()
        .filter_map(PlacedObject::as_feeder)
        .filter(|object| object.is_stocked())
        .filter_map(|object| {
            let feeder = match database.feeder(&object.feeder_id) {
                Some(feeder) => feeder,
                None => {
                    log::debug!("Unknown feeder '{}' at {:?}", object.feeder_id, object.tile);
                    return None;
                }
            };
            let food = match database.food_for_texture(&object.texture_override) {
                Some(food) => food,
                None => {
                    log::debug!(
                        "No food matches texture '{}' on feeder at {:?}",
                        object.texture_override,
                        object.tile
                    );
                    return None;
                }
            };
            Some(ActiveFeeder { tile: object.tile, feeder, food })
        })
        .collect()
}
