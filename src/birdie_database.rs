use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::world_state::Season;

// --- Static Definitions ---

/// Largest feeder range whose search square still fits in tile coordinates.
pub const MAX_FEEDER_RANGE: u32 = i32::MAX as u32 / 4;

/// A bird species and how strongly it is drawn to each feeder, food and season.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BirdieConfig {
    pub id: String,
    pub name: String,
    pub max_flock_size: u32,
    /// Weight used for ambient spawns, before the seasonal multiplier.
    pub base_weight: f64,
    /// Seasons left out count as 1.0.
    #[serde(default)]
    pub seasonal_multiplier: HashMap<Season, f64>,
    /// Feeder type -> weight.
    #[serde(default)]
    pub weighted_feeders: HashMap<String, f64>,
    /// Food id -> weight.
    #[serde(default)]
    pub weighted_foods: HashMap<String, f64>,
}

impl BirdieConfig {
    pub fn season_multiplier(&self, season: Season) -> f64 {
        self.seasonal_multiplier.get(&season).copied().unwrap_or(1.0)
    }

    pub fn ambient_weight(&self, season: Season) -> f64 {
        self.base_weight * self.season_multiplier(season)
    }

    /// `None` unless the species has a positive weight for both the feeder type and the food.
    pub fn feeder_weight(&self, feeder_type: &str, food_id: &str, season: Season) -> Option<f64> {
        let feeder_weight = self.weighted_feeders.get(feeder_type).copied().filter(|w| *w > 0.0)?;
        let food_weight = self.weighted_foods.get(food_id).copied().filter(|w| *w > 0.0)?;
        Some((feeder_weight + food_weight) * self.season_multiplier(season))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeederConfig {
    /// Matches `FeederObject::feeder_id`.
    pub id: String,
    /// Key into `BirdieConfig::weighted_feeders`.
    pub feeder_type: String,
    /// Tiles around the feeder where its flocks may land.
    pub range: u32,
    pub max_flocks: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoodConfig {
    pub id: String,
    /// Suffix a stocked feeder's texture carries, as in `"Feeders/Tube:2"`.
    pub feeder_asset_index: u32,
}

impl FoodConfig {
    pub fn matches_texture(&self, texture_override: &str) -> bool {
        texture_override.ends_with(&format!(":{}", self.feeder_asset_index))
    }
}

// --- Database ---

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BirdieDatabase {
    #[serde(default)]
    birdies: Vec<BirdieConfig>,
    #[serde(default)]
    feeders: Vec<FeederConfig>,
    #[serde(default)]
    foods: Vec<FoodConfig>,
}

impl BirdieDatabase {
    pub fn from_parts(
        birdies: Vec<BirdieConfig>,
        feeders: Vec<FeederConfig>,
        foods: Vec<FoodConfig>,
    ) -> Result<Self, String> {
        let database = BirdieDatabase { birdies, feeders, foods };
        database.validate()?;
        Ok(database)
    }

    /// Loads `{ "birdies": [...], "feeders": [...], "foods": [...] }`.
    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let database: BirdieDatabase =
            serde_json::from_str(json).map_err(|e| format!("Failed to parse birdie database: {}", e))?;
        database.validate()?;
        log::info!(
            "Loaded birdie database: {} birdies, {} feeders, {} foods",
            database.birdies.len(),
            database.feeders.len(),
            database.foods.len()
        );
        Ok(database)
    }

    pub fn validate(&self) -> Result<(), String> {
        ensure_unique_ids("birdie", self.birdies.iter().map(|b| b.id.as_str()))?;
        ensure_unique_ids("feeder", self.feeders.iter().map(|f| f.id.as_str()))?;
        ensure_unique_ids("food", self.foods.iter().map(|f| f.id.as_str()))?;

        let mut asset_indices = HashSet::new();
        for food in &self.foods {
            if !asset_indices.insert(food.feeder_asset_index) {
                return Err(format!(
                    "Food '{}' reuses feeder asset index {}",
                    food.id, food.feeder_asset_index
                ));
            }
        }

        for feeder in &self.feeders {
            if feeder.range > MAX_FEEDER_RANGE {
                return Err(format!(
                    "Feeder '{}' has a range of {}, above the maximum of {}",
                    feeder.id, feeder.range, MAX_FEEDER_RANGE
                ));
            }
        }

        for birdie in &self.birdies {
            if birdie.max_flock_size == 0 {
                return Err(format!("Birdie '{}' has a max flock size of 0", birdie.id));
            }
            ensure_weight(&birdie.id, "base weight", birdie.base_weight)?;
            for (season, multiplier) in &birdie.seasonal_multiplier {
                ensure_weight(&birdie.id, &format!("{:?} multiplier", season), *multiplier)?;
            }
            for (feeder_type, weight) in &birdie.weighted_feeders {
                ensure_weight(&birdie.id, &format!("feeder '{}' weight", feeder_type), *weight)?;
            }
            for (food_id, weight) in &birdie.weighted_foods {
                ensure_weight(&birdie.id, &format!("food '{}' weight", food_id), *weight)?;
            }
        }
        Ok(())
    }

    pub fn birdies(&self) -> &[BirdieConfig] {
        &self.birdies
    }

    pub fn feeders(&self) -> &[FeederConfig] {
        &self.feeders
    }

    pub fn foods(&self) -> &[FoodConfig] {
        &self.foods
    }

    pub fn birdie(&self, id: &str) -> Option<&BirdieConfig> {
        self.birdies.iter().find(|b| b.id == id)
    }

    pub fn feeder(&self, id: &str) -> Option<&FeederConfig> {
        self.feeders.iter().find(|f| f.id == id)
    }

    pub fn food_for_texture(&self, texture_override: &str) -> Option<&FoodConfig> {
        self.foods.iter().find(|food| food.matches_texture(texture_override))
    }

    /// Species that would visit this feeder/food pair, paired with their weight this season.
    pub fn feeder_candidates(&self, feeder: &FeederConfig, food: &FoodConfig, season: Season) -> Vec<(&BirdieConfig, f64)> {
        self.birdies
            .iter()
            .filter_map(|birdie| {
                birdie
                    .feeder_weight(&feeder.feeder_type, &food.id, season)
                    .map(|weight| (birdie, weight))
            })
            .collect()
    }
}

fn ensure_unique_ids<'a>(table: &str, ids: impl Iterator<Item = &'a str>) -> Result<(), String> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(format!("Duplicate {} id '{}'", table, id));
        }
    }
    Ok(())
}

fn ensure_weight(birdie_id: &str, what: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("Birdie '{}' has invalid {}: {}", birdie_id, what, value));
    }
    Ok(())
}

// --- Built-in Tables ---

fn birdie(
    id: &str,
    name: &str,
    max_flock_size: u32,
    base_weight: f64,
    seasons: [f64; 4],
    feeders: &[(&str, f64)],
    foods: &[(&str, f64)],
) -> BirdieConfig {
    BirdieConfig {
        id: id.to_string(),
        name: name.to_string(),
        max_flock_size,
        base_weight,
        seasonal_multiplier: Season::ALL.iter().copied().zip(seasons).collect(),
        weighted_feeders: feeders.iter().map(|(k, w)| (k.to_string(), *w)).collect(),
        weighted_foods: foods.iter().map(|(k, w)| (k.to_string(), *w)).collect(),
    }
}

fn feeder(id: &str, feeder_type: &str, range: u32, max_flocks: u32) -> FeederConfig {
    FeederConfig {
        id: id.to_string(),
        feeder_type: feeder_type.to_string(),
        range,
        max_flocks,
    }
}

fn food(id: &str, feeder_asset_index: u32) -> FoodConfig {
    FoodConfig {
        id: id.to_string(),
        feeder_asset_index,
    }
}

lazy_static! {
    pub static ref DEFAULT_BIRDIE_DATABASE: BirdieDatabase = {
        // Season columns: spring, summer, autumn, winter
        let birdies = vec![
            birdie("Chickadee", "Black-capped Chickadee", 4, 10.0, [1.0, 1.0, 1.2, 1.5],
                &[("tube", 3.0), ("hopper", 2.0), ("tray", 2.0), ("suet", 2.0)],
                &[("seed", 3.0), ("sunflower", 4.0), ("suet", 2.0)]),
            birdie("HouseSparrow", "House Sparrow", 6, 12.0, [1.2, 1.2, 1.0, 0.8],
                &[("hopper", 3.0), ("tray", 4.0)],
                &[("seed", 4.0), ("sunflower", 1.0)]),
            birdie("NorthernCardinal", "Northern Cardinal", 2, 6.0, [1.0, 0.8, 1.0, 1.4],
                &[("hopper", 3.0), ("tray", 3.0)],
                &[("sunflower", 4.0), ("seed", 2.0), ("fruit", 1.0)]),
            birdie("BlueJay", "Blue Jay", 3, 5.0, [0.8, 0.8, 1.5, 1.0],
                &[("tray", 4.0), ("hopper", 2.0)],
                &[("sunflower", 3.0), ("seed", 1.0)]),
            birdie("AmericanGoldfinch", "American Goldfinch", 5, 7.0, [1.2, 1.5, 0.8, 0.4],
                &[("tube", 4.0)],
                &[("nyjer", 5.0), ("sunflower", 2.0)]),
            birdie("DownyWoodpecker", "Downy Woodpecker", 1, 3.0, [1.0, 0.8, 1.0, 1.3],
                &[("suet", 5.0)],
                &[("suet", 5.0)]),
            birdie("AmericanRobin", "American Robin", 3, 8.0, [1.5, 1.2, 0.8, 0.2],
                &[("tray", 3.0)],
                &[("fruit", 5.0)]),
            birdie("RubyThroatedHummingbird", "Ruby-throated Hummingbird", 1, 2.0, [1.0, 1.5, 0.3, 0.0],
                &[("nectar", 5.0)],
                &[("nectar", 5.0)]),
        ];

        let feeders = vec![
            feeder("TubeFeeder", "tube", 3, 2),
            feeder("PlatformFeeder", "tray", 2, 2),
            feeder("HopperFeeder", "hopper", 3, 3),
            feeder("SuetCage", "suet", 2, 1),
            feeder("HummingbirdFeeder", "nectar", 2, 1),
        ];

        let foods = vec![
            food("seed", 1),
            food("sunflower", 2),
            food("nyjer", 3),
            food("suet", 4),
            food("fruit", 5),
            food("nectar", 6),
        ];

        BirdieDatabase { birdies, feeders, foods }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_database_is_valid() {
        DEFAULT_BIRDIE_DATABASE.validate().unwrap();
        assert!(DEFAULT_BIRDIE_DATABASE.birdie("Chickadee").is_some());
        assert_eq!(DEFAULT_BIRDIE_DATABASE.feeder("PlatformFeeder").unwrap().feeder_type, "tray");
    }

    #[test]
    fn test_food_texture_suffix_match() {
        let db = &*DEFAULT_BIRDIE_DATABASE;
        assert_eq!(db.food_for_texture("Feeders/Tube:3").unwrap().id, "nyjer");
        assert!(db.food_for_texture("Feeders/Tube:13").is_none());
        assert!(db.food_for_texture("Feeders/Tube").is_none());
    }

    #[test]
    fn test_feeder_weight_requires_both_feeder_and_food() {
        let chickadee = DEFAULT_BIRDIE_DATABASE.birdie("Chickadee").unwrap();
        assert_eq!(chickadee.feeder_weight("tube", "seed", Season::Spring), Some(6.0));
        assert_eq!(chickadee.feeder_weight("tube", "seed", Season::Winter), Some(9.0));
        assert_eq!(chickadee.feeder_weight("nectar", "seed", Season::Spring), None);
        assert_eq!(chickadee.feeder_weight("tube", "fruit", Season::Spring), None);
    }

    #[test]
    fn test_zero_weight_is_not_a_candidate() {
        let mut robin = DEFAULT_BIRDIE_DATABASE.birdie("AmericanRobin").unwrap().clone();
        robin.weighted_foods.insert("fruit".to_string(), 0.0);
        assert_eq!(robin.feeder_weight("tray", "fruit", Season::Summer), None);
    }

    #[test]
    fn test_feeder_candidates_filter() {
        let db = &*DEFAULT_BIRDIE_DATABASE;
        let feeder = db.feeder("HummingbirdFeeder").unwrap();
        let nectar = db.food_for_texture("x:6").unwrap();
        let candidates = db.feeder_candidates(feeder, nectar, Season::Summer);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].0.id, "RubyThroatedHummingbird");
        assert_eq!(candidates[0].1, 15.0);
    }

    #[test]
    fn test_missing_season_defaults_to_one() {
        let json = r#"{
            "birdies": [{ "id": "Wren", "name": "House Wren", "max_flock_size": 2, "base_weight": 4.0,
                          "seasonal_multiplier": { "fall": 2.0 } }],
            "feeders": [],
            "foods": []
        }"#;
        let db = BirdieDatabase::from_json_str(json).unwrap();
        let wren = db.birdie("Wren").unwrap();
        assert_eq!(wren.ambient_weight(Season::Autumn), 8.0);
        assert_eq!(wren.ambient_weight(Season::Spring), 4.0);
    }

    #[test]
    fn test_rejects_bad_tables() {
        let zero_flock = r#"{ "birdies": [{ "id": "A", "name": "A", "max_flock_size": 0, "base_weight": 1.0 }],
                              "feeders": [], "foods": [] }"#;
        assert!(BirdieDatabase::from_json_str(zero_flock).unwrap_err().contains("max flock size"));

        let duplicate = r#"{ "birdies": [], "feeders": [
            { "id": "F", "feeder_type": "tube", "range": 1, "max_flocks": 1 },
            { "id": "F", "feeder_type": "tray", "range": 1, "max_flocks": 1 }], "foods": [] }"#;
        assert!(BirdieDatabase::from_json_str(duplicate).unwrap_err().contains("Duplicate feeder"));

        let negative = r#"{ "birdies": [{ "id": "A", "name": "A", "max_flock_size": 1, "base_weight": -1.0 }],
                            "feeders": [], "foods": [] }"#;
        assert!(BirdieDatabase::from_json_str(negative).is_err());

        let huge_range = r#"{ "birdies": [], "feeders": [
            { "id": "F", "feeder_type": "tube", "range": 2147483648, "max_flocks": 1 }], "foods": [] }"#;
        assert!(BirdieDatabase::from_json_str(huge_range).unwrap_err().contains("range"));

        assert!(BirdieDatabase::from_json_str("{ not json").unwrap_err().starts_with("Failed to parse"));
    }
}
