use serde::{Deserialize, Serialize};

/// Birds go to roost at 6:00 PM game time.
pub const BIRDIE_BEDTIME: u32 = 1800;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    #[serde(alias = "fall")]
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];
}

/// Snapshot of the game clock taken at the start of a spawn pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldClock {
    /// Time of day on the 24h clock, e.g. 630 = 6:30 AM, 1800 = 6:00 PM.
    pub time_of_day: u32,
    pub season: Season,
}

impl WorldClock {
    pub fn new(time_of_day: u32, season: Season) -> Self {
        WorldClock { time_of_day, season }
    }

    pub fn is_past(&self, time_of_day: u32) -> bool {
        self.time_of_day >= time_of_day
    }
}
