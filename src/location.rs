/******************************************************************************
 *                                                                            *
 * Location Model                                                             *
 *                                                                            *
 * Capabilities the spawner needs from the game world. The engine owns the    *
 * real location; this crate only reads tiles and objects and appends new    *
 * critters through `SpawnLocation::spawn_flock`.                             *
 *                                                                            *
 ******************************************************************************/

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::TILE_SIZE_PX;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
}

impl Tile {
    pub fn new(x: i32, y: i32) -> Self {
        Tile { x, y }
    }

    /// Screen-space rectangle covered by this tile.
    pub fn to_pixel_rect(self) -> PixelRect {
        PixelRect {
            x: self.x * TILE_SIZE_PX,
            y: self.y * TILE_SIZE_PX,
            width: TILE_SIZE_PX,
            height: TILE_SIZE_PX,
        }
    }
}

/// Axis-aligned rectangle in tile units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl TileRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        TileRect { x, y, width, height }
    }

    /// Square of side `size` centered on `center`. For odd sizes the center
    /// tile sits exactly in the middle.
    pub fn centered_at(center: Tile, size: i32) -> Self {
        TileRect {
            x: center.x - size / 2,
            y: center.y - size / 2,
            width: size,
            height: size,
        }
    }

    pub fn contains(&self, tile: Tile) -> bool {
        tile.x >= self.x && tile.x < self.x + self.width && tile.y >= self.y && tile.y < self.y + self.height
    }

    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        (self.y..self.y + self.height).flat_map(move |y| (self.x..self.x + self.width).map(move |x| Tile::new(x, y)))
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Uniform tile inside the rectangle. Draws `x` before `y`.
    pub fn random_tile<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Tile> {
        if self.is_empty() {
            return None;
        }
        let x = rng.gen_range(self.x..self.x + self.width);
        let y = rng.gen_range(self.y..self.y + self.height);
        Some(Tile::new(x, y))
    }
}

/// Axis-aligned rectangle in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    pub fn intersects(&self, other: &PixelRect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationKind {
    Farm,
    Town,
    Forest,
    Mountain,
    Beach,
    Desert,
    Railroad,
    Other,
}

/// A stocked or empty feeder placed in the world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeederObject {
    /// Id of the feeder definition this object was crafted from.
    pub feeder_id: String,
    pub tile: Tile,
    /// Positive while the feeder still holds food.
    pub minutes_until_ready: i32,
    /// Visual state of the feeder, ending in `:<asset index>` of the loaded food.
    pub texture_override: String,
}

impl FeederObject {
    pub fn is_stocked(&self) -> bool {
        self.minutes_until_ready > 0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PlacedObject {
    Feeder(FeederObject),
    Other { name: String, tile: Tile },
}

impl PlacedObject {
    pub fn tile(&self) -> Tile {
        match self {
            PlacedObject::Feeder(feeder) => feeder.tile,
            PlacedObject::Other { tile, .. } => *tile,
        }
    }

    pub fn as_feeder(&self) -> Option<&FeederObject> {
        match self {
            PlacedObject::Feeder(feeder) => Some(feeder),
            PlacedObject::Other { .. } => None,
        }
    }
}

/// Ties a perched bird to the feeder it sits on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeederAttachment {
    pub feeder_id: String,
    pub tile: Tile,
}

/// One call into the world's critter-creation capability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlockSpawnRequest {
    pub species_id: String,
    pub count: u32,
    pub anchor: Tile,
    pub feeder: Option<FeederAttachment>,
}

/// Read access to a game location plus the single write the spawner needs.
pub trait SpawnLocation {
    fn is_outdoors(&self) -> bool;

    fn kind(&self) -> LocationKind;

    /// Placed objects in the location's natural iteration order.
    fn objects(&self) -> Vec<&PlacedObject>;

    /// True when nothing obstructs any tile of `area`.
    fn is_area_clear(&self, area: TileRect) -> bool;

    /// Any tile of the location, drawn from the caller's random stream.
    fn random_tile(&self, rng: &mut dyn RngCore) -> Tile;

    fn is_tile_on_map(&self, tile: Tile) -> bool;

    fn critter_count(&self) -> usize;

    /// Instantiates `request.count` critters of the requested species
    /// starting at `request.anchor`. Placement jitter is up to the world.
    fn spawn_flock(&mut self, request: &FlockSpawnRequest);
}

/// What the local player can currently see.
pub trait Viewport {
    fn is_rect_visible(&self, rect: PixelRect) -> bool;

    fn is_tile_visible(&self, tile: Tile) -> bool {
        self.is_rect_visible(tile.to_pixel_rect())
    }
}
