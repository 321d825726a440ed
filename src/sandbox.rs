//! In-memory world used for offline simulation and tests.

use std::cell::Cell;
use std::collections::HashSet;

use rand::{Rng, RngCore};

use crate::location::{
    FlockSpawnRequest, LocationKind, PixelRect, PlacedObject, SpawnLocation, Tile, TileRect, Viewport,
};
use crate::TILE_SIZE_PX;

/// Rectangular tile map. Placed objects and blocked tiles obstruct spawning;
/// spawned flocks are recorded, not simulated.
#[derive(Debug)]
pub struct SandboxLocation {
    width: i32,
    height: i32,
    kind: LocationKind,
    outdoors: bool,
    objects: Vec<PlacedObject>,
    blocked: HashSet<Tile>,
    critters: usize,
    spawned: Vec<FlockSpawnRequest>,
    area_checks: Cell<u32>,
}

impl SandboxLocation {
    pub fn new(width: i32, height: i32, kind: LocationKind) -> Self {
        SandboxLocation {
            width,
            height,
            kind,
            outdoors: true,
            objects: Vec::new(),
            blocked: HashSet::new(),
            critters: 0,
            spawned: Vec::new(),
            area_checks: Cell::new(0),
        }
    }

    pub fn indoors(mut self) -> Self {
        self.outdoors = false;
        self
    }

    pub fn with_critters(mut self, critters: usize) -> Self {
        self.critters = critters;
        self
    }

    /// Places an object; its tile becomes obstructed.
    pub fn place(&mut self, object: PlacedObject) {
        self.blocked.insert(object.tile());
        self.objects.push(object);
    }

    pub fn block_rect(&mut self, rect: TileRect) {
        self.blocked.extend(rect.tiles());
    }

    pub fn clear_rect(&mut self, rect: TileRect) {
        for tile in rect.tiles() {
            self.blocked.remove(&tile);
        }
    }

    pub fn spawned(&self) -> &[FlockSpawnRequest] {
        &self.spawned
    }

    /// Number of `is_area_clear` calls so far.
    pub fn area_checks(&self) -> u32 {
        self.area_checks.get()
    }

    pub fn bounds(&self) -> TileRect {
        TileRect::new(0, 0, self.width, self.height)
    }
}

impl SpawnLocation for SandboxLocation {
    fn is_outdoors(&self) -> bool {
        self.outdoors
    }

    fn kind(&self) -> LocationKind {
        self.kind
    }

    fn objects(&self) -> Vec<&PlacedObject> {
        self.objects.iter().collect()
    }

    fn is_area_clear(&self, area: TileRect) -> bool {
        self.area_checks.set(self.area_checks.get() + 1);
        area.tiles().all(|tile| self.is_tile_on_map(tile) && !self.blocked.contains(&tile))
    }

    fn random_tile(&self, rng: &mut dyn RngCore) -> Tile {
        let x = rng.gen_range(0..self.width.max(1));
        let y = rng.gen_range(0..self.height.max(1));
        Tile::new(x, y)
    }

    fn is_tile_on_map(&self, tile: Tile) -> bool {
        self.bounds().contains(tile)
    }

    fn critter_count(&self) -> usize {
        self.critters
    }

    fn spawn_flock(&mut self, request: &FlockSpawnRequest) {
        self.critters += request.count as usize;
        self.spawned.push(request.clone());
    }
}

/// Viewport fixed to one screen rectangle, or showing nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedViewport {
    visible: Option<PixelRect>,
}

impl FixedViewport {
    pub fn nothing_visible() -> Self {
        FixedViewport { visible: None }
    }

    pub fn showing(rect: PixelRect) -> Self {
        FixedViewport { visible: Some(rect) }
    }

    pub fn showing_tiles(rect: TileRect) -> Self {
        FixedViewport::showing(PixelRect {
            x: rect.x * TILE_SIZE_PX,
            y: rect.y * TILE_SIZE_PX,
            width: rect.width * TILE_SIZE_PX,
            height: rect.height * TILE_SIZE_PX,
        })
    }
}

impl Viewport for FixedViewport {
    fn is_rect_visible(&self, rect: PixelRect) -> bool {
        self.visible.map_or(false, |visible| visible.intersects(&rect))
    }
}
