use rand::Rng;

use crate::location::{SpawnLocation, Tile, TileRect, Viewport};

/// Where the probe draws candidate tiles from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchArea {
    /// Tiles inside this rectangle. Draws that fall off the map are rejected.
    Within(TileRect),
    /// Any tile the location hands out.
    Anywhere,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub anchor: Option<Tile>,
    /// Tiles drawn before the probe stopped.
    pub trials: u32,
}

/// Square patch of `region_size` tiles around `anchor`, anchor in the middle.
pub fn spawn_region(anchor: Tile, region_size: u32) -> TileRect {
    TileRect::centered_at(anchor, region_size as i32)
}

/// Rejection-samples up to `max_trials` tiles looking for a clear patch.
///
/// A draw is rejected when it is off the map (`Within` only), when
/// `only_offscreen` is set and the tile is visible, or when the patch around
/// it is obstructed. Running out of trials is a normal outcome.
pub fn find_clear_region<L, V, R>(
    location: &L,
    viewport: &V,
    search_area: SearchArea,
    region_size: u32,
    only_offscreen: bool,
    max_trials: u32,
    rng: &mut R,
) -> ProbeOutcome
where
    L: SpawnLocation + ?Sized,
    V: Viewport + ?Sized,
    R: Rng,
{
    let mut trials = 0;
    while trials < max_trials {
        trials += 1;

        let tile = match search_area {
            SearchArea::Within(rect) => match rect.random_tile(rng) {
                Some(tile) if location.is_tile_on_map(tile) => tile,
                Some(_) => continue,
                None => break,
            },
            SearchArea::Anywhere => location.random_tile(&mut *rng),
        };

        if only_offscreen && viewport.is_tile_visible(tile) {
            continue;
        }

        let region = spawn_region(tile, region_size);
        if !location.is_area_clear(region) {
            continue;
        }

        log::debug!("Found clear region {:?} after {} trials", region, trials);
        return ProbeOutcome { anchor: Some(tile), trials };
    }

    log::debug!("No clear region in {:?} after {} trials", search_area, trials);
    ProbeOutcome { anchor: None, trials }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::{FixedViewport, SandboxLocation};
    use crate::location::LocationKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_spawn_region_is_centered() {
        assert_eq!(spawn_region(Tile::new(5, 5), 3), TileRect::new(4, 4, 3, 3));
        assert_eq!(spawn_region(Tile::new(5, 5), 1), TileRect::new(5, 5, 1, 1));
    }

    #[test]
    fn test_fully_blocked_area_uses_every_trial() {
        let mut location = SandboxLocation::new(20, 20, LocationKind::Forest);
        location.block_rect(TileRect::new(0, 0, 20, 20));
        let mut rng = StdRng::seed_from_u64(11);

        let outcome = find_clear_region(
            &location,
            &FixedViewport::nothing_visible(),
            SearchArea::Within(TileRect::new(2, 2, 10, 10)),
            3,
            false,
            50,
            &mut rng,
        );
        assert_eq!(outcome, ProbeOutcome { anchor: None, trials: 50 });
        assert_eq!(location.area_checks(), 50);
    }

    #[test]
    fn test_finds_the_only_clear_patch() {
        let mut location = SandboxLocation::new(12, 12, LocationKind::Forest);
        location.block_rect(TileRect::new(0, 0, 12, 12));
        location.clear_rect(TileRect::new(6, 6, 3, 3));
        let mut rng = StdRng::seed_from_u64(5);

        let mut found = None;
        for _ in 0..100 {
            let outcome = find_clear_region(
                &location,
                &FixedViewport::nothing_visible(),
                SearchArea::Within(TileRect::new(0, 0, 12, 12)),
                3,
                false,
                50,
                &mut rng,
            );
            if outcome.anchor.is_some() {
                found = outcome.anchor;
                break;
            }
        }
        assert_eq!(found, Some(Tile::new(7, 7)));
    }

    #[test]
    fn test_off_map_draws_are_rejected() {
        let location = SandboxLocation::new(4, 4, LocationKind::Forest);
        let mut rng = StdRng::seed_from_u64(8);
        let outcome = find_clear_region(
            &location,
            &FixedViewport::nothing_visible(),
            SearchArea::Within(TileRect::new(10, 10, 3, 3)),
            3,
            false,
            50,
            &mut rng,
        );
        assert_eq!(outcome.anchor, None);
        assert_eq!(outcome.trials, 50);
        assert_eq!(location.area_checks(), 0);
    }

    #[test]
    fn test_visible_tiles_rejected_only_when_offscreen_required() {
        let location = SandboxLocation::new(10, 10, LocationKind::Forest);
        let viewport = FixedViewport::showing_tiles(TileRect::new(0, 0, 10, 10));
        let area = SearchArea::Within(TileRect::new(3, 3, 4, 4));
        let mut rng = StdRng::seed_from_u64(2);

        let hidden_only = find_clear_region(&location, &viewport, area, 3, true, 50, &mut rng);
        assert_eq!(hidden_only.anchor, None);

        let anywhere = find_clear_region(&location, &viewport, area, 3, false, 50, &mut rng);
        assert!(anywhere.anchor.is_some());
        assert_eq!(anywhere.trials, 1);
    }

    #[test]
    fn test_anywhere_uses_location_tiles() {
        let location = SandboxLocation::new(30, 30, LocationKind::Farm);
        let mut rng = StdRng::seed_from_u64(21);
        let outcome = find_clear_region(
            &location,
            &FixedViewport::nothing_visible(),
            SearchArea::Anywhere,
            3,
            true,
            50,
            &mut rng,
        );
        let anchor = outcome.anchor.unwrap();
        assert!(location.is_tile_on_map(anchor));
    }
}
