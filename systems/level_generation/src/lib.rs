#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural level generation for Maze Escape.
//!
//! Generation runs in three stages: [`wall_grid`] allocates a solid grid,
//! [`carve`] digs a drunkard's walk from the fixed start to the exit, and
//! [`select`] keeps the candidate with the most walls left standing. Key-gated
//! levels then receive a pickup through [`place_key`].

mod carve;
mod seed;

pub use carve::{carve, exit_for, CarveConfig, StallPolicy, DEFAULT_STEP_LIMIT};
pub use seed::{derive_level_seed, level_rng, RNG_STREAM_CARVE, RNG_STREAM_KEY};

use maze_escape_core::{CellCoord, GenerationError, Level, Tile, TileGrid, MIN_LEVEL_DIMENSION};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

/// Level produced by [`generate_crowded_level`] together with its gate flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedLevel {
    level: Level,
    requires_key: bool,
}

impl GeneratedLevel {
    /// Selected level geometry.
    #[must_use]
    pub const fn level(&self) -> &Level {
        &self.level
    }

    /// Whether the level's exit is gated behind a key.
    #[must_use]
    pub const fn requires_key(&self) -> bool {
        self.requires_key
    }

    /// Splits the value into its level and gate flag.
    #[must_use]
    pub fn into_parts(self) -> (Level, bool) {
        (self.level, self.requires_key)
    }
}

/// Allocates a grid where every cell is a wall.
pub fn wall_grid(width: u32, height: u32) -> Result<TileGrid, GenerationError> {
    if width < MIN_LEVEL_DIMENSION || height < MIN_LEVEL_DIMENSION {
        return Err(GenerationError::InvalidDimensions { width, height });
    }
    Ok(TileGrid::filled(width, height, Tile::Wall))
}

/// Index of the candidate with the strictly greatest wall count.
///
/// Ties resolve to the earliest candidate; an empty slice yields `None`.
#[must_use]
pub fn pick_most_crowded(candidates: &[Level]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let walls = candidate.wall_count();
        match best {
            Some((_, most)) if walls <= most => {}
            _ => best = Some((index, walls)),
        }
    }
    best.map(|(index, _)| index)
}

/// Carves `amount` independent candidates and returns the most crowded one.
pub fn select<R>(
    width: u32,
    height: u32,
    amount: u32,
    config: &CarveConfig,
    rng: &mut R,
) -> Result<Level, GenerationError>
where
    R: Rng + ?Sized,
{
    let _ = wall_grid(width, height)?;
    if amount == 0 {
        return Err(GenerationError::NoCandidates);
    }

    let mut candidates = Vec::new();
    for candidate in 0..amount {
        let level = carve(wall_grid(width, height)?, config, rng)?;
        debug!(candidate, walls = level.wall_count(), "carved candidate");
        candidates.push(level);
    }

    let chosen = pick_most_crowded(&candidates).ok_or(GenerationError::NoCandidates)?;
    Ok(candidates.swap_remove(chosen))
}

/// Generates the most crowded of `amount` candidates and tags it with its gate flag.
///
/// The gate flag never influences geometry.
pub fn generate_crowded_level<R>(
    width: u32,
    height: u32,
    amount: u32,
    requires_key: bool,
    config: &CarveConfig,
    rng: &mut R,
) -> Result<GeneratedLevel, GenerationError>
where
    R: Rng + ?Sized,
{
    let level = select(width, height, amount, config, rng)?;
    info!(
        width,
        height,
        candidates = amount,
        walls = level.wall_count(),
        requires_key,
        "selected level"
    );
    Ok(GeneratedLevel {
        level,
        requires_key,
    })
}

/// Places a key pickup on a uniformly chosen floor cell.
///
/// The start and exit cells are never chosen. Every floor cell lies on the
/// carved walk, so the key is reachable from the start.
pub fn place_key<R>(level: &mut Level, rng: &mut R) -> Result<CellCoord, GenerationError>
where
    R: Rng + ?Sized,
{
    let start = level.start();
    let sites: Vec<CellCoord> = level
        .grid()
        .cells()
        .filter(|(cell, tile)| *tile == Tile::Floor && *cell != start && *cell != level.exit())
        .map(|(cell, _)| cell)
        .collect();

    let site = *sites.choose(rng).ok_or(GenerationError::NoKeySite)?;
    let _ = level.set_tile(site, Tile::Key);
    Ok(site)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(text: &str) -> Level {
        Level::parse(text).expect("valid level")
    }

    #[test]
    fn wall_grid_is_solid() {
        let grid = wall_grid(7, 6).expect("valid dimensions");

        assert_eq!(grid.count(Tile::Wall), 42);
    }

    #[test]
    fn wall_grid_rejects_small_dimensions() {
        assert_eq!(
            wall_grid(5, 11),
            Err(GenerationError::InvalidDimensions {
                width: 5,
                height: 11,
            })
        );
        assert_eq!(
            wall_grid(19, 0),
            Err(GenerationError::InvalidDimensions {
                width: 19,
                height: 0,
            })
        );
    }

    #[test]
    fn most_crowded_prefers_more_walls() {
        let open = level("#####\n#@..#\n#..%#\n#####");
        let crowded = level("#####\n#@.##\n##.%#\n#####");

        assert_eq!(pick_most_crowded(&[open.clone(), crowded]), Some(1));
        assert_eq!(pick_most_crowded(&[open]), Some(0));
        assert_eq!(pick_most_crowded(&[]), None);
    }

    #[test]
    fn most_crowded_tie_keeps_first() {
        let left = level("#####\n#@.##\n##.%#\n#####");
        let right = level("#####\n#@###\n#..%#\n#####");
        assert_eq!(left.wall_count(), right.wall_count());

        assert_eq!(pick_most_crowded(&[left, right]), Some(0));
    }

    #[test]
    fn key_lands_on_floor_away_from_start_and_exit() {
        let mut level = level("######\n#@..%#\n######");
        let mut rng = level_rng(3, 0, RNG_STREAM_KEY);

        let site = place_key(&mut level, &mut rng).expect("floor available");

        assert!(site == CellCoord::new(2, 1) || site == CellCoord::new(3, 1));
        assert_eq!(level.tile(site), Some(Tile::Key));
    }

    #[test]
    fn key_needs_a_floor_cell() {
        let mut level = level("####\n#@%#\n####");
        let mut rng = level_rng(3, 0, RNG_STREAM_KEY);

        assert_eq!(place_key(&mut level, &mut rng), Err(GenerationError::NoKeySite));
    }
}
