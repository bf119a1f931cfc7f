//! Drunkard's-walk carving of a single candidate level.

use maze_escape_core::{CellCoord, Direction, GenerationError, Level, Tile, TileGrid, FIXED_START};
use rand::Rng;
use tracing::warn;

/// Walk iterations allowed before the stall policy applies.
pub const DEFAULT_STEP_LIMIT: u64 = 1_000_000;

/// Behaviour applied when the random walk exhausts its step budget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StallPolicy {
    /// Finish the level with a straight corridor from the cursor to the exit.
    #[default]
    Complete,
    /// Abort generation with [`GenerationError::CarveStalled`].
    Fail,
}

/// Tunables for [`carve`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CarveConfig {
    step_limit: u64,
    stall_policy: StallPolicy,
}

impl CarveConfig {
    /// Creates a configuration with an explicit step budget and stall policy.
    #[must_use]
    pub const fn new(step_limit: u64, stall_policy: StallPolicy) -> Self {
        Self {
            step_limit,
            stall_policy,
        }
    }

    /// Walk iterations allowed per candidate.
    #[must_use]
    pub const fn step_limit(&self) -> u64 {
        self.step_limit
    }

    /// Policy applied once the step budget is spent.
    #[must_use]
    pub const fn stall_policy(&self) -> StallPolicy {
        self.stall_policy
    }
}

impl Default for CarveConfig {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_LIMIT, StallPolicy::default())
    }
}

/// Exit cell for a grid of the provided dimensions.
#[must_use]
pub const fn exit_for(width: u32, height: u32) -> CellCoord {
    CellCoord::new(width.saturating_sub(3), height.saturating_sub(3))
}

/// Carves a walkable path from [`FIXED_START`] to the exit into `grid`.
///
/// The grid must be an all-wall grid produced by [`crate::wall_grid`].
pub fn carve<R>(
    mut grid: TileGrid,
    config: &CarveConfig,
    rng: &mut R,
) -> Result<Level, GenerationError>
where
    R: Rng + ?Sized,
{
    let width = grid.width();
    let height = grid.height();
    let start = FIXED_START;
    let exit = exit_for(width, height);

    let _ = grid.set(start, Tile::Floor);
    let _ = grid.set(exit, Tile::Exit);

    let seam = if rng.gen_bool(0.5) {
        Direction::Right
    } else {
        Direction::Down
    };
    if let Some(corridor) = start.neighbor(seam) {
        let _ = grid.set(corridor, Tile::Corridor);
    }

    let mut cursor = start;
    let mut steps = 0_u64;
    while cursor != exit {
        if steps >= config.step_limit() {
            match config.stall_policy() {
                StallPolicy::Fail => {
                    return Err(GenerationError::CarveStalled {
                        limit: config.step_limit(),
                    })
                }
                StallPolicy::Complete => {
                    warn!(
                        limit = config.step_limit(),
                        column = cursor.column(),
                        row = cursor.row(),
                        "carve stalled; finishing with a straight corridor"
                    );
                    carve_straight(&mut grid, cursor, exit);
                    break;
                }
            }
        }
        steps += 1;

        if grid.tile(cursor) != Some(Tile::Corridor) {
            let _ = grid.set(cursor, Tile::Floor);
        }

        let direction = next_direction(cursor, width, height, rng);
        let Some(next) = cursor.neighbor(direction) else {
            break;
        };
        cursor = next;
    }

    Ok(Level::from_parts(grid, start, exit))
}

/// Forced inward move near the interior boundary, otherwise a uniform pick.
fn next_direction<R>(cursor: CellCoord, width: u32, height: u32, rng: &mut R) -> Direction
where
    R: Rng + ?Sized,
{
    let (x, y) = (cursor.column(), cursor.row());
    if x <= 1 {
        Direction::Right
    } else if x + 2 >= width {
        Direction::Left
    } else if y <= 1 {
        Direction::Down
    } else if y + 2 >= height {
        Direction::Up
    } else {
        Direction::ALL[rng.gen_range(0..Direction::ALL.len())]
    }
}

/// Opens an L-shaped corridor: along the row first, then along the column.
fn carve_straight(grid: &mut TileGrid, from: CellCoord, to: CellCoord) {
    let mut cursor = from;
    while cursor != to {
        if matches!(grid.tile(cursor), Some(Tile::Wall)) {
            let _ = grid.set(cursor, Tile::Floor);
        }

        let direction = if cursor.column() < to.column() {
            Direction::Right
        } else if cursor.column() > to.column() {
            Direction::Left
        } else if cursor.row() < to.row() {
            Direction::Down
        } else {
            Direction::Up
        };
        let Some(next) = cursor.neighbor(direction) else {
            return;
        };
        cursor = next;
    }
}
