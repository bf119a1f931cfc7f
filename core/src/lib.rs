#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Escape engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters translate player input into
//! [`Command`] values, the world executes those commands via its `apply` entry
//! point, and then reports [`Event`] values describing what changed. Level
//! data ([`TileGrid`], [`Level`]) lives here so the generator and the world can
//! share it without depending on each other.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cell the player occupies when entering any generated level.
pub const FIXED_START: CellCoord = CellCoord::new(2, 2);

/// Smallest width or height able to hold the start, the exit and the
/// guaranteed corridor strictly inside a wall border without overlapping.
pub const MIN_LEVEL_DIMENSION: u32 = 6;

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Requests that the player step one cell in the provided direction.
    Move {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests a fresh run after reaching the ending, unlocking the companion.
    Restart,
    /// Requests that the adapter terminate the run.
    Quit,
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after completing the move.
        to: CellCoord,
    },
    /// Reports that a movement request hit a wall or the grid edge.
    MoveBlocked {
        /// Direction of the rejected step.
        direction: Direction,
    },
    /// Confirms that the player picked up the level key.
    KeyCollected {
        /// Cell that held the key before it turned into floor.
        cell: CellCoord,
    },
    /// Reports that the player stood on a key-gated exit without the key.
    ExitLocked {
        /// Zero-based index of the level whose exit stayed shut.
        level: usize,
    },
    /// Announces that the player entered a level at its start cell.
    LevelEntered {
        /// Zero-based index of the level that became active.
        level: usize,
    },
    /// Announces that the player cleared the final level.
    VictoryReached {
        /// Whether the companion accompanied the player on this run.
        companion_earned: bool,
    },
    /// Announces that the trailing companion has been unlocked.
    CompanionEarned,
    /// Confirms that the run restarted from the first level.
    Restarted,
    /// Signals that the adapter should end the run.
    QuitRequested,
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction, in the order the random walk samples them.
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
    ];
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Cell one step away in the provided direction.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant;
    /// upper bounds are the grid's concern.
    #[must_use]
    pub fn neighbor(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::Up => self.row.checked_sub(1).map(|row| Self::new(self.column, row)),
            Direction::Down => self.row.checked_add(1).map(|row| Self::new(self.column, row)),
            Direction::Left => self
                .column
                .checked_sub(1)
                .map(|column| Self::new(column, self.row)),
            Direction::Right => self
                .column
                .checked_add(1)
                .map(|column| Self::new(column, self.row)),
        }
    }
}

/// Semantic contents of a single level cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Solid rock that blocks movement.
    Wall,
    /// Open ground carved by the generator.
    Floor,
    /// Cosmetic marker for the level entry.
    Start,
    /// Stairs that lead to the next level.
    Exit,
    /// Key pickup that unlocks a gated exit.
    Key,
    /// Cell opened next to the start so it always has an open neighbour.
    Corridor,
}

impl Tile {
    /// Reports whether the player may stand on the tile.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Tile::Wall)
    }

    /// Character used by the plain-text level format.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Tile::Wall => '#',
            Tile::Floor => '.',
            Tile::Start => '@',
            Tile::Exit => '%',
            Tile::Key => 'k',
            Tile::Corridor => '-',
        }
    }

    /// Parses a character of the plain-text level format.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '#' => Some(Tile::Wall),
            '.' => Some(Tile::Floor),
            '@' => Some(Tile::Start),
            '%' => Some(Tile::Exit),
            'k' => Some(Tile::Key),
            '-' => Some(Tile::Corridor),
            _ => None,
        }
    }
}

/// Dense row-major grid of tiles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Creates a grid of the provided dimensions with every cell set to `tile`.
    #[must_use]
    pub fn filled(width: u32, height: u32, tile: Tile) -> Self {
        let capacity = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0);
        Self {
            width,
            height,
            tiles: vec![tile; capacity],
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the cell lies within the grid bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Tile stored at the provided cell, if it lies within the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<Tile> {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Overwrites the tile at the provided cell, returning the previous tile.
    ///
    /// Cells outside the grid are ignored and yield `None`.
    pub fn set(&mut self, cell: CellCoord, tile: Tile) -> Option<Tile> {
        let index = self.index(cell)?;
        let slot = self.tiles.get_mut(index)?;
        Some(std::mem::replace(slot, tile))
    }

    /// Counts the cells holding the provided tile.
    #[must_use]
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|candidate| **candidate == tile).count()
    }

    /// Iterates over every cell in row-major order alongside its tile.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, Tile)> + '_ {
        let width = self.width.max(1);
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            (CellCoord::new(index % width, index / width), *tile)
        })
    }

    /// Iterates over the grid one row at a time.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> + '_ {
        let width = usize::try_from(self.width).unwrap_or(0).max(1);
        self.tiles.chunks(width)
    }

    /// Reports whether the cell lies on the outermost ring of the grid.
    #[must_use]
    pub const fn is_border(&self, cell: CellCoord) -> bool {
        cell.column() == 0
            || cell.row() == 0
            || cell.column() + 1 == self.width
            || cell.row() + 1 == self.height
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

/// Playable level: a tile grid plus its entry and exit cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    grid: TileGrid,
    start: CellCoord,
    exit: CellCoord,
}

impl Level {
    /// Assembles a level from an already carved grid.
    ///
    /// The caller guarantees that `exit` holds [`Tile::Exit`] and that both
    /// cells lie within the grid.
    #[must_use]
    pub const fn from_parts(grid: TileGrid, start: CellCoord, exit: CellCoord) -> Self {
        Self { grid, start, exit }
    }

    /// Parses a level from the plain-text format produced by [`Level::to_rows`].
    ///
    /// Blank lines and surrounding whitespace are ignored. When no start marker
    /// is present the player enters at [`FIXED_START`].
    pub fn parse(text: &str) -> Result<Self, LevelParseError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let Some(first) = rows.first() else {
            return Err(LevelParseError::Empty);
        };

        let expected = first.chars().count();
        let width = u32::try_from(expected).map_err(|_| LevelParseError::TooLarge)?;
        let height = u32::try_from(rows.len()).map_err(|_| LevelParseError::TooLarge)?;
        let mut grid = TileGrid::filled(width, height, Tile::Wall);
        let mut starts = Vec::new();
        let mut exits = Vec::new();

        for (row_index, line) in rows.iter().enumerate() {
            let row = u32::try_from(row_index).map_err(|_| LevelParseError::TooLarge)?;
            let found = line.chars().count();
            if found != expected {
                return Err(LevelParseError::Ragged {
                    row,
                    expected,
                    found,
                });
            }

            for (column_index, symbol) in line.chars().enumerate() {
                let column =
                    u32::try_from(column_index).map_err(|_| LevelParseError::TooLarge)?;
                let cell = CellCoord::new(column, row);
                let tile = Tile::from_symbol(symbol).ok_or(LevelParseError::UnknownSymbol {
                    symbol,
                    column,
                    row,
                })?;
                match tile {
                    Tile::Start => starts.push(cell),
                    Tile::Exit => exits.push(cell),
                    _ => {}
                }
                if tile != Tile::Wall && grid.is_border(cell) {
                    return Err(LevelParseError::OpenBorder { column, row });
                }
                let _ = grid.set(cell, tile);
            }
        }

        let exit = match exits.as_slice() {
            [] => return Err(LevelParseError::MissingExit),
            [exit] => *exit,
            _ => return Err(LevelParseError::MultipleExits),
        };
        let start = match starts.as_slice() {
            [] => FIXED_START,
            [start] => *start,
            _ => return Err(LevelParseError::MultipleStarts),
        };
        if !grid.tile(start).is_some_and(Tile::is_passable) {
            return Err(LevelParseError::StartBlocked {
                column: start.column(),
                row: start.row(),
            });
        }

        Ok(Self { grid, start, exit })
    }

    /// Renders the level into rows of the plain-text format.
    #[must_use]
    pub fn to_rows(&self) -> Vec<String> {
        self.grid
            .rows()
            .map(|row| row.iter().map(|tile| tile.symbol()).collect())
            .collect()
    }

    /// Underlying tile grid.
    #[must_use]
    pub const fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Cell the player occupies when entering the level.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Cell holding the exit marker.
    #[must_use]
    pub const fn exit(&self) -> CellCoord {
        self.exit
    }

    /// Number of columns in the level.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.grid.width()
    }

    /// Number of rows in the level.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.grid.height()
    }

    /// Tile stored at the provided cell, if it lies within the level.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<Tile> {
        self.grid.tile(cell)
    }

    /// Reports whether the player may stand on the cell.
    #[must_use]
    pub fn is_passable(&self, cell: CellCoord) -> bool {
        self.grid.tile(cell).is_some_and(Tile::is_passable)
    }

    /// Number of wall tiles remaining, the crowdedness metric.
    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.grid.count(Tile::Wall)
    }

    /// Overwrites a single tile, returning the previous one.
    pub fn set_tile(&mut self, cell: CellCoord, tile: Tile) -> Option<Tile> {
        self.grid.set(cell, tile)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

/// Per-level generation request supplied by configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelSpec {
    /// Number of columns in the generated level.
    pub width: u32,
    /// Number of rows in the generated level.
    pub height: u32,
    /// Candidates carved before keeping the most crowded one.
    #[serde(default = "default_candidates")]
    pub candidates: u32,
    /// Whether the exit stays shut until the level key is collected.
    #[serde(default)]
    pub requires_key: bool,
}

impl LevelSpec {
    /// Creates a new level specification.
    #[must_use]
    pub const fn new(width: u32, height: u32, candidates: u32, requires_key: bool) -> Self {
        Self {
            width,
            height,
            candidates,
            requires_key,
        }
    }
}

const fn default_candidates() -> u32 {
    1
}

/// Coarse phase of a run, derived from the level index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Progress {
    /// The player is inside the level with the provided zero-based index.
    Playing {
        /// Zero-based index of the active level.
        level: usize,
    },
    /// Every level has been cleared and the companion is still locked.
    Victory,
    /// Every level has been cleared with the companion in tow.
    VictoryWithCompanion,
}

impl Progress {
    /// Reports whether the run reached one of the endings.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Progress::Playing { .. })
    }
}

/// Errors raised while generating levels.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// The requested dimensions cannot hold the start and exit inside a wall border.
    #[error(
        "level dimensions {width}x{height} are too small; both must be at least {MIN_LEVEL_DIMENSION}"
    )]
    InvalidDimensions {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
    /// Selection was asked to choose among zero candidates.
    #[error("at least one candidate level must be generated")]
    NoCandidates,
    /// The random walk exceeded its step budget without reaching the exit.
    #[error("carve exceeded {limit} steps without reaching the exit")]
    CarveStalled {
        /// Step budget that was exhausted.
        limit: u64,
    },
    /// A key-gated level offered no floor cell to hold the key.
    #[error("level has no floor cell available for a key")]
    NoKeySite,
}

/// Errors raised while parsing the plain-text level format.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LevelParseError {
    /// The text contained no rows.
    #[error("level text is empty")]
    Empty,
    /// The level exceeds the addressable coordinate range.
    #[error("level is too large")]
    TooLarge,
    /// A row's length differs from the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// Zero-based index of the offending row.
        row: u32,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// A character does not name any tile.
    #[error("unknown tile symbol {symbol:?} at ({column}, {row})")]
    UnknownSymbol {
        /// Offending character.
        symbol: char,
        /// Column of the character.
        column: u32,
        /// Row of the character.
        row: u32,
    },
    /// A border cell is not a wall.
    #[error("border cell ({column}, {row}) is not a wall")]
    OpenBorder {
        /// Column of the open border cell.
        column: u32,
        /// Row of the open border cell.
        row: u32,
    },
    /// No exit marker was found.
    #[error("level has no exit")]
    MissingExit,
    /// More than one exit marker was found.
    #[error("level has more than one exit")]
    MultipleExits,
    /// More than one start marker was found.
    #[error("level has more than one start")]
    MultipleStarts,
    /// The entry cell is a wall or lies outside the level.
    #[error("start cell ({column}, {row}) is not walkable")]
    StartBlocked {
        /// Column of the start cell.
        column: u32,
        /// Row of the start cell.
        row: u32,
    },
}
