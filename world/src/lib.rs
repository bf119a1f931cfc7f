#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state for Maze Escape.
//!
//! The [`World`] owns the level sequence and everything that changes while
//! playing it. Adapters mutate it exclusively through [`apply`] (or its
//! by-value twin [`step`]) and observe it through the [`query`] module.

use maze_escape_core::{CellCoord, Command, Direction, Event, Level, Tile};
use thiserror::Error;
use tracing::debug;

/// Errors raised when assembling a world from generated levels.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// The run was configured without any level.
    #[error("a run requires at least one level")]
    NoLevels,
    /// The key table does not cover every level exactly once.
    #[error("{flags} key requirement flags supplied for {levels} levels")]
    KeyTableMismatch {
        /// Number of levels supplied.
        levels: usize,
        /// Number of key requirement flags supplied.
        flags: usize,
    },
}

/// Represents the authoritative Maze Escape world state.
#[derive(Clone, Debug)]
pub struct World {
    levels: Vec<Level>,
    requires_key: Vec<bool>,
    level_index: usize,
    active: Level,
    player: CellCoord,
    has_key: bool,
    companion_earned: bool,
    companion: CellCoord,
    companion_target: CellCoord,
}

impl World {
    /// Creates a world positioned at the start of the first level.
    ///
    /// `requires_key[i]` gates the exit of `levels[i]`.
    pub fn new(levels: Vec<Level>, requires_key: Vec<bool>) -> Result<Self, WorldError> {
        if levels.len() != requires_key.len() {
            return Err(WorldError::KeyTableMismatch {
                levels: levels.len(),
                flags: requires_key.len(),
            });
        }
        let Some(first) = levels.first().cloned() else {
            return Err(WorldError::NoLevels);
        };

        let start = first.start();
        Ok(Self {
            levels,
            requires_key,
            level_index: 0,
            active: first,
            player: start,
            has_key: false,
            companion_earned: false,
            companion: start,
            companion_target: start,
        })
    }

    fn is_terminal(&self) -> bool {
        self.level_index >= self.levels.len()
    }

    fn shift_companion(&mut self) {
        self.companion = self.companion_target;
    }

    fn enter_level(&mut self, index: usize) {
        let Some(level) = self.levels.get(index) else {
            return;
        };
        // Work on a copy so collected keys reappear when the level is replayed.
        self.active = level.clone();
        self.level_index = index;
        self.player = self.active.start();
        self.has_key = false;
        self.companion = self.player;
        self.companion_target = self.player;
    }

    fn move_player(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if self.is_terminal() {
            return;
        }

        let from = self.player;
        let Some(to) = from
            .neighbor(direction)
            .filter(|cell| self.active.is_passable(*cell))
        else {
            out_events.push(Event::MoveBlocked { direction });
            return;
        };

        self.player = to;
        out_events.push(Event::PlayerMoved { from, to });
        self.enter_tile(to, out_events);
    }

    fn enter_tile(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        match self.active.tile(cell) {
            Some(Tile::Key) => {
                self.has_key = true;
                let _ = self.active.set_tile(cell, Tile::Floor);
                out_events.push(Event::KeyCollected { cell });
            }
            Some(Tile::Exit) => self.leave_level(out_events),
            _ => {}
        }
    }

    fn leave_level(&mut self, out_events: &mut Vec<Event>) {
        let gated = self
            .requires_key
            .get(self.level_index)
            .copied()
            .unwrap_or(false);
        if gated && !self.has_key {
            out_events.push(Event::ExitLocked {
                level: self.level_index,
            });
            return;
        }

        let next = self.level_index + 1;
        if next < self.levels.len() {
            self.enter_level(next);
            out_events.push(Event::LevelEntered { level: next });
        } else {
            self.level_index = next;
            out_events.push(Event::VictoryReached {
                companion_earned: self.companion_earned,
            });
        }
    }

    fn restart(&mut self, out_events: &mut Vec<Event>) {
        if !self.is_terminal() {
            return;
        }

        self.enter_level(0);
        out_events.push(Event::Restarted);
        if !self.companion_earned {
            self.companion_earned = true;
            out_events.push(Event::CompanionEarned);
        }
        out_events.push(Event::LevelEntered { level: 0 });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Illegal requests (walking into walls, moving after the ending, restarting
/// mid-run) leave the world untouched apart from the companion shift.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let first_new_event = out_events.len();
    world.shift_companion();

    match command {
        Command::Move { direction } => world.move_player(direction, out_events),
        Command::Restart => world.restart(out_events),
        Command::Quit => out_events.push(Event::QuitRequested),
    }

    world.companion_target = world.player;

    for event in &out_events[first_new_event..] {
        debug!(?event, "world event");
    }
}

/// Consumes the world and returns its successor after applying `command`.
#[must_use]
pub fn step(mut world: World, command: Command) -> World {
    let mut events = Vec::new();
    apply(&mut world, command, &mut events);
    world
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use maze_escape_core::{CellCoord, Level, Progress};

    /// Level the player is currently walking, including collected keys.
    ///
    /// After the ending this is the last level that was played.
    #[must_use]
    pub fn active_level(world: &World) -> &Level {
        &world.active
    }

    /// Pristine copy of the level at the provided index.
    #[must_use]
    pub fn level(world: &World, index: usize) -> Option<&Level> {
        world.levels.get(index)
    }

    /// Number of levels in the run.
    #[must_use]
    pub fn level_count(world: &World) -> usize {
        world.levels.len()
    }

    /// Zero-based index of the active level; equals [`level_count`] after the ending.
    #[must_use]
    pub fn level_index(world: &World) -> usize {
        world.level_index
    }

    /// Cell occupied by the player.
    #[must_use]
    pub fn player(world: &World) -> CellCoord {
        world.player
    }

    /// Whether the player holds the key of the active level.
    #[must_use]
    pub fn has_key(world: &World) -> bool {
        world.has_key
    }

    /// Key requirement flag for every level, in order.
    #[must_use]
    pub fn key_requirements(world: &World) -> &[bool] {
        &world.requires_key
    }

    /// Whether the active level's exit is gated behind its key.
    #[must_use]
    pub fn level_requires_key(world: &World) -> bool {
        world
            .requires_key
            .get(world.level_index)
            .copied()
            .unwrap_or(false)
    }

    /// Whether stepping onto the exit right now would be refused.
    #[must_use]
    pub fn exit_locked(world: &World) -> bool {
        level_requires_key(world) && !world.has_key
    }

    /// Whether the companion has been unlocked by a previous ending.
    #[must_use]
    pub fn companion_earned(world: &World) -> bool {
        world.companion_earned
    }

    /// Cell where the companion is displayed.
    #[must_use]
    pub fn companion(world: &World) -> CellCoord {
        world.companion
    }

    /// Cell the companion will move to on the next input.
    #[must_use]
    pub fn companion_target(world: &World) -> CellCoord {
        world.companion_target
    }

    /// Whether the companion should be drawn: earned, mid-level, not under the player.
    #[must_use]
    pub fn companion_visible(world: &World) -> bool {
        world.companion_earned && !world.is_terminal() && world.companion != world.player
    }

    /// Phase of the run.
    #[must_use]
    pub fn progress(world: &World) -> Progress {
        if !world.is_terminal() {
            Progress::Playing {
                level: world.level_index,
            }
        } else if world.companion_earned {
            Progress::VictoryWithCompanion
        } else {
            Progress::Victory
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_escape_core::Progress;

    fn corridor(requires_key: bool) -> World {
        let level = Level::parse(
            "
            #######
            #@.k.%#
            #######
            ",
        )
        .expect("valid level");
        World::new(vec![level], vec![requires_key]).expect("valid world")
    }

    fn walk(world: &mut World, direction: Direction, times: usize) -> Vec<Event> {
        let mut events = Vec::new();
        for _ in 0..times {
            apply(world, Command::Move { direction }, &mut events);
        }
        events
    }

    #[test]
    fn new_rejects_empty_and_mismatched_tables() {
        assert_eq!(World::new(Vec::new(), Vec::new()).err(), Some(WorldError::NoLevels));

        let level = Level::parse("#####\n#@.%#\n#####").expect("valid level");
        assert_eq!(
            World::new(vec![level], vec![true, false]).err(),
            Some(WorldError::KeyTableMismatch {
                levels: 1,
                flags: 2,
            })
        );
    }

    #[test]
    fn initial_state_starts_playing_at_level_start() {
        let world = corridor(false);

        assert_eq!(query::progress(&world), Progress::Playing { level: 0 });
        assert_eq!(query::player(&world), CellCoord::new(1, 1));
        assert!(!query::has_key(&world));
        assert_eq!(query::companion(&world), CellCoord::new(1, 1));
    }

    #[test]
    fn key_cell_turns_into_floor_once_collected() {
        let mut world = corridor(true);

        let events = walk(&mut world, Direction::Right, 2);

        assert!(query::has_key(&world));
        assert_eq!(
            query::active_level(&world).tile(CellCoord::new(3, 1)),
            Some(Tile::Floor)
        );
        assert_eq!(
            query::level(&world, 0).and_then(|level| level.tile(CellCoord::new(3, 1))),
            Some(Tile::Key),
            "pristine level keeps its key",
        );
        assert!(events.contains(&Event::KeyCollected {
            cell: CellCoord::new(3, 1),
        }));
    }

    #[test]
    fn ungated_exit_ends_single_level_run() {
        let mut world = corridor(false);

        let events = walk(&mut world, Direction::Right, 4);

        assert_eq!(query::progress(&world), Progress::Victory);
        assert_eq!(
            events.last(),
            Some(&Event::VictoryReached {
                companion_earned: false,
            })
        );
    }

    #[test]
    fn restart_mid_run_is_ignored() {
        let mut world = corridor(false);
        let _ = walk(&mut world, Direction::Right, 1);
        let mut events = Vec::new();

        apply(&mut world, Command::Restart, &mut events);

        assert!(events.is_empty());
        assert_eq!(query::player(&world), CellCoord::new(2, 1));
        assert!(!query::companion_earned(&world));
    }

    #[test]
    fn quit_only_reports_intent() {
        let mut world = corridor(false);
        let mut events = Vec::new();

        apply(&mut world, Command::Quit, &mut events);

        assert_eq!(events, vec![Event::QuitRequested]);
        assert_eq!(query::player(&world), CellCoord::new(1, 1));
    }

    #[test]
    fn step_matches_apply() {
        let mut applied = corridor(false);
        let mut events = Vec::new();
        apply(
            &mut applied,
            Command::Move {
                direction: Direction::Right,
            },
            &mut events,
        );

        let stepped = step(
            corridor(false),
            Command::Move {
                direction: Direction::Right,
            },
        );

        assert_eq!(query::player(&stepped), query::player(&applied));
        assert_eq!(query::companion(&stepped), query::companion(&applied));
    }
}
