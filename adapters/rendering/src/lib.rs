#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Escape adapters.
//!
//! [`compose`] reduces a [`World`] to a backend-agnostic [`Scene`]; backends
//! implementing [`RenderingBackend`] put scenes on screen and translate raw
//! input into [`Command`]s.

use anyhow::Result as AnyResult;
use maze_escape_core::{CellCoord, Command, Progress, Tile};
use maze_escape_world::{query, World};

/// Opaque RGB color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel intensity.
    pub red: u8,
    /// Green channel intensity.
    pub green: u8,
    /// Blue channel intensity.
    pub blue: u8,
}

impl Color {
    /// Creates a color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// Colors used by the default presentation.
pub mod palette {
    use super::Color;

    /// Maze walls.
    pub const WALL: Color = Color::from_rgb_u8(0xFF, 0xFF, 0xFF);
    /// Carved ground, corridor seam and start marker.
    pub const FLOOR: Color = Color::from_rgb_u8(0x66, 0x66, 0x66);
    /// Open stairs.
    pub const STAIRS: Color = Color::from_rgb_u8(0x87, 0xCE, 0xEB);
    /// Stairs that still need the level's key.
    pub const LOCKED_STAIRS: Color = Color::from_rgb_u8(0x4A, 0x55, 0x68);
    /// The player, and the victory banner.
    pub const PLAYER: Color = Color::from_rgb_u8(0xFF, 0xD7, 0x00);
    /// The companion and its portrait.
    pub const COMPANION: Color = Color::from_rgb_u8(0xFF, 0xA5, 0x00);
    /// Key pickup.
    pub const KEY: Color = Color::from_rgb_u8(0xC0, 0xC0, 0xC0);
    /// Control hints.
    pub const HELP: Color = Color::from_rgb_u8(0x88, 0x88, 0x88);
    /// Objective line.
    pub const INSTRUCTION: Color = Color::from_rgb_u8(0x00, 0xCC, 0x00);
}

/// Symbol drawn for the key pickup and the inventory line.
pub const KEY_SYMBOL: char = '⚷';

/// Single styled character cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph {
    /// Character to draw.
    pub symbol: char,
    /// Foreground color.
    pub color: Color,
    /// Whether the character is drawn bold.
    pub bold: bool,
}

impl Glyph {
    const fn plain(symbol: char, color: Color) -> Self {
        Self {
            symbol,
            color,
            bold: false,
        }
    }

    const fn bold(symbol: char, color: Color) -> Self {
        Self {
            symbol,
            color,
            bold: true,
        }
    }
}

/// Line of text sharing one style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyledLine {
    /// Text content; may be empty to produce spacing.
    pub text: String,
    /// Foreground color.
    pub color: Color,
    /// Whether the text is drawn bold.
    pub bold: bool,
}

impl StyledLine {
    fn new(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color,
            bold: false,
        }
    }

    fn blank() -> Self {
        Self::new(String::new(), palette::HELP)
    }

    fn emphasised(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// Glyph grid of the active level followed by heads-up lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeView {
    /// Number of glyph columns.
    pub width: u32,
    /// Number of glyph rows.
    pub height: u32,
    /// Row-major glyphs, `width * height` entries.
    pub glyphs: Vec<Glyph>,
    /// Lines drawn underneath the maze.
    pub hud: Vec<StyledLine>,
}

impl MazeView {
    /// Iterates over the glyph grid one row at a time.
    pub fn rows(&self) -> impl Iterator<Item = &[Glyph]> + '_ {
        let width = usize::try_from(self.width).unwrap_or(0).max(1);
        self.glyphs.chunks(width)
    }

    /// Glyph drawn at the provided cell.
    #[must_use]
    pub fn glyph(&self, cell: CellCoord) -> Option<Glyph> {
        if cell.column() >= self.width || cell.row() >= self.height {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        self.glyphs.get(row * width + column).copied()
    }
}

/// Centred message shown once every level has been cleared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndingView {
    /// Lines drawn top to bottom, each centred horizontally.
    pub lines: Vec<StyledLine>,
}

/// Everything a backend needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scene {
    /// A level is being played.
    Maze(MazeView),
    /// The run reached one of its endings.
    Ending(EndingView),
}

/// Builds the scene describing the current world state.
#[must_use]
pub fn compose(world: &World) -> Scene {
    match query::progress(world) {
        Progress::Playing { .. } => Scene::Maze(compose_maze(world)),
        Progress::Victory => Scene::Ending(first_ending()),
        Progress::VictoryWithCompanion => Scene::Ending(companion_ending()),
    }
}

fn compose_maze(world: &World) -> MazeView {
    let level = query::active_level(world);
    let player = query::player(world);
    let companion = query::companion_visible(world).then(|| query::companion(world));
    let exit = if query::exit_locked(world) {
        Glyph::plain('%', palette::LOCKED_STAIRS)
    } else {
        Glyph::bold('%', palette::STAIRS)
    };

    let glyphs = level
        .grid()
        .cells()
        .map(|(cell, tile)| {
            if cell == player {
                return Glyph::bold('@', palette::PLAYER);
            }
            if companion == Some(cell) {
                return Glyph::bold('o', palette::COMPANION);
            }
            match tile {
                Tile::Wall => Glyph::plain('#', palette::WALL),
                Tile::Exit => exit,
                Tile::Key => Glyph::plain(KEY_SYMBOL, palette::KEY),
                Tile::Start => Glyph::plain('s', palette::FLOOR),
                Tile::Floor | Tile::Corridor => Glyph::plain(tile.symbol(), palette::FLOOR),
            }
        })
        .collect();

    let inventory = if query::has_key(world) {
        format!("Inventory - {KEY_SYMBOL}")
    } else {
        String::new()
    };
    let hud = vec![
        StyledLine::blank(),
        StyledLine::new("Arrow keys or hjkl to move • q/esc to quit", palette::HELP),
        StyledLine::new(inventory, palette::HELP),
        StyledLine::new(
            format!(
                "Level {} of {}",
                query::level_index(world) + 1,
                query::level_count(world)
            ),
            palette::HELP,
        ),
        StyledLine::blank(),
        StyledLine::new(
            "Get to the stairs (%) in all levels to escape!",
            palette::INSTRUCTION,
        )
        .emphasised(),
    ];

    MazeView {
        width: level.width(),
        height: level.height(),
        glyphs,
        hud,
    }
}

fn first_ending() -> EndingView {
    EndingView {
        lines: vec![
            StyledLine::new("You notice a face peering from the darkness", palette::PLAYER),
            StyledLine::blank(),
            StyledLine::new("^._.^", palette::COMPANION),
            StyledLine::blank(),
            StyledLine::new("A mysterious cat was watching your journey.", palette::PLAYER),
            StyledLine::new("Show them the way out?", palette::PLAYER),
            StyledLine::blank(),
            StyledLine::new("Press 'r' to retrieve cat", palette::PLAYER),
        ],
    }
}

fn companion_ending() -> EndingView {
    EndingView {
        lines: vec![
            StyledLine::new("🎉 VICTORY! 🎉", palette::PLAYER).emphasised(),
            StyledLine::blank(),
            StyledLine::new("You saved the cat!", palette::PLAYER),
            StyledLine::blank(),
            StyledLine::new("ฅ^•ﻌ•^ฅ", palette::COMPANION),
            StyledLine::blank(),
            StyledLine::new("You and your faithful companion made it!", palette::PLAYER),
            StyledLine::blank(),
            StyledLine::new("Press 'q' to quit | Press 'r' to restart", palette::PLAYER),
        ],
    }
}

/// Rendering backend capable of presenting Maze Escape scenes.
pub trait RenderingBackend {
    /// Runs the backend until `update_scene` asks it to stop.
    ///
    /// The backend draws `initial`, then forwards every decoded [`Command`] to
    /// `update_scene`. A returned scene replaces the current one; `None` ends
    /// the loop.
    fn run<F>(self, initial: Scene, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Command) -> Option<Scene>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_escape_core::{Direction, Level};
    use maze_escape_world as world;

    fn gated_world() -> World {
        let level = Level::parse(
            "
            ######
            #@k.%#
            ######
            ",
        )
        .expect("valid level");
        World::new(vec![level], vec![true]).expect("valid world")
    }

    fn send(world: &mut World, command: Command) {
        let mut events = Vec::new();
        world::apply(world, command, &mut events);
    }

    fn right() -> Command {
        Command::Move {
            direction: Direction::Right,
        }
    }

    fn maze(scene: Scene) -> MazeView {
        match scene {
            Scene::Maze(view) => view,
            Scene::Ending(_) => panic!("expected a maze scene"),
        }
    }

    #[test]
    fn maze_scene_draws_player_key_and_locked_exit() {
        let view = maze(compose(&gated_world()));

        assert_eq!(view.width, 6);
        assert_eq!(view.rows().count(), 3);
        assert_eq!(
            view.glyph(CellCoord::new(1, 1)).map(|glyph| glyph.symbol),
            Some('@')
        );
        assert_eq!(
            view.glyph(CellCoord::new(2, 1)).map(|glyph| glyph.symbol),
            Some(KEY_SYMBOL)
        );
        assert_eq!(
            view.glyph(CellCoord::new(4, 1)).map(|glyph| glyph.color),
            Some(palette::LOCKED_STAIRS)
        );
        assert_eq!(view.glyph(CellCoord::new(6, 1)), None);
    }

    #[test]
    fn collecting_the_key_unlocks_exit_and_fills_inventory() {
        let mut world = gated_world();
        send(&mut world, right());

        let view = maze(compose(&world));

        assert_eq!(
            view.glyph(CellCoord::new(4, 1)).map(|glyph| glyph.color),
            Some(palette::STAIRS)
        );
        assert!(view.hud.iter().any(|line| line.text == "Inventory - ⚷"));
    }

    #[test]
    fn endings_differ_once_companion_is_earned() {
        let mut world = gated_world();
        for _ in 0..3 {
            send(&mut world, right());
        }
        let Scene::Ending(first) = compose(&world) else {
            panic!("expected the first ending");
        };
        assert!(first.lines.iter().any(|line| line.text == "^._.^"));

        send(&mut world, Command::Restart);
        for _ in 0..3 {
            send(&mut world, right());
        }
        let Scene::Ending(second) = compose(&world) else {
            panic!("expected the companion ending");
        };
        assert!(second.lines.iter().any(|line| line.text == "You saved the cat!"));
    }

    #[test]
    fn companion_glyph_trails_after_restart() {
        let mut world = gated_world();
        for _ in 0..3 {
            send(&mut world, right());
        }
        send(&mut world, Command::Restart);
        send(&mut world, right());
        send(&mut world, right());

        let view = maze(compose(&world));

        assert_eq!(
            view.glyph(CellCoord::new(2, 1)).map(|glyph| glyph.symbol),
            Some('o')
        );
        assert_eq!(
            view.glyph(CellCoord::new(3, 1)).map(|glyph| glyph.symbol),
            Some('@')
        );
    }
}
