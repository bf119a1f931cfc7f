use std::collections::{HashMap, VecDeque};

use maze_escape_core::{CellCoord, Command, Direction, Event, Level, LevelSpec, Progress, Tile};
use maze_escape_system_bootstrap::{new_game, Bootstrap};
use maze_escape_system_level_generation::CarveConfig;
use maze_escape_world::{self as world, query, World};

fn default_specs() -> Vec<LevelSpec> {
    vec![
        LevelSpec::new(19, 11, 1, false),
        LevelSpec::new(19, 11, 2, false),
        LevelSpec::new(19, 11, 3, true),
        LevelSpec::new(19, 11, 50, true),
    ]
}

fn route(level: &Level, from: CellCoord, to: CellCoord) -> Vec<Direction> {
    let mut came_from: HashMap<CellCoord, (CellCoord, Direction)> = HashMap::new();
    let mut frontier = VecDeque::from([from]);
    while let Some(cell) = frontier.pop_front() {
        if cell == to {
            break;
        }
        for direction in Direction::ALL {
            let Some(next) = cell.neighbor(direction) else {
                continue;
            };
            if next == from || came_from.contains_key(&next) || !level.is_passable(next) {
                continue;
            }
            // Stepping on the exit early would end the level or report it locked.
            if next == level.exit() && next != to {
                continue;
            }
            let _ = came_from.insert(next, (cell, direction));
            frontier.push_back(next);
        }
    }

    let mut steps = Vec::new();
    let mut cursor = to;
    while cursor != from {
        let (previous, direction) = came_from[&cursor];
        steps.push(direction);
        cursor = previous;
    }
    steps.reverse();
    steps
}

fn walk(world: &mut World, steps: &[Direction]) -> Vec<Event> {
    let mut events = Vec::new();
    for direction in steps {
        world::apply(
            world,
            Command::Move {
                direction: *direction,
            },
            &mut events,
        );
    }
    events
}

fn key_cell(level: &Level) -> Option<CellCoord> {
    level
        .grid()
        .cells()
        .find(|(_, tile)| *tile == Tile::Key)
        .map(|(cell, _)| cell)
}

#[test]
fn default_run_places_keys_only_on_gated_levels() {
    let world = new_game(&default_specs(), 2024).expect("game generates");

    assert_eq!(query::level_count(&world), 4);
    assert_eq!(query::key_requirements(&world), &[false, false, true, true]);
    for index in 0..4 {
        let level = query::level(&world, index).expect("level exists");
        let keys = level.grid().count(Tile::Key);
        let expected = usize::from(query::key_requirements(&world)[index]);
        assert_eq!(keys, expected, "level {index}");
        assert_eq!(level.start(), CellCoord::new(2, 2));
        assert_eq!(level.exit(), CellCoord::new(16, 8));
    }
}

#[test]
fn same_seed_generates_identical_runs() {
    let bootstrap = Bootstrap::new(99, CarveConfig::default());

    let first = bootstrap.new_game(&default_specs()).expect("game generates");
    let second = bootstrap.new_game(&default_specs()).expect("game generates");
    let other = Bootstrap::new(100, CarveConfig::default())
        .new_game(&default_specs())
        .expect("game generates");

    let rows = |world: &World| -> Vec<Vec<String>> {
        (0..query::level_count(world))
            .filter_map(|index| query::level(world, index))
            .map(Level::to_rows)
            .collect()
    };
    assert_eq!(rows(&first), rows(&second));
    assert_ne!(rows(&first), rows(&other));
}

#[test]
fn generated_run_can_be_played_to_both_endings() {
    let mut world = new_game(&default_specs(), 7).expect("game generates");

    for ending in [Progress::Victory, Progress::VictoryWithCompanion] {
        while let Progress::Playing { level } = query::progress(&world) {
            let active = query::active_level(&world).clone();
            let mut events = Vec::new();
            if let Some(key) = key_cell(&active) {
                events.extend(walk(&mut world, &route(&active, active.start(), key)));
                assert!(query::has_key(&world));
                events.extend(walk(&mut world, &route(&active, key, active.exit())));
            } else {
                events.extend(walk(
                    &mut world,
                    &route(&active, active.start(), active.exit()),
                ));
            }
            assert!(
                !events.iter().any(|event| matches!(event, Event::ExitLocked { .. })),
                "level {level} should open once its key is held"
            );
            assert_ne!(query::progress(&world), Progress::Playing { level });
        }

        assert_eq!(query::progress(&world), ending);
        let mut events = Vec::new();
        world::apply(&mut world, Command::Restart, &mut events);
        assert!(query::companion_earned(&world));
    }
}
