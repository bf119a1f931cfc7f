//! Keyboard decoding.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use maze_escape_core::{Command, Direction};

/// Translates a key press into a game command.
///
/// Releases and unbound keys yield `None`.
pub(crate) fn command_for(key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let direction = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Direction::Up,
        KeyCode::Down | KeyCode::Char('j') => Direction::Down,
        KeyCode::Left | KeyCode::Char('h') => Direction::Left,
        KeyCode::Right | KeyCode::Char('l') => Direction::Right,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Some(Command::Quit)
        }
        KeyCode::Char('q') | KeyCode::Esc => return Some(Command::Quit),
        KeyCode::Char('r') => return Some(Command::Restart),
        _ => return None,
    };
    Some(Command::Move { direction })
}
