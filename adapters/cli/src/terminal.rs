//! Crossterm rendering backend.

use std::io::{self, Stdout, Write};

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event as TerminalEvent},
    style::{Attribute, Color as TerminalColor, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand, QueueableCommand,
};
use maze_escape_core::Command;
use maze_escape_rendering::{Color, EndingView, MazeView, RenderingBackend, Scene, StyledLine};

use crate::input::command_for;

/// Draws scenes on the alternate screen with raw-mode keyboard input.
#[derive(Debug)]
pub(crate) struct TerminalBackend {
    stdout: Stdout,
}

impl TerminalBackend {
    pub(crate) fn new() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }
}

impl RenderingBackend for TerminalBackend {
    fn run<F>(mut self, initial: Scene, update_scene: F) -> Result<()>
    where
        F: FnMut(Command) -> Option<Scene>,
    {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        let _ = self.stdout.execute(EnterAlternateScreen)?;
        let _ = self.stdout.execute(Hide)?;

        let result = event_loop(&mut self.stdout, initial, update_scene);

        let _ = self.stdout.execute(Show)?;
        let _ = self.stdout.execute(LeaveAlternateScreen)?;
        terminal::disable_raw_mode().context("failed to restore terminal mode")?;
        result
    }
}

fn event_loop<F>(stdout: &mut Stdout, initial: Scene, mut update_scene: F) -> Result<()>
where
    F: FnMut(Command) -> Option<Scene>,
{
    let mut scene = initial;
    draw(stdout, &scene)?;

    loop {
        match event::read().context("failed to read terminal event")? {
            TerminalEvent::Key(key) => {
                let Some(command) = command_for(key) else {
                    continue;
                };
                match update_scene(command) {
                    Some(next) => scene = next,
                    None => return Ok(()),
                }
            }
            TerminalEvent::Resize(..) => {}
            _ => continue,
        }
        draw(stdout, &scene)?;
    }
}

fn draw(stdout: &mut Stdout, scene: &Scene) -> Result<()> {
    let _ = stdout.queue(Clear(ClearType::All))?;
    match scene {
        Scene::Maze(view) => draw_maze(stdout, view)?,
        Scene::Ending(view) => draw_ending(stdout, view)?,
    }
    let _ = stdout.queue(ResetColor)?;
    stdout.flush().context("failed to flush frame")
}

fn draw_maze(stdout: &mut Stdout, view: &MazeView) -> Result<()> {
    let mut row = 0_u16;
    for glyphs in view.rows() {
        let _ = stdout.queue(MoveTo(0, row))?;
        for glyph in glyphs {
            let _ = stdout.queue(SetForegroundColor(terminal_color(glyph.color)))?;
            let _ = stdout.queue(SetAttribute(weight(glyph.bold)))?;
            let _ = stdout.queue(Print(glyph.symbol))?;
        }
        row = row.saturating_add(1);
    }

    for line in &view.hud {
        draw_line(stdout, line, 0, row)?;
        row = row.saturating_add(1);
    }
    Ok(())
}

fn draw_ending(stdout: &mut Stdout, view: &EndingView) -> Result<()> {
    let (columns, rows) = terminal::size().context("failed to query terminal size")?;
    let height = u16::try_from(view.lines.len()).unwrap_or(u16::MAX);
    let mut row = rows.saturating_sub(height) / 2;

    for line in &view.lines {
        let width = u16::try_from(line.text.chars().count()).unwrap_or(u16::MAX);
        draw_line(stdout, line, columns.saturating_sub(width) / 2, row)?;
        row = row.saturating_add(1);
    }
    Ok(())
}

fn draw_line(stdout: &mut Stdout, line: &StyledLine, column: u16, row: u16) -> Result<()> {
    let _ = stdout.queue(MoveTo(column, row))?;
    let _ = stdout.queue(SetForegroundColor(terminal_color(line.color)))?;
    let _ = stdout.queue(SetAttribute(weight(line.bold)))?;
    let _ = stdout.queue(Print(&line.text))?;
    Ok(())
}

fn weight(bold: bool) -> Attribute {
    if bold {
        Attribute::Bold
    } else {
        Attribute::NormalIntensity
    }
}

fn terminal_color(color: Color) -> TerminalColor {
    TerminalColor::Rgb {
        r: color.red,
        g: color.green,
        b: color.blue,
    }
}
