//! Table rendering.
//! =================
//!
//! Turns a [`TableState`] into text, one line per seat:
//!
//! ```text
//! Philosopher   0  eating    🍴  Hunger:   2  [######              ] 33%
//! ```
//!
//! Rendering only reads the snapshot; it never touches forks or philosophers.

use crate::table::TableState;
use dine_env::Update;
use std::io;

/// Width of the progress bar in cells.
pub const PROGRESS_UNITS: usize = 20;

/// How far a philosopher is through its meals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Filled cells out of [`PROGRESS_UNITS`]
    pub filled: usize,

    /// Whole percent eaten
    pub percent: u32,
}

/// Computes `floor(units × eaten / starting)` in integer arithmetic.
///
/// A zero starting hunger counts as fully eaten.
pub fn progress(hunger: u32, starting_hunger: u32) -> Progress {
    if starting_hunger == 0 {
        return Progress {
            filled: PROGRESS_UNITS,
            percent: 100,
        };
    }

    let eaten = u64::from(starting_hunger.saturating_sub(hunger));
    let starting = u64::from(starting_hunger);

    Progress {
        filled: (PROGRESS_UNITS as u64 * eaten / starting) as usize,
        percent: (100 * eaten / starting) as u32,
    }
}

/// Renders `[####      ] 40%`.
pub fn progress_bar(hunger: u32, starting_hunger: u32) -> String {
    let Progress { filled, percent } = progress(hunger, starting_hunger);
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        " ".repeat(PROGRESS_UNITS - filled),
        percent
    )
}

/// Renders one seat.
pub fn render_seat(seat: &Update, starting_hunger: u32) -> String {
    format!(
        "Philosopher {:>3}  {:<9} {}  Hunger: {:>3}  {}",
        seat.philosopher.index(),
        seat.status.label(),
        seat.status.glyph(),
        seat.hunger,
        progress_bar(seat.hunger, starting_hunger)
    )
}

/// Renders the whole table, one line per seat.
pub fn render_table(state: &TableState) -> String {
    let mut out = String::new();
    for seat in state.seats() {
        out.push_str(&render_seat(seat, state.starting_hunger()));
        out.push('\n');
    }
    out
}

/// Something that shows the table after every update.
pub trait Renderer {
    /// Draws the current snapshot.
    fn render(&mut self, state: &TableState) -> io::Result<()>;
}

/// Draws nothing (quiet runs and tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _state: &TableState) -> io::Result<()> {
        Ok(())
    }
}

/// Clears the terminal and redraws the table on every update.
#[cfg(feature = "console")]
pub struct ConsoleRenderer<W: io::Write> {
    out: W,
    frames: u64,
}

#[cfg(feature = "console")]
impl ConsoleRenderer<io::Stdout> {
    /// Renders to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

#[cfg(feature = "console")]
impl<W: io::Write> ConsoleRenderer<W> {
    /// Renders to any writer.
    pub fn new(out: W) -> Self {
        Self { out, frames: 0 }
    }

    /// Returns the number of frames drawn.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(feature = "console")]
impl<W: io::Write> Renderer for ConsoleRenderer<W> {
    fn render(&mut self, state: &TableState) -> io::Result<()> {
        use crossterm::{
            cursor::MoveTo,
            queue,
            terminal::{Clear, ClearType},
        };

        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        self.out.write_all(render_table(state).as_bytes())?;
        self.out.flush()?;
        self.frames += 1;
        Ok(())
    }
}
