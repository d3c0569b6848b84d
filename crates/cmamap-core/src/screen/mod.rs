//! Character-cell screens the renderer draws on.
//!
//! [`Screen`] is the drawing surface: fixed-size grid, absolute writes and
//! line and screen clears. [`EventSource`] is how the poll loop waits between
//! refreshes. [`TerminalSession`] implements both over the real terminal
//! and turns termination signals into [`Wake::Quit`]; [`MemoryScreen`]
//! keeps the grid in memory.

mod memory;
mod signals;
mod terminal;

use std::time::Duration;

use crate::error::Result;

pub use memory::MemoryScreen;
pub use terminal::TerminalSession;

/// A grid of character cells addressed by `(row, column)`.
///
/// Writes outside the grid are dropped and text running past the right edge
/// is clipped.
pub trait Screen {
    /// Re-reads the screen dimensions. Called once per refresh.
    fn begin_frame(&mut self) -> Result<()> {
        Ok(())
    }

    /// Returns `(columns, rows)`.
    fn size(&self) -> (u16, u16);

    /// Writes `text` starting at `(row, col)`.
    fn put_str(&mut self, row: u16, col: u16, text: &str) -> Result<()>;

    /// Blanks `row` from `col` to the right edge.
    fn clear_line_from(&mut self, row: u16, col: u16) -> Result<()>;

    /// Blanks every row from `row` to the bottom.
    fn clear_below(&mut self, row: u16) -> Result<()>;

    /// Makes pending output visible.
    fn flush(&mut self) -> Result<()>;
}

/// Why a wait between refreshes ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// The interval elapsed.
    Tick,
    /// The screen changed size and should be redrawn from scratch.
    Resize,
    /// The user asked to stop.
    Quit,
}

/// Blocks until the next refresh is due.
pub trait EventSource {
    /// Waits at most `timeout`.
    fn wait(&mut self, timeout: Duration) -> Result<Wake>;
}
