//! Output formatting for one-shot snapshots.

use std::io::{self, IsTerminal};

use anyhow::Result;
use cmamap_core::{MemoryScreen, MonitorConfig, Renderer, Snapshot};

/// Width used when stdout is not a terminal.
const DEFAULT_COLUMNS: u16 = 80;

/// Print the snapshot as pretty JSON.
pub fn print_json(snapshot: &Snapshot) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(snapshot)?);
    Ok(())
}

/// Print the snapshot laid out exactly like the live view.
pub fn print_map(snapshot: &Snapshot, config: &MonitorConfig) -> Result<()> {
    for line in render_map(snapshot, config, output_columns())? {
        println!("{line}");
    }
    Ok(())
}

/// Render into a screen tall enough to list every buffer.
fn render_map(snapshot: &Snapshot, config: &MonitorConfig, columns: u16) -> Result<Vec<String>> {
    let rows = usize::from(config.layout.buffer_list_y()) + snapshot.buffers.len();
    let rows = u16::try_from(rows).unwrap_or(u16::MAX);

    let mut screen = MemoryScreen::new(columns, rows);
    Renderer::new(config.pool_size, config.layout).draw(&mut screen, &snapshot.buffers)?;
    Ok(screen.lines())
}

fn output_columns() -> u16 {
    if io::stdout().is_terminal() {
        crossterm::terminal::size()
            .map(|(columns, _)| columns)
            .unwrap_or(DEFAULT_COLUMNS)
    } else {
        DEFAULT_COLUMNS
    }
}
