//! Live full-screen view.

use anyhow::Result;
use cmamap_core::{Monitor, MonitorConfig, TerminalSession};

/// Run the live view until the user quits.
///
/// The terminal session is released before any error reaches the caller.
pub fn run(config: MonitorConfig) -> Result<()> {
    let monitor = Monitor::new(config)?;
    tracing::debug!(dump = %monitor.config().dump_path.display(), "starting live view");

    let mut session = TerminalSession::acquire()?;
    let result = monitor.run(&mut session);
    drop(session);

    Ok(result?)
}
