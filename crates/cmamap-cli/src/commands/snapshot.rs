//! One-shot snapshot command.

use anyhow::Result;
use cmamap_core::{Monitor, MonitorConfig};

use crate::OutputFormat;
use crate::output;

/// Read the dump once and print it in the requested format.
pub fn run(config: MonitorConfig, format: OutputFormat) -> Result<()> {
    let monitor = Monitor::new(config)?;
    let snapshot = monitor.snapshot()?;

    match format {
        OutputFormat::Json => output::print_json(&snapshot)?,
        OutputFormat::Map => output::print_map(&snapshot, monitor.config())?,
    }
    Ok(())
}
