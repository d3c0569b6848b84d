//! The fetch, render and wait loop.

use serde::Serialize;

use crate::config::MonitorConfig;
use crate::error::Result;
use crate::render::{Renderer, total_size};
use crate::screen::{EventSource, Screen, Wake};
use crate::source::{Buffer, BufferSource};

/// Buffers seen in one poll cycle, sorted by address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Pool capacity in bytes.
    pub pool_size: u64,
    /// Sum of all buffer sizes.
    pub total: u64,
    /// Buffers in ascending address order.
    pub buffers: Vec<Buffer>,
}

/// Polls the debug dump and redraws a screen.
pub struct Monitor {
    config: MonitorConfig,
    source: BufferSource,
    renderer: Renderer,
}

impl Monitor {
    /// Creates a monitor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the configuration
    /// is invalid.
    pub fn new(config: MonitorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            source: BufferSource::new(&config.dump_path),
            renderer: Renderer::new(config.pool_size, config.layout),
            config,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Reads the dump once and sorts the result.
    pub fn snapshot(&self) -> Result<Snapshot> {
        let mut buffers = self.source.fetch()?;
        buffers.sort_unstable_by_key(|b| b.address);

        Ok(Snapshot {
            pool_size: self.config.pool_size,
            total: total_size(&buffers),
            buffers,
        })
    }

    /// Runs one cycle: fetch, sort, draw and flush.
    pub fn poll_once<S: Screen + ?Sized>(&self, screen: &mut S) -> Result<Snapshot> {
        let snapshot = self.snapshot()?;

        screen.begin_frame()?;
        self.renderer.draw(screen, &snapshot.buffers)?;
        screen.flush()?;

        tracing::debug!(
            buffers = snapshot.buffers.len(),
            total = snapshot.total,
            "refreshed"
        );
        Ok(snapshot)
    }

    /// Refreshes until the user quits.
    ///
    /// # Errors
    ///
    /// Stops at the first fetch, parse or terminal error and returns it.
    pub fn run<T: Screen + EventSource>(&self, term: &mut T) -> Result<()> {
        loop {
            self.poll_once(term)?;

            match term.wait(self.config.interval)? {
                Wake::Tick => {}
                Wake::Resize => {
                    term.begin_frame()?;
                    term.clear_below(0)?;
                }
                Wake::Quit => return Ok(()),
            }
        }
    }
}
