//! Monitor configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Default location of the DMA-API debug dump.
pub const DEFAULT_DUMP_PATH: &str = "/sys/kernel/debug/dma-api/dump";

/// Size of the CMA pool being mapped (316 MiB).
pub const DEFAULT_POOL_SIZE: u64 = 316 * 1024 * 1024;

/// Time between two refreshes.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Vertical placement of the screen sections.
///
/// ```text
/// row 0                 (blank)
/// row map_y..+height    occupancy bar
/// row total_y           "<allocated> / <pool>"
/// row buffer_list_y..   one line per buffer
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapLayout {
    /// Row of the first line of the bar.
    pub map_y: u16,
    /// Blank columns on either side of the bar.
    pub map_padding: u16,
    /// Number of rows the bar spans.
    pub map_height: u16,
}

impl MapLayout {
    /// Row of the total line, one blank row below the bar.
    #[must_use]
    pub fn total_y(&self) -> u16 {
        self.map_y + self.map_height + 1
    }

    /// Row of the first buffer list entry.
    #[must_use]
    pub fn buffer_list_y(&self) -> u16 {
        self.total_y() + 2
    }

    /// Width of the bar for a screen `columns` cells wide.
    #[must_use]
    pub fn map_width(&self, columns: u16) -> u16 {
        columns.saturating_sub(self.map_padding * 2)
    }
}

impl Default for MapLayout {
    fn default() -> Self {
        Self {
            map_y: 1,
            map_padding: 3,
            map_height: 8,
        }
    }
}

/// Configuration for a [`Monitor`](crate::Monitor).
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Debug dump to read each cycle.
    pub dump_path: PathBuf,
    /// Total pool capacity in bytes.
    pub pool_size: u64,
    /// Delay between refreshes.
    pub interval: Duration,
    /// Screen placement.
    pub layout: MapLayout,
}

impl MonitorConfig {
    /// Sets the dump path.
    pub fn with_dump_path(mut self, path: impl AsRef<Path>) -> Self {
        self.dump_path = path.as_ref().to_path_buf();
        self
    }

    /// Sets the pool size in bytes.
    pub fn with_pool_size(mut self, pool_size: u64) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Sets the refresh interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Checks that the values can drive a monitor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a zero pool size or interval.
    pub fn validate(&self) -> Result<()> {
        if self.pool_size == 0 {
            return Err(Error::Config("pool size must be non-zero".to_string()));
        }
        if self.interval.is_zero() {
            return Err(Error::Config("refresh interval must be non-zero".to_string()));
        }
        Ok(())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            dump_path: PathBuf::from(DEFAULT_DUMP_PATH),
            pool_size: DEFAULT_POOL_SIZE,
            interval: DEFAULT_INTERVAL,
            layout: MapLayout::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_rows() {
        let layout = MapLayout::default();
        assert_eq!(layout.total_y(), 10);
        assert_eq!(layout.buffer_list_y(), 12);
        assert_eq!(layout.map_width(80), 74);
        assert_eq!(layout.map_width(4), 0);
    }

    #[test]
    fn test_builder() {
        let config = MonitorConfig::default()
            .with_dump_path("/tmp/dump")
            .with_pool_size(64 * 1024 * 1024)
            .with_interval(Duration::from_millis(250));

        assert_eq!(config.dump_path, PathBuf::from("/tmp/dump"));
        assert_eq!(config.pool_size, 64 * 1024 * 1024);
        assert_eq!(config.interval, Duration::from_millis(250));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero() {
        assert!(MonitorConfig::default().with_pool_size(0).validate().is_err());
        assert!(
            MonitorConfig::default()
                .with_interval(Duration::ZERO)
                .validate()
                .is_err()
        );
    }
}
