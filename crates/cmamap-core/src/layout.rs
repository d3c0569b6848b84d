//! Pool-to-column mapping for the occupancy bar.
//!
//! The lowest buffer address is the origin of the map. Every byte range
//! `[start, start + size)` relative to that origin covers the columns
//! `[start * width / pool, ceil((start + size) * width / pool))`, clamped to
//! the bar width. A column shared by an allocated and a free range is shown
//! as allocated.

use std::ops::Range;

use crate::source::Buffer;

/// Character drawn for allocated columns.
pub const FILL_CHAR: char = '#';

/// Character drawn for free columns.
pub const FREE_CHAR: char = ' ';

/// Scales pool offsets to bar columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapScale {
    width: u16,
    pool_size: u64,
}

impl MapScale {
    /// Creates a scale for a bar `width` columns wide covering `pool_size`
    /// bytes. A zero pool size is treated as one byte.
    #[must_use]
    pub fn new(width: u16, pool_size: u64) -> Self {
        Self {
            width,
            pool_size: pool_size.max(1),
        }
    }

    /// Bar width in columns.
    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Pool size the bar represents.
    #[must_use]
    pub fn pool_size(&self) -> u64 {
        self.pool_size
    }

    /// First column touched by `offset` (floor).
    #[must_use]
    pub fn start_column(&self, offset: u64) -> u64 {
        let scaled = u128::from(offset) * u128::from(self.width) / u128::from(self.pool_size);
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }

    /// Column one past the last touched by a range ending at `end` (ceil).
    #[must_use]
    pub fn end_column(&self, end: u64) -> u64 {
        let pool = u128::from(self.pool_size);
        let scaled = (u128::from(end) * u128::from(self.width) + pool - 1) / pool;
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }

    /// Columns covered by `[start, start + size)`, clamped to the bar.
    #[must_use]
    pub fn columns(&self, start: u64, size: u64) -> Range<u16> {
        let width = u64::from(self.width);
        let first = self.start_column(start).min(width);
        let last = self.end_column(start.saturating_add(size)).min(width);
        (first as u16)..(last.max(first) as u16)
    }
}

/// A byte range of the pool, relative to the map origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapSpan {
    /// Offset from the origin.
    pub start: u64,
    /// Length in bytes.
    pub size: u64,
    /// Whether the range is occupied by a buffer.
    pub allocated: bool,
}

impl MapSpan {
    const fn free(start: u64, size: u64) -> Self {
        Self {
            start,
            size,
            allocated: false,
        }
    }

    const fn allocated(start: u64, size: u64) -> Self {
        Self {
            start,
            size,
            allocated: true,
        }
    }
}

/// Splits the pool into alternating free and allocated spans.
///
/// `buffers` must be sorted by address. An empty list yields a single free
/// span covering the whole pool.
#[must_use]
pub fn plan_spans(buffers: &[Buffer], pool_size: u64) -> Vec<MapSpan> {
    let Some(first) = buffers.first() else {
        return vec![MapSpan::free(0, pool_size)];
    };

    let origin = first.address;
    let mut last = origin;
    let mut spans = Vec::with_capacity(buffers.len() * 2 + 1);

    for buf in buffers {
        debug_assert!(buf.address >= origin, "buffers must be sorted by address");
        if buf.address > last {
            spans.push(MapSpan::free(last - origin, buf.address - last));
        }
        spans.push(MapSpan::allocated(buf.address - origin, buf.size));
        // Overlaps are not validated; never move the end backwards
        last = last.max(buf.end());
    }

    let end = last - origin;
    if end < pool_size {
        spans.push(MapSpan::free(end, pool_size - end));
    }

    spans
}

/// Builds one row of the occupancy bar.
///
/// The result is exactly `scale.width()` characters long.
#[must_use]
pub fn bar_line(buffers: &[Buffer], scale: MapScale) -> String {
    let mut cells = vec![FREE_CHAR; usize::from(scale.width())];

    for span in plan_spans(buffers, scale.pool_size()) {
        if !span.allocated {
            continue;
        }
        let cols = scale.columns(span.start, span.size);
        cells[usize::from(cols.start)..usize::from(cols.end)].fill(FILL_CHAR);
    }

    cells.into_iter().collect()
}
