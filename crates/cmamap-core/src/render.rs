//! Drawing of the occupancy bar, total line and buffer list.

use crate::config::MapLayout;
use crate::error::Result;
use crate::format::pretty_size;
use crate::layout::{MapScale, bar_line};
use crate::screen::Screen;
use crate::source::Buffer;

/// Draws one poll cycle's buffers onto a [`Screen`].
///
/// Every method expects `buffers` sorted by ascending address.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    pool_size: u64,
    layout: MapLayout,
}

impl Renderer {
    /// Creates a renderer for a pool of `pool_size` bytes.
    #[must_use]
    pub fn new(pool_size: u64, layout: MapLayout) -> Self {
        Self { pool_size, layout }
    }

    /// Draws all three sections. Returns the total allocated size.
    pub fn draw<S: Screen + ?Sized>(&self, screen: &mut S, buffers: &[Buffer]) -> Result<u64> {
        self.draw_map(screen, buffers)?;
        let total = self.print_total(screen, buffers)?;
        self.list_buffers(screen, buffers)?;
        Ok(total)
    }

    /// Draws the occupancy bar: `map_height` identical rows starting at
    /// `map_y`, inset by `map_padding` on both sides.
    pub fn draw_map<S: Screen + ?Sized>(&self, screen: &mut S, buffers: &[Buffer]) -> Result<()> {
        let (columns, rows) = screen.size();
        let width = self.layout.map_width(columns);
        if width == 0 {
            return Ok(());
        }

        let line = bar_line(buffers, MapScale::new(width, self.pool_size));
        for i in 0..self.layout.map_height {
            let row = self.layout.map_y + i;
            if row >= rows {
                break;
            }
            screen.put_str(row, self.layout.map_padding, &line)?;
        }
        Ok(())
    }

    /// Writes `"<allocated> / <pool>"` on the total row and returns the
    /// allocated byte count.
    pub fn print_total<S: Screen + ?Sized>(&self, screen: &mut S, buffers: &[Buffer]) -> Result<u64> {
        let total = total_size(buffers);
        let row = self.layout.total_y();
        let (_, rows) = screen.size();
        if row >= rows {
            return Ok(total);
        }

        let text = format!("{} / {}", pretty_size(total), pretty_size(self.pool_size));
        screen.put_str(row, 0, &text)?;
        screen.clear_line_from(row, u16::try_from(text.len()).unwrap_or(u16::MAX))?;
        Ok(total)
    }

    /// Writes one `"0x<address> <size>"` line per buffer, stopping at the
    /// bottom of the screen, then blanks whatever is left below the list.
    pub fn list_buffers<S: Screen + ?Sized>(&self, screen: &mut S, buffers: &[Buffer]) -> Result<()> {
        let (_, rows) = screen.size();
        let first = usize::from(self.layout.buffer_list_y());
        let rows = usize::from(rows);

        for (i, buf) in buffers.iter().enumerate() {
            let row = first + i;
            if row >= rows {
                break;
            }
            let row = row as u16;
            screen.clear_line_from(row, 0)?;
            screen.put_str(row, 0, &buffer_line(buf))?;
        }

        let end = first + buffers.len();
        if end < rows {
            screen.clear_below(end as u16)?;
        }
        Ok(())
    }
}

/// Sum of all buffer sizes.
#[must_use]
pub fn total_size(buffers: &[Buffer]) -> u64 {
    buffers.iter().map(|b| b.size).fold(0, u64::saturating_add)
}

fn buffer_line(buf: &Buffer) -> String {
    format!("0x{:08x} {}", buf.address, pretty_size(buf.size))
}
