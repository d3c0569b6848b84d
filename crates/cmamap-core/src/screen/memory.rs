//! In-memory screen.

use super::Screen;
use crate::error::Result;

/// A [`Screen`] backed by a character grid.
///
/// Used for one-shot snapshots and to inspect rendered output.
#[derive(Debug, Clone)]
pub struct MemoryScreen {
    columns: u16,
    rows: u16,
    cells: Vec<Vec<char>>,
    dropped_writes: usize,
    flushes: usize,
}

impl MemoryScreen {
    /// Creates a blank screen.
    #[must_use]
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            columns,
            rows,
            cells: vec![vec![' '; usize::from(columns)]; usize::from(rows)],
            dropped_writes: 0,
            flushes: 0,
        }
    }

    /// Returns the full contents of `row`, or `None` past the bottom.
    #[must_use]
    pub fn line(&self, row: u16) -> Option<String> {
        self.cells
            .get(usize::from(row))
            .map(|cells| cells.iter().collect())
    }

    /// Returns every row with trailing blanks removed, dropping blank rows
    /// at the bottom.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .cells
            .iter()
            .map(|cells| cells.iter().collect::<String>().trim_end().to_string())
            .collect();
        while lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }
        lines
    }

    /// Number of writes or clears that targeted a row outside the grid.
    #[must_use]
    pub fn dropped_writes(&self) -> usize {
        self.dropped_writes
    }

    /// Number of completed frames.
    #[must_use]
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    fn row_mut(&mut self, row: u16) -> Option<&mut Vec<char>> {
        if row >= self.rows {
            self.dropped_writes += 1;
            return None;
        }
        self.cells.get_mut(usize::from(row))
    }
}

impl Screen for MemoryScreen {
    fn size(&self) -> (u16, u16) {
        (self.columns, self.rows)
    }

    fn put_str(&mut self, row: u16, col: u16, text: &str) -> Result<()> {
        if let Some(cells) = self.row_mut(row) {
            for (cell, ch) in cells.iter_mut().skip(usize::from(col)).zip(text.chars()) {
                *cell = ch;
            }
        }
        Ok(())
    }

    fn clear_line_from(&mut self, row: u16, col: u16) -> Result<()> {
        if let Some(cells) = self.row_mut(row) {
            cells.iter_mut().skip(usize::from(col)).for_each(|c| *c = ' ');
        }
        Ok(())
    }

    fn clear_below(&mut self, row: u16) -> Result<()> {
        if row >= self.rows {
            self.dropped_writes += 1;
            return Ok(());
        }
        for cells in self.cells.iter_mut().skip(usize::from(row)) {
            cells.fill(' ');
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_str_clips_at_edge() {
        let mut screen = MemoryScreen::new(8, 2);
        screen.put_str(0, 5, "abcdef").unwrap();
        assert_eq!(screen.line(0).unwrap(), "     abc");
        assert_eq!(screen.dropped_writes(), 0);
    }

    #[test]
    fn test_out_of_range_rows_are_dropped() {
        let mut screen = MemoryScreen::new(4, 2);
        screen.put_str(2, 0, "x").unwrap();
        screen.clear_line_from(5, 0).unwrap();
        assert_eq!(screen.dropped_writes(), 2);
        assert_eq!(screen.line(2), None);
    }

    #[test]
    fn test_clears() {
        let mut screen = MemoryScreen::new(4, 3);
        for row in 0..3 {
            screen.put_str(row, 0, "abcd").unwrap();
        }

        screen.clear_line_from(0, 2).unwrap();
        assert_eq!(screen.line(0).unwrap(), "ab  ");

        screen.clear_below(1).unwrap();
        assert_eq!(screen.lines(), vec!["ab".to_string()]);
    }
}
