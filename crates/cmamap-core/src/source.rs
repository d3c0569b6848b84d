//! DMA-API debug dump reader.
//!
//! The kernel lists every live DMA mapping in
//! `/sys/kernel/debug/dma-api/dump`, one per line:
//!
//! ```text
//! gpu vc4-drm coherent idx 0 P=3c000000 N=3c000 D=3c000000 L=800000 DMA_BIDIRECTIONAL ...
//! ```
//!
//! Only lines starting with `gpu vc4-drm` are considered. The physical
//! address comes from the first `P=` token and the length from the first
//! `L=` token after it, both as bare lowercase hex.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};

/// Prefix identifying lines owned by the VC4 DRM driver.
const LINE_PREFIX: &str = "gpu vc4-drm";

/// One allocated region of the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Buffer {
    /// Physical start address.
    pub address: u64,
    /// Length in bytes.
    pub size: u64,
}

impl Buffer {
    /// Creates a buffer record.
    #[must_use]
    pub const fn new(address: u64, size: u64) -> Self {
        Self { address, size }
    }

    /// Address one past the last byte.
    #[must_use]
    pub const fn end(&self) -> u64 {
        self.address.saturating_add(self.size)
    }
}

/// Parses one dump line.
///
/// Returns `Ok(None)` for lines that do not describe a VC4 buffer.
///
/// # Errors
///
/// Returns [`Error::Parse`] when a recognized line has a `P=` or `L=` value
/// that is not lowercase hex or overflows 64 bits.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<Buffer>> {
    if !line.starts_with(LINE_PREFIX) {
        return Ok(None);
    }

    let mut tokens = line.split_whitespace();
    let Some(paddr) = tokens.by_ref().find_map(|t| t.strip_prefix("P=")) else {
        return Ok(None);
    };
    let Some(len) = tokens.find_map(|t| t.strip_prefix("L=")) else {
        return Ok(None);
    };

    Ok(Some(Buffer {
        address: parse_hex(paddr, "P", line_no)?,
        size: parse_hex(len, "L", line_no)?,
    }))
}

fn parse_hex(value: &str, field: &'static str, line: usize) -> Result<u64> {
    let malformed = || Error::Parse {
        line,
        field,
        value: value.to_string(),
    };

    // from_str_radix alone would also take uppercase digits and a leading '+'
    if value.is_empty() || !value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return Err(malformed());
    }
    u64::from_str_radix(value, 16).map_err(|_| malformed())
}

/// Lazy iterator over the buffers of one dump pass.
///
/// Yields at most one error, after which it is exhausted.
pub struct DumpEntries<R> {
    lines: io::Lines<R>,
    path: PathBuf,
    line_no: usize,
    failed: bool,
}

impl<R: BufRead> DumpEntries<R> {
    /// Wraps a reader; `path` is only used in error messages.
    pub fn new(reader: R, path: impl AsRef<Path>) -> Self {
        Self {
            lines: reader.lines(),
            path: path.as_ref().to_path_buf(),
            line_no: 0,
            failed: false,
        }
    }
}

impl<R: BufRead> Iterator for DumpEntries<R> {
    type Item = Result<Buffer>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(source) => {
                    self.failed = true;
                    return Some(Err(Error::Io {
                        path: self.path.clone(),
                        source,
                    }));
                }
            };
            self.line_no += 1;

            match parse_line(&line, self.line_no) {
                Ok(Some(buffer)) => return Some(Ok(buffer)),
                Ok(None) => {}
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Reads buffers from the debug dump.
///
/// The file is reopened on every call; no handle is kept between cycles.
#[derive(Debug, Clone)]
pub struct BufferSource {
    path: PathBuf,
}

impl BufferSource {
    /// Creates a source for the dump at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Opens the dump and returns a lazy pass over its buffers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the dump cannot be opened.
    pub fn entries(&self) -> Result<DumpEntries<BufReader<File>>> {
        let file = File::open(&self.path).map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(DumpEntries::new(BufReader::new(file), &self.path))
    }

    /// Reads every buffer currently listed in the dump, in file order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the dump cannot be read and
    /// [`Error::Parse`] on a malformed recognized line.
    pub fn fetch(&self) -> Result<Vec<Buffer>> {
        self.entries()?.collect()
    }
}
