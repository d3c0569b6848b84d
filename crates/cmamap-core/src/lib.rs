//! # cmamap-core
//!
//! Live map of contiguous memory allocator (CMA) buffers, built from the
//! kernel's DMA-API debug dump.
//!
//! Each poll cycle reads the dump, sorts the buffers by physical address and
//! draws them onto a [`Screen`]: an occupancy bar scaled to the pool, a
//! total line and one line per buffer.
//!
//! ## Modules
//!
//! - [`source`] - Debug dump reader and line parser
//! - [`layout`] - Pool-to-column mapping for the occupancy bar
//! - [`format`] - Human-readable sizes
//! - [`render`] - Map, total and buffer list drawing
//! - [`screen`] - Screen abstraction, in-memory screen and terminal session
//! - [`monitor`] - The fetch/render/wait loop
//! - [`config`] - Monitor configuration
//! - [`error`] - Error type

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod format;
pub mod layout;
pub mod monitor;
pub mod render;
pub mod screen;
pub mod source;

// Re-export commonly used types at crate root
pub use config::{MapLayout, MonitorConfig};
pub use error::{Error, Result};
pub use format::pretty_size;
pub use monitor::{Monitor, Snapshot};
pub use render::Renderer;
pub use screen::{MemoryScreen, Screen, TerminalSession};
pub use source::{Buffer, BufferSource};
