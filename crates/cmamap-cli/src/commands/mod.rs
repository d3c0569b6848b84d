//! CLI command implementations.

pub mod snapshot;
pub mod watch;
