//! Error types for cmamap.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using the crate error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading the dump or driving the terminal.
#[derive(Debug, Error)]
pub enum Error {
    /// The debug dump could not be opened or read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// Path of the dump.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A recognized dump line carried a field that is not a 64-bit hex value.
    #[error("line {line}: invalid {field} value {value:?}")]
    Parse {
        /// 1-based line number in the dump.
        line: usize,
        /// Field name (`P` or `L`).
        field: &'static str,
        /// The offending text.
        value: String,
    },

    /// Writing to or reconfiguring the terminal failed.
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::Io {
            path: PathBuf::from("/sys/kernel/debug/dma-api/dump"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(err.to_string().starts_with("cannot read /sys/kernel/debug/dma-api/dump"));

        let err = Error::Parse {
            line: 3,
            field: "P",
            value: "xyz".to_string(),
        };
        assert_eq!(err.to_string(), "line 3: invalid P value \"xyz\"");
    }
}
