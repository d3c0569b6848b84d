//! Termination signals observed while the terminal is held.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use signal_hook::SigId;
use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};

use crate::error::Result;

/// Signals that end the live view instead of killing the process.
pub const SHUTDOWN_SIGNALS: [i32; 4] = [SIGHUP, SIGINT, SIGQUIT, SIGTERM];

/// Records delivery of any [`SHUTDOWN_SIGNALS`] in a flag.
///
/// While registered, those signals no longer terminate the process; the
/// owner is expected to poll [`is_raised`](Self::is_raised) and shut down.
/// Dropping unregisters the handlers.
pub struct ShutdownSignals {
    raised: Arc<AtomicBool>,
    ids: Vec<SigId>,
}

impl ShutdownSignals {
    /// Installs the handlers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Terminal`](crate::Error::Terminal) if a handler
    /// cannot be installed; handlers already installed are removed.
    pub fn register() -> Result<Self> {
        let mut signals = Self {
            raised: Arc::new(AtomicBool::new(false)),
            ids: Vec::with_capacity(SHUTDOWN_SIGNALS.len()),
        };
        for signal in SHUTDOWN_SIGNALS {
            let id = signal_hook::flag::register(signal, Arc::clone(&signals.raised))?;
            signals.ids.push(id);
        }
        Ok(signals)
    }

    /// Whether a shutdown signal arrived since registration.
    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Relaxed)
    }
}

impl Drop for ShutdownSignals {
    fn drop(&mut self) {
        for id in self.ids.drain(..) {
            signal_hook::low_level::unregister(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigterm_sets_flag() {
        let signals = ShutdownSignals::register().unwrap();

        signal_hook::low_level::raise(SIGTERM).unwrap();
        assert!(signals.is_raised());
    }

    #[test]
    fn test_sighup_sets_flag() {
        let signals = ShutdownSignals::register().unwrap();

        signal_hook::low_level::raise(SIGHUP).unwrap();
        assert!(signals.is_raised());
    }
}
