//! Full-screen terminal session.

use std::io::{self, Stdout, Write};
use std::panic;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};

use super::signals::ShutdownSignals;
use super::{EventSource, Screen, Wake};
use crate::error::Result;

/// Longest stretch spent blocked on terminal input before checking for
/// shutdown signals again.
const SIGNAL_CHECK_INTERVAL: Duration = Duration::from_millis(100);

/// Set while a session holds the terminal; whoever clears it restores.
static SESSION_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Exclusive use of the controlling terminal.
///
/// Acquiring the session switches to the alternate screen, enables raw mode
/// and hides the cursor. Dropping it undoes all three, on normal return and
/// on error propagation. A panic restores the terminal before the panic
/// message is printed.
///
/// Raw mode turns Ctrl-C into a key event, and SIGHUP, SIGINT, SIGQUIT and
/// SIGTERM are caught for the lifetime of the session. Both are reported by
/// [`EventSource::wait`] as [`Wake::Quit`] so the session unwinds normally.
pub struct TerminalSession {
    out: Stdout,
    columns: u16,
    rows: u16,
    signals: ShutdownSignals,
}

impl TerminalSession {
    /// Takes over the terminal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Terminal`](crate::Error::Terminal) if the terminal
    /// cannot be switched; anything already changed is restored.
    pub fn acquire() -> Result<Self> {
        // Signals first, so none can kill the process once raw mode is on
        let signals = ShutdownSignals::register()?;
        install_panic_hook();

        terminal::enable_raw_mode()?;
        SESSION_ACTIVE.store(true, Ordering::SeqCst);
        let mut session = Self {
            out: io::stdout(),
            columns: 0,
            rows: 0,
            signals,
        };
        // From here on Drop restores the terminal if a step fails
        execute!(session.out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        session.begin_frame()?;

        tracing::info!(
            columns = session.columns,
            rows = session.rows,
            "terminal session started"
        );
        Ok(session)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if !SESSION_ACTIVE.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Err(e) = restore_terminal(&mut self.out) {
            tracing::warn!("failed to restore terminal: {}", e);
        }
        tracing::info!("terminal session released");
    }
}

/// Shows the cursor, leaves the alternate screen and disables raw mode.
fn restore_terminal(out: &mut impl Write) -> io::Result<()> {
    let screen = execute!(out, Show, LeaveAlternateScreen);
    // Leave raw mode even when the escape sequences could not be written
    terminal::disable_raw_mode()?;
    screen
}

fn install_panic_hook() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        chain_panic_hook(|| {
            if SESSION_ACTIVE.swap(false, Ordering::SeqCst) {
                let _ = restore_terminal(&mut io::stdout());
            }
        });
    });
}

/// Runs `before` ahead of the currently installed panic hook.
fn chain_panic_hook<F>(before: F)
where
    F: Fn() + Send + Sync + 'static,
{
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        before();
        previous(info);
    }));
}

impl Screen for TerminalSession {
    fn begin_frame(&mut self) -> Result<()> {
        let (columns, rows) = terminal::size()?;
        self.columns = columns;
        self.rows = rows;
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        (self.columns, self.rows)
    }

    fn put_str(&mut self, row: u16, col: u16, text: &str) -> Result<()> {
        if row >= self.rows || col >= self.columns {
            return Ok(());
        }
        let room = usize::from(self.columns - col);
        let clipped: String = text.chars().take(room).collect();
        queue!(self.out, MoveTo(col, row), Print(clipped))?;
        Ok(())
    }

    fn clear_line_from(&mut self, row: u16, col: u16) -> Result<()> {
        if row >= self.rows || col >= self.columns {
            return Ok(());
        }
        queue!(self.out, MoveTo(col, row), Clear(ClearType::UntilNewLine))?;
        Ok(())
    }

    fn clear_below(&mut self, row: u16) -> Result<()> {
        if row >= self.rows {
            return Ok(());
        }
        queue!(self.out, MoveTo(0, row), Clear(ClearType::FromCursorDown))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

impl EventSource for TerminalSession {
    fn wait(&mut self, timeout: Duration) -> Result<Wake> {
        let signals = &self.signals;
        wait_for_wake(
            timeout,
            || signals.is_raised(),
            |slice| {
                if event::poll(slice)? {
                    Ok(Some(event::read()?))
                } else {
                    Ok(None)
                }
            },
        )
    }
}

/// Waits up to `timeout`, reading input in slices no longer than
/// [`SIGNAL_CHECK_INTERVAL`] so a shutdown request is noticed promptly.
///
/// `next_event` blocks for at most the given slice and returns `None` when
/// nothing arrived.
fn wait_for_wake<S, F>(timeout: Duration, shutdown_requested: S, mut next_event: F) -> Result<Wake>
where
    S: Fn() -> bool,
    F: FnMut(Duration) -> Result<Option<Event>>,
{
    let deadline = Instant::now() + timeout;

    loop {
        if shutdown_requested() {
            return Ok(Wake::Quit);
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(Wake::Tick);
        }

        match next_event(remaining.min(SIGNAL_CHECK_INTERVAL))? {
            Some(Event::Key(key)) if is_quit_key(&key) => return Ok(Wake::Quit),
            Some(Event::Resize(..)) => return Ok(Wake::Resize),
            _ => {}
        }
    }
}

fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('q') | KeyCode::Esc => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_hook::consts::signal::SIGTERM;
    use std::sync::Arc;

    #[test]
    fn test_quit_keys() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let plain_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        let other = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);

        assert!(is_quit_key(&ctrl_c));
        assert!(!is_quit_key(&plain_c));
        assert!(is_quit_key(&q));
        assert!(is_quit_key(&esc));
        assert!(!is_quit_key(&other));
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert!(!is_quit_key(&release));
    }

    #[test]
    fn test_wait_quits_on_sigterm() {
        let signals = ShutdownSignals::register().unwrap();
        signal_hook::low_level::raise(SIGTERM).unwrap();

        let wake = wait_for_wake(
            Duration::from_secs(60),
            || signals.is_raised(),
            |_| Ok(None),
        )
        .unwrap();
        assert_eq!(wake, Wake::Quit);
    }

    #[test]
    fn test_wait_notices_signal_between_slices() {
        let raised = AtomicBool::new(false);
        let mut slices = Vec::new();

        let wake = wait_for_wake(
            Duration::from_secs(60),
            || raised.load(Ordering::SeqCst),
            |slice| {
                slices.push(slice);
                raised.store(true, Ordering::SeqCst);
                Ok(None)
            },
        )
        .unwrap();

        assert_eq!(wake, Wake::Quit);
        assert_eq!(slices, vec![SIGNAL_CHECK_INTERVAL]);
    }

    #[test]
    fn test_wait_events() {
        let quit = wait_for_wake(Duration::from_secs(60), || false, |_| {
            Ok(Some(Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE))))
        })
        .unwrap();
        assert_eq!(quit, Wake::Quit);

        let resize = wait_for_wake(Duration::from_secs(60), || false, |_| {
            Ok(Some(Event::Resize(100, 40)))
        })
        .unwrap();
        assert_eq!(resize, Wake::Resize);
    }

    #[test]
    fn test_wait_ticks_when_idle() {
        let tick = wait_for_wake(Duration::from_millis(20), || false, |slice| {
            assert!(slice <= Duration::from_millis(20));
            std::thread::sleep(slice);
            Ok(Some(Event::FocusGained))
        })
        .unwrap();
        assert_eq!(tick, Wake::Tick);
    }

    #[test]
    fn test_panic_hook_runs_before_message() {
        let restored = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&restored);
        chain_panic_hook(move || flag.store(true, Ordering::SeqCst));

        let result: std::thread::Result<()> = panic::catch_unwind(|| panic!("render failed"));
        // Put back the default hook
        drop(panic::take_hook());

        assert!(result.is_err());
        assert!(restored.load(Ordering::SeqCst));
    }
}
