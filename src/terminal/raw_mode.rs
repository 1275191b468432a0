//! Full-screen terminal session with panic-safe cleanup.

use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use std::io;
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set while a guard holds the terminal; read by the panic hook.
pub(crate) static SCREEN_HELD: AtomicBool = AtomicBool::new(false);

/// Guard that owns the alternate screen and raw mode.
///
/// The terminal is restored when the guard is dropped, on normal exit and
/// on panic alike.
pub struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    /// Switch to the alternate screen, hide the cursor and enter raw mode.
    ///
    /// # Errors
    /// Returns an error if the terminal refuses any of the three; whatever
    /// was already changed is rolled back.
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();

        enable_raw_mode()?;
        SCREEN_HELD.store(true, Ordering::SeqCst);
        let mut guard = Self { active: true };

        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, cursor::Hide) {
            let _ = guard.exit();
            return Err(e);
        }

        Ok(guard)
    }

    /// Restore the terminal now. Dropping the guard afterwards is a no-op.
    pub fn exit(&mut self) -> io::Result<()> {
        if std::mem::take(&mut self.active) {
            restore_terminal()?;
        }
        Ok(())
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if std::mem::take(&mut self.active) {
            if let Err(e) = restore_terminal() {
                log::debug!("Terminal restore on drop failed: {}", e);
            }
        }
    }
}

fn restore_terminal() -> io::Result<()> {
    SCREEN_HELD.store(false, Ordering::SeqCst);
    let screen = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
    disable_raw_mode()?;
    screen
}

/// Chain a panic hook that gives the terminal back before the panic
/// message is printed. Installed at most once per process.
pub(crate) fn install_panic_hook() {
    static HOOK_INSTALLED: AtomicBool = AtomicBool::new(false);

    if HOOK_INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }

    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        if SCREEN_HELD.swap(false, Ordering::SeqCst) {
            let _ = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }

        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_releases_terminal() {
        // Needs a real TTY; cargo test under CI has none.
        let mut guard = match RawModeGuard::enter() {
            Ok(guard) => guard,
            Err(e) => {
                eprintln!("Skipping test (no TTY): {}", e);
                return;
            }
        };
        assert!(SCREEN_HELD.load(Ordering::SeqCst));

        guard.exit().expect("Should restore terminal");
        assert!(!SCREEN_HELD.load(Ordering::SeqCst));

        // Second exit and the drop are both no-ops.
        guard.exit().expect("Second exit is a no-op");
        drop(guard);
        assert!(!SCREEN_HELD.load(Ordering::SeqCst));
    }

    #[test]
    fn test_panic_hook_installs_once() {
        install_panic_hook();
        install_panic_hook();
    }
}
