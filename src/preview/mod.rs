//! Live camera preview rendered as ASCII art in the terminal.
//!
//! The preview takes over the terminal (alternate screen + raw mode) and
//! redraws every frame until the operator presses `q`/`Esc`/`Ctrl+C`, the
//! process receives an interrupt, or the timeout elapses.

pub mod ascii;
pub mod overlay;

use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{queue, QueueableCommand};
use std::io::{self, IsTerminal, Write};
use std::time::{Duration, Instant};

use crate::camera::{CameraError, Frame, StreamInfo};
use crate::interrupt;
use crate::terminal::RawModeGuard;

pub use ascii::CharSet;

/// Default time the preview stays open.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Column where overlay text starts.
const OVERLAY_COL: u16 = 2;

/// How the preview is drawn and when it closes by itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewOptions {
    /// Close automatically after this long; `None` waits for the operator
    pub timeout: Option<Duration>,
    /// Character ramp for the picture
    pub charset: CharSet,
    /// Invert brightness (for light terminal themes)
    pub invert: bool,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT),
            charset: CharSet::default(),
            invert: false,
        }
    }
}

/// Why the preview ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewOutcome {
    /// Operator closed it
    Closed,
    /// Timeout elapsed
    TimedOut,
    /// Ctrl+C, as a key press or as the process interrupt flag
    Interrupted,
    /// Not a terminal; nothing was shown
    Skipped,
}

/// Errors that end the preview early.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error("Terminal error: {0}")]
    Terminal(#[from] io::Error),
}

/// One composed screen: picture rows plus overlay text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub picture: Vec<String>,
    pub overlay: Vec<String>,
}

/// Compose the picture and overlay for a `cols` x `rows` terminal.
///
/// `brightness` is scratch space reused between frames.
pub fn compose(
    frame: &Frame,
    cols: u16,
    rows: u16,
    overlay: Vec<String>,
    options: &PreviewOptions,
    brightness: &mut Vec<u8>,
) -> Screen {
    let (grid_cols, grid_rows) = ascii::fit_grid(frame.width, frame.height, cols, rows);
    ascii::cell_brightness_into(frame, grid_cols, grid_rows, brightness);
    let picture = ascii::to_rows(brightness, grid_cols, options.charset.ramp(), options.invert);

    let max_text = cols.saturating_sub(OVERLAY_COL) as usize;
    let overlay = overlay
        .into_iter()
        .take(rows as usize)
        .map(|line| line.chars().take(max_text).collect())
        .collect();

    Screen { picture, overlay }
}

/// What a key press asks the preview to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// `q` or `Esc`: close the preview and go on to the capture
    Close,
    /// `Ctrl+C`: abort the whole run
    Interrupt,
}

/// Map a key press to a preview action, if it has one.
pub fn key_action(key: &KeyEvent) -> Option<KeyAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyAction::Interrupt)
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(KeyAction::Close),
        _ => None,
    }
}

/// The terminal the preview draws on and reads keys from.
pub trait Display {
    /// Size in character cells as `(cols, rows)`.
    fn size(&mut self) -> io::Result<(u16, u16)>;

    fn draw(&mut self, screen: &Screen) -> io::Result<()>;

    /// Wait up to `budget` for a key press.
    fn next_key(&mut self, budget: Duration) -> io::Result<Option<KeyEvent>>;
}

/// [`Display`] backed by the process terminal through crossterm.
#[derive(Debug)]
pub struct TerminalDisplay {
    stdout: io::Stdout,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TerminalDisplay {
    fn size(&mut self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn draw(&mut self, screen: &Screen) -> io::Result<()> {
        let stdout = &mut self.stdout;
        stdout.queue(Clear(ClearType::All))?;
        for (row, line) in screen.picture.iter().enumerate() {
            queue!(stdout, MoveTo(0, row as u16), Print(line))?;
        }
        queue!(stdout, SetForegroundColor(Color::Red))?;
        for (row, line) in screen.overlay.iter().enumerate() {
            queue!(stdout, MoveTo(OVERLAY_COL, row as u16 + 1), Print(line))?;
        }
        queue!(stdout, ResetColor)?;
        stdout.flush()
    }

    fn next_key(&mut self, budget: Duration) -> io::Result<Option<KeyEvent>> {
        let mut wait = budget.max(Duration::from_millis(1));
        while event::poll(wait)? {
            if let Event::Key(key) = event::read()? {
                if key_action(&key).is_some() {
                    return Ok(Some(key));
                }
            }
            // Drain whatever else is queued without waiting again.
            wait = Duration::ZERO;
        }
        Ok(None)
    }
}

/// Run the preview on the process terminal, pulling frames from `grab`.
///
/// Skipped when stdout is not a terminal. The terminal is restored before
/// returning in every case.
pub fn run<F>(
    device_index: u32,
    stream: &StreamInfo,
    options: &PreviewOptions,
    grab: F,
) -> Result<PreviewOutcome, PreviewError>
where
    F: FnMut() -> Result<Frame, CameraError>,
{
    if !io::stdout().is_terminal() {
        log::warn!("Standard output is not a terminal, skipping live preview");
        return Ok(PreviewOutcome::Skipped);
    }

    let mut guard = RawModeGuard::enter()?;
    let outcome = run_on(&mut TerminalDisplay::new(), device_index, stream, options, grab);
    guard.exit()?;
    outcome
}

/// The preview loop proper, drawing on `display`.
///
/// A failed frame read ends the preview with the camera error.
pub fn run_on<F>(
    display: &mut dyn Display,
    device_index: u32,
    stream: &StreamInfo,
    options: &PreviewOptions,
    mut grab: F,
) -> Result<PreviewOutcome, PreviewError>
where
    F: FnMut() -> Result<Frame, CameraError>,
{
    let frame_interval = Duration::from_millis(1000 / stream.fps.max(1) as u64);
    let mut brightness = Vec::new();
    let start = Instant::now();

    let outcome = loop {
        let tick = Instant::now();
        if interrupt::requested() {
            break PreviewOutcome::Interrupted;
        }

        let elapsed = start.elapsed();
        let remaining = options.timeout.map(|t| overlay::remaining(elapsed, t));
        if options.timeout.is_some_and(|t| elapsed > t) {
            break PreviewOutcome::TimedOut;
        }

        let frame = grab()?;
        let (cols, rows) = display.size()?;
        let lines = overlay::lines(device_index, stream, remaining);
        let screen = compose(&frame, cols, rows, lines, options, &mut brightness);
        display.draw(&screen)?;

        let budget = frame_interval.saturating_sub(tick.elapsed());
        match display.next_key(budget)?.as_ref().and_then(key_action) {
            Some(KeyAction::Close) => break PreviewOutcome::Closed,
            Some(KeyAction::Interrupt) => break PreviewOutcome::Interrupted,
            None => {}
        }
    };

    log::info!("Live preview finished: {:?}", outcome);
    Ok(outcome)
}
