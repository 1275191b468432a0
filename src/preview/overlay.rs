//! Status lines drawn on top of the live preview.

use std::time::Duration;

use crate::camera::StreamInfo;

/// Hint shown at the bottom of the overlay.
pub const CLOSE_HINT: &str = "Press \"q\" to close preview";

/// Time left before the preview closes by itself, clamped at zero.
pub fn remaining(elapsed: Duration, timeout: Duration) -> Duration {
    timeout.saturating_sub(elapsed)
}

/// `Countdown Clock: MM:SS`, rounded down to whole seconds.
pub fn countdown_label(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("Countdown Clock: {:02}:{:02}", secs / 60, secs % 60)
}

/// Overlay lines for one preview frame.
///
/// `remaining` is `None` when the preview has no timeout, in which case the
/// countdown line is left out.
pub fn lines(device_index: u32, stream: &StreamInfo, remaining: Option<Duration>) -> Vec<String> {
    let mut lines = vec![
        format!("Camera ID: {}", device_index),
        format!("Frame Info: {}", stream),
    ];
    if let Some(left) = remaining {
        lines.push(countdown_label(left));
    }
    lines.push(CLOSE_HINT.to_string());
    lines
}
