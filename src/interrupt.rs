//! Process-wide Ctrl+C flag.
//!
//! The handler only records the request; the capture flow checks it at
//! safe points so the camera is still released on the way out.

use std::sync::atomic::{AtomicBool, Ordering};

static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Check if Ctrl+C has been received.
pub fn requested() -> bool {
    CTRLC_RECEIVED.load(Ordering::SeqCst)
}

/// Ask the running flow to stop at its next check.
pub fn request() {
    CTRLC_RECEIVED.store(true, Ordering::SeqCst);
}

/// Set up the Ctrl+C handler.
///
/// This should be called once at program startup.
pub fn install() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        request();
        log::warn!("Received Ctrl+C, shutting down...");
    })
}
