//! Terminal management: raw mode and alternate screen with cleanup.

mod raw_mode;

pub use raw_mode::RawModeGuard;
