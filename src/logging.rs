//! Process-wide log sink.

use chrono::Local;
use env_logger::Env;
use std::io::Write;

const TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Default filter for a `-v` count.
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the logger. `RUST_LOG` takes precedence over `verbosity`.
///
/// Only the first call has an effect.
pub fn init(verbosity: u8) {
    let result = env_logger::Builder::from_env(
        Env::default().default_filter_or(default_filter(verbosity)),
    )
    .format(|buf, record| {
        writeln!(
            buf,
            "[{}] {} {}: {}",
            Local::now().format(TIME_FORMAT),
            record.level(),
            record.target(),
            record.args()
        )
    })
    .try_init();

    if result.is_err() {
        log::debug!("Logger already initialized");
    }
}
