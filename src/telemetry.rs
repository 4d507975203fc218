//! Tracing setup for the binaries.
//!
//! The library only emits events through `tracing`; installing a subscriber
//! is left to whoever owns `main`.

use tracing_subscriber::EnvFilter;

/// Install a global `fmt` subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence. Otherwise `verbosity` picks the level for
/// this crate: 0 = warn, 1 = info, 2 = debug, 3+ = trace.
///
/// Returns an error if a global subscriber is already installed.
pub fn init(verbosity: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
}

fn default_directive(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("bookgame={},warn", level)
}
