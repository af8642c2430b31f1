//! Log subscriber set-up for the binary
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to whoever embeds it. The CLI calls [`init_logging`] once at start-up.

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` applies
/// (e.g. `"catalogdash=warn"`).
pub fn init_logging(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    // A second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
