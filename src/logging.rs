//! Log output setup.
//!
//! Library code only emits `tracing` events. The binary installs a
//! subscriber here; `RUST_LOG` wins over the verbosity flag when set.

use tracing_subscriber::EnvFilter;

/// Default filter for a given `-v` count.
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "mapprint=debug,info",
        _ => "trace",
    }
}

/// Install the global fmt subscriber. Logs go to stderr so stdout stays
/// free for results.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
