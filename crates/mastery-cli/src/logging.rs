//! Log output setup.
//!
//! Library crates log through the `log` facade; the subscriber installed
//! here bridges those records into `tracing` and writes them to stderr so
//! command output on stdout stays machine-readable.

use tracing_subscriber::EnvFilter;

/// Filter directive for a base level raised by `-v` flags.
pub fn filter_directive(level: &str, verbose: u8) -> String {
    match verbose {
        0 => level.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the computed level.
pub fn init(level: &str, verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(level, verbose)));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if installed.is_err() {
        log::debug!("Log subscriber already installed");
    }
}
