//! Diagnostic logging to stderr.
//!
//! `QUICKNOTES_LOG` takes an `EnvFilter` directive (e.g. `quicknotes=debug`).
//! Without it, only warnings are shown, or debug output for this crate when
//! `--verbose` is passed.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "QUICKNOTES_LOG";

pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("quicknotes=debug,warn")
        } else {
            EnvFilter::new("warn")
        }
    });

    // A second initialisation (e.g. from tests) is not an error worth reporting.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
