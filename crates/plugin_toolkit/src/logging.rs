//! Logging setup and error reporting helpers.
//!
//! The toolkit itself only emits through `tracing` macros; plugin binaries
//! and tests call [`init`] once to get a formatted subscriber.

use std::error::Error;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the global tracing subscriber.
///
/// The filter honors `RUST_LOG` when set, otherwise falls back to `debug`
/// or `info` depending on the flag. Calling this a second time is a no-op,
/// so tests can all call it freely.
pub fn init(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init();
}

/// Logs an error and every source in its chain, one line each.
///
/// For the fire-and-forget paths (the update task, delivery fallbacks)
/// where there is nobody left to hand the error to.
pub fn log_error_chain(context: &str, err: &dyn Error) {
    error!("{context}: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        error!("  caused by: {cause}");
        source = cause.source();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use std::path::PathBuf;

    #[test]
    fn test_init_is_idempotent() {
        init(false);
        init(true);
    }

    #[test]
    fn test_log_error_chain_walks_sources() {
        init(false);
        let err = ConfigError::Read {
            path: PathBuf::from("settings.yml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        // Only checks the walk terminates; output goes to the subscriber.
        log_error_chain("failed to load settings", &err);
    }
}
