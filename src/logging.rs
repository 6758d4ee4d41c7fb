//! Diagnostic logging setup
//!
//! Logs go to stderr so command output on stdout stays clean. `RUST_LOG`
//! controls filtering; without it the level is `warn`, or `debug` for the
//! crate itself when verbose output is requested.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install the global subscriber; later calls are ignored
///
/// If the first call cannot install it (another subscriber is already the
/// global default), the failure is reported on stderr and logging stays
/// with whatever was installed.
pub fn init(verbose: bool) {
    INIT.call_once(|| {
        let default = if verbose { "warn,packnav=debug" } else { "warn" };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

        let result = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .try_init();

        if let Err(e) = result {
            eprintln!("Failed to initialize logging: {}", e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_does_not_panic() {
        init(false);
        init(true);
        assert!(INIT.is_completed());
    }
}
