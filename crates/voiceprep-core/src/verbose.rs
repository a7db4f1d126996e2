//! Logging setup for voiceprep binaries.
//!
//! Library code logs through `tracing`; this installs the stderr subscriber.

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set. Otherwise `verbose` selects `debug` for the
/// voiceprep crates and `warn` everywhere else. Calling this twice is a no-op.
pub fn init_logging(verbose: bool) {
    let default = if verbose {
        "warn,voiceprep_core=debug,voiceprep=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}
