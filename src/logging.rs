//! Log output for the command line
//!
//! Records go to stderr so command output on stdout stays parseable.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// Invalid directives fall back to `warn`. Installing twice is a no-op.
pub fn init_logging(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("ignoring invalid log filter {filter:?}: {err}");
        EnvFilter::new("warn")
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
