//! Sets up the global tracing subscriber.

use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Install a subscriber that writes log events to stderr.
///
/// The `RUST_LOG` environment variable takes precedence. Otherwise events at
/// `info` and above are logged, or `debug` and above if `verbose` is set.
/// Logs go to stderr so that stdout only carries the report.
pub fn setup_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let stderr_log = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter);

    tracing_subscriber::registry().with(stderr_log).init();
}
