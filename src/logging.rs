//! Logging setup.
//!
//! Installs a `tracing_subscriber` fmt subscriber on stderr. The filter is
//! taken from `RUST_LOG` when set, otherwise from `[log].filter`.

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

pub fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // A second call (tests, embedding binaries) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
