//! Structured logging for the Atoll engine.
//!
//! Library crates emit `tracing` events; only the binary installs a
//! subscriber, through [`init_logging`]. Console output carries uptime
//! timestamps and module targets, and debug builds can mirror everything
//! to a JSON file for post-mortem analysis.

use std::path::Path;

use atoll_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when neither `RUST_LOG` nor the config says otherwise.
const DEFAULT_FILTER: &str = "info";

/// Initialize the tracing subscriber.
///
/// Filter precedence: the `RUST_LOG` environment variable, then the
/// config's `debug.log_level`, then `"info"`.
///
/// # Arguments
///
/// * `log_dir` - Optional directory for JSON log files (debug builds only)
/// * `debug_build` - Whether this is a debug build (enables file logging)
/// * `config` - Optional configuration supplying the log level override
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = config
        .map(|c| c.debug.log_level.as_str())
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_FILTER);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    // Debug builds also log to a file for post-mortem analysis.
    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join("atoll.log"))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// The default `EnvFilter`, useful for tests needing consistent behavior.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}
