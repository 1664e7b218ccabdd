//! Log subscriber setup

use crate::error::{CliError, CliResult};
use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "storeprobe=info";

/// `RUST_LOG` if it parses, otherwise [`DEFAULT_FILTER`]
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber, writing to stderr so stdout stays clean
/// for reports
pub fn init(json: bool) -> CliResult<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
    installed.map_err(|e| CliError::logging(e.to_string()))
}
