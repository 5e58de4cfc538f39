//! Tracing subscriber setup

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::domain::LogLevel;

/// Install the global subscriber for `level`. Without a level nothing is
/// installed and all log output, including the gateway library's, is
/// discarded. `RUST_LOG` directives are honoured on top of the level.
///
/// Returns whether a subscriber was installed by this call.
pub fn init(level: Option<LogLevel>) -> bool {
    let Some(level) = level else {
        return false;
    };

    let filter = EnvFilter::from_default_env().add_directive(level.level_filter().into());
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .is_ok()
}
