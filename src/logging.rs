use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::error::{PluckError, PluckResult};

/// Initialize the logging system.
///
/// Logs go to stderr so they never interleave with extracted page text on
/// stdout. `RUST_LOG` overrides the level given on the command line.
pub fn init_logging(level: &str) -> PluckResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pagepluck={level}")));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .try_init()
        .map_err(|e| PluckError::configuration(format!("failed to initialize logging: {e}")))?;

    Ok(())
}
