// Logging module - Logging infrastructure
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use std::io;

/// Initialize logging system.
///
/// `RUST_LOG` wins when set; otherwise the configured level applies, raised
/// to debug by `--verbose`.
pub fn init_logging(log_level: &str, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let level = if verbose { "debug" } else { log_level };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pbilink={},warn,error", level)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .try_init()?;

    Ok(())
}
