use std::str::FromStr;

use anyhow::{Result, anyhow};
use tracing::Level;
use tracing_subscriber::fmt::Subscriber;

fn parse_log_level(level: Option<&str>) -> Result<Level> {
    match level {
        Some(level) => Level::from_str(level).map_err(|e| anyhow!("Invalid log level: {}", e)),
        None => Ok(Level::INFO),
    }
}

/// Installs the global fmt subscriber, filtered by `LOG_LEVEL` (defaults to info).
pub fn init_tracing() -> Result<()> {
    let log_level = parse_log_level(std::env::var("LOG_LEVEL").ok().as_deref())?;

    let subscriber = Subscriber::builder().with_max_level(log_level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("failed to set subscriber: {}", e))
}
