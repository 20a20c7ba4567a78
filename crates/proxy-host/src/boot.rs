use anyhow::{Result, anyhow};
use tracing::{Level, info};

use crate::HostConfig;

/// Initialise host-level subsystems: the log subscriber and a startup summary.
pub fn init(config: &HostConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(parse_log_level(&config.proxy.log_level))
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))?;

    let target = &config.proxy.target;
    info!(
        project = config.proxy.proxy_project_name(),
        region = config.proxy.region_or_unknown(),
        remote_region = target.region,
        remote_configured = target.is_configured(),
        "resolver proxy initialised"
    );
    Ok(())
}

/// Accepts the usual level names, including `WARNING` and `CRITICAL`.
/// Anything unrecognised falls back to `INFO`.
pub fn parse_log_level(value: &str) -> Level {
    match value.trim().to_ascii_uppercase().as_str() {
        "TRACE" => Level::TRACE,
        "DEBUG" => Level::DEBUG,
        "WARN" | "WARNING" => Level::WARN,
        "ERROR" | "CRITICAL" | "FATAL" => Level::ERROR,
        _ => Level::INFO,
    }
}
