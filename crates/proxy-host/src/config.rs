use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::{Context, Result};
use humantime::format_duration;
use resolver_proxy_core::ProxyConfig;

pub const DEFAULT_PORT: u16 = 8080;

/// Everything the host needs to start: proxy settings plus where to listen.
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub proxy: ProxyConfig,
    pub bind: SocketAddr,
}

impl HostConfig {
    pub fn new(proxy: ProxyConfig) -> Self {
        Self {
            proxy,
            bind: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
        }
    }

    pub fn from_env() -> Result<Self> {
        let proxy = ProxyConfig::from_env().context("failed to load proxy configuration")?;
        Ok(Self::new(proxy))
    }

    pub fn with_bind(mut self, ip: IpAddr, port: u16) -> Self {
        self.bind = SocketAddr::new(ip, port);
        self
    }

    /// Human-readable summary for `--print-config`.
    pub fn explain(&self) -> String {
        let target = &self.proxy.target;
        let lines = [
            format!("bind = {}", self.bind),
            format!("project = {}", self.proxy.proxy_project_name()),
            format!("region = {}", self.proxy.region_or_unknown()),
            format!("log_level = {}", self.proxy.log_level),
            format!(
                "remote.function = {}",
                target.function.as_deref().unwrap_or("<not configured, mock>")
            ),
            format!("remote.region = {}", target.region),
            format!(
                "remote.endpoint = {}",
                target
                    .endpoint
                    .as_ref()
                    .map_or("<regional default>", |url| url.as_str())
            ),
            format!(
                "remote.connect_timeout = {}",
                format_duration(target.connect_timeout)
            ),
            format!("remote.read_timeout = {}", format_duration(target.read_timeout)),
            format!("remote.max_retries = {}", target.max_retries),
            format!(
                "remote.retry_backoff = {}",
                format_duration(target.retry_backoff)
            ),
            format!(
                "remote.gateway_url = {}",
                self.proxy.gateway_url.as_deref().unwrap_or("<unset>")
            ),
        ];
        lines.join("\n")
    }
}
