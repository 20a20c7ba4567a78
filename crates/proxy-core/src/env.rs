use std::env;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use url::Url;

/// Region the remote compute target lives in. Distinct from the region the
/// proxy itself is deployed to.
pub const REMOTE_REGION: &str = "us-east-1";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(100);
pub const DEFAULT_PROJECT_NAME: &str = "appsync-bahrain";
pub const DEFAULT_LOG_LEVEL: &str = "INFO";
const UNKNOWN: &str = "unknown";

pub const ENV_TARGET: &str = "VIRGINIA_LAMBDA_ARN";
pub const ENV_GATEWAY_URL: &str = "VIRGINIA_GATEWAY_URL";
pub const ENV_ENDPOINT: &str = "VIRGINIA_LAMBDA_ENDPOINT";
pub const ENV_REGION: &str = "REGION";
pub const ENV_PROJECT_NAME: &str = "PROJECT_NAME";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_CONNECT_TIMEOUT: &str = "PROXY_CONNECT_TIMEOUT";
pub const ENV_READ_TIMEOUT: &str = "PROXY_READ_TIMEOUT";

/// Environment-driven configuration, read once at process start.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub target: RemoteTarget,
    pub gateway_url: Option<String>,
    pub region: Option<String>,
    pub project_name: Option<String>,
    pub log_level: String,
}

/// Where and how the remote compute target is reached.
#[derive(Debug, Clone)]
pub struct RemoteTarget {
    /// Function identifier; `None` means "not configured" and selects the mock.
    pub function: Option<String>,
    pub region: &'static str,
    /// Invoke API override; `None` lets the SDK resolve the regional endpoint.
    pub endpoint: Option<Url>,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub max_retries: u32,
    /// First retry pause; later ones back off exponentially with jitter.
    pub retry_backoff: Duration,
}

impl ProxyConfig {
    /// Build a [`ProxyConfig`] from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty and whitespace-only values
    /// are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let endpoint = read(ENV_ENDPOINT)
            .map(|value| parse_endpoint(&value))
            .transpose()?;
        let connect_timeout = match read(ENV_CONNECT_TIMEOUT) {
            Some(value) => humantime::parse_duration(&value)
                .with_context(|| format!("{ENV_CONNECT_TIMEOUT} is not a valid duration"))?,
            None => DEFAULT_CONNECT_TIMEOUT,
        };
        let read_timeout = match read(ENV_READ_TIMEOUT) {
            Some(value) => humantime::parse_duration(&value)
                .with_context(|| format!("{ENV_READ_TIMEOUT} is not a valid duration"))?,
            None => DEFAULT_READ_TIMEOUT,
        };

        Ok(Self {
            target: RemoteTarget {
                function: read(ENV_TARGET),
                region: REMOTE_REGION,
                endpoint,
                connect_timeout,
                read_timeout,
                max_retries: DEFAULT_MAX_RETRIES,
                retry_backoff: DEFAULT_RETRY_BACKOFF,
            },
            gateway_url: read(ENV_GATEWAY_URL),
            region: read(ENV_REGION),
            project_name: read(ENV_PROJECT_NAME),
            log_level: read(ENV_LOG_LEVEL).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }

    /// Configuration-presence check only; nothing is dialed.
    pub fn remote_configured(&self) -> bool {
        self.target.is_configured() || self.gateway_url.is_some()
    }

    pub fn region_or_unknown(&self) -> &str {
        self.region.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn project_or_unknown(&self) -> &str {
        self.project_name.as_deref().unwrap_or(UNKNOWN)
    }

    /// Project name as the AI proxy reports it.
    pub fn proxy_project_name(&self) -> &str {
        self.project_name.as_deref().unwrap_or(DEFAULT_PROJECT_NAME)
    }
}

impl RemoteTarget {
    pub fn is_configured(&self) -> bool {
        self.function.is_some()
    }

    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }
}

impl Default for RemoteTarget {
    fn default() -> Self {
        Self {
            function: None,
            region: REMOTE_REGION,
            endpoint: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }
}

fn parse_endpoint(value: &str) -> Result<Url> {
    let url = Url::parse(value).with_context(|| format!("{ENV_ENDPOINT} is not a valid URL"))?;
    match url.scheme() {
        "http" | "https" => {}
        other => bail!("unsupported {ENV_ENDPOINT} scheme `{other}`"),
    }
    if url.cannot_be_a_base() {
        bail!("{ENV_ENDPOINT} `{value}` cannot be used as a base URL");
    }
    Ok(url)
}
