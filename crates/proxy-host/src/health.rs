use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use resolver_proxy_core::ProxyConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::dispatch::{ResolverEvent, error_shape, unknown_field};
use crate::operations::HandlerFault;

pub const HEALTH_CHECK_FIELD: &str = "healthCheck";
const HEALTHY: &str = "healthy";
const CONFIGURED: &str = "configured";
const NOT_CONFIGURED: &str = "not_configured";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub region: String,
    pub timestamp: String,
    pub services: BTreeMap<String, String>,
}

/// Reports the proxy's own status. Never dials out: the remote connection
/// entry reflects configuration presence only.
#[derive(Debug, Clone)]
pub struct HealthReporter {
    region: String,
    project: String,
    remote_configured: bool,
}

impl HealthReporter {
    pub fn new(
        region: impl Into<String>,
        project: impl Into<String>,
        remote_configured: bool,
    ) -> Self {
        Self {
            region: region.into(),
            project: project.into(),
            remote_configured,
        }
    }

    pub fn from_config(config: &ProxyConfig) -> Self {
        Self::new(
            config.region_or_unknown(),
            config.project_or_unknown(),
            config.remote_configured(),
        )
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn report(&self) -> HealthStatus {
        self.report_at(Utc::now())
    }

    pub fn report_at(&self, now: DateTime<Utc>) -> HealthStatus {
        let connection = if self.remote_configured {
            CONFIGURED
        } else {
            NOT_CONFIGURED
        };
        let services = BTreeMap::from([
            ("lambda".to_string(), HEALTHY.to_string()),
            ("vpc".to_string(), HEALTHY.to_string()),
            ("virginiaConnection".to_string(), connection.to_string()),
        ]);
        HealthStatus {
            status: HEALTHY.to_string(),
            region: self.region.clone(),
            timestamp: now.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            services,
        }
    }
}

/// Dispatcher for local resolver fields; answers `healthCheck` only.
#[derive(Debug, Clone)]
pub struct HealthDispatcher {
    reporter: HealthReporter,
}

impl HealthDispatcher {
    pub fn new(reporter: HealthReporter) -> Self {
        Self { reporter }
    }

    pub fn reporter(&self) -> &HealthReporter {
        &self.reporter
    }

    pub fn handle(&self, event: &ResolverEvent) -> Value {
        info!(
            event = %serde_json::to_string(event).unwrap_or_default(),
            project = %self.reporter.project(),
            "received event"
        );
        self.dispatch(&event.field)
    }

    pub fn dispatch(&self, field: &str) -> Value {
        if field != HEALTH_CHECK_FIELD {
            return unknown_field(field);
        }
        match self.health_check() {
            Ok(output) => output,
            Err(fault) => {
                error!(error = %fault, "error processing request");
                error_shape(fault.to_string())
            }
        }
    }

    fn health_check(&self) -> Result<Value, HandlerFault> {
        Ok(serde_json::to_value(self.reporter.report())?)
    }
}
