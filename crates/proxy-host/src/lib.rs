//! Host runtime for the resolver proxy.
//!
//! Two independent dispatchers live here. [`Dispatcher`] routes AI proxy
//! fields (`getAIResponse`, `searchKnowledgeBase`, `processBooking`, `chat`)
//! to handlers that call the remote target and normalise what comes back.
//! [`HealthDispatcher`] answers `healthCheck` from configuration alone.
//! Both always return a JSON mapping; nothing raises past them.

use std::sync::Arc;

use anyhow::Result;
use resolver_proxy_core::RemoteClient;
use tokio::runtime::Handle;

pub mod boot;
pub mod config;
pub mod dispatch;
pub mod health;
pub mod http;
pub mod operations;
pub mod value;

pub use config::HostConfig;
pub use dispatch::{Dispatcher, ProxyField, ResolverEvent};
pub use health::{HealthDispatcher, HealthReporter, HealthStatus};
pub use http::AppState;
pub use operations::HandlerFault;

/// Build both dispatchers from configuration.
///
/// A configured remote target resolves credentials on `runtime` and blocks on
/// it for every call, so call this from outside async code.
pub fn build_state(config: &HostConfig, runtime: Handle) -> AppState {
    let client = RemoteClient::from_target(&config.proxy.target, runtime);
    let ai = Dispatcher::new(Arc::new(client));
    let resolver = HealthDispatcher::new(HealthReporter::from_config(&config.proxy));
    AppState::new(ai, resolver)
}

/// Serve both dispatchers over HTTP until shutdown.
pub async fn run(config: &HostConfig, state: AppState) -> Result<()> {
    http::serve(config.bind, state).await
}
