use aws_config::BehaviorVersion;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_lambda::config::Region;
use aws_sdk_lambda::config::http::HttpResponse;
use aws_sdk_lambda::error::{DisplayErrorContext, SdkError};
use aws_sdk_lambda::operation::invoke::InvokeError;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use aws_sdk_lambda::{Client, Config, config};
use tokio::runtime::Handle;
use tracing::{debug, warn};

pub use aws_sdk_lambda::config::Credentials;

use super::{InvocationFault, Transport};
use crate::env::RemoteTarget;

/// Signed transport for the remote function invoke API.
///
/// Region, connect/read timeouts and the retry budget come from
/// [`RemoteTarget`]; the SDK signs every attempt and retries throttling,
/// transient 5xx and connection failures. Calls block on `runtime`, so invoke
/// from a plain thread or a blocking-pool task, never from async code.
#[derive(Debug, Clone)]
pub struct LambdaTransport {
    client: Client,
    runtime: Handle,
}

impl LambdaTransport {
    /// Resolve credentials through the default provider chain (environment,
    /// profile, container or instance metadata).
    pub fn connect(target: &RemoteTarget, runtime: Handle) -> Self {
        let shared = runtime.block_on(
            aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(target.region))
                .load(),
        );
        let config = tune(target, config::Builder::from(&shared));
        Self::from_config(config, runtime)
    }

    /// Sign with fixed credentials instead of the provider chain.
    pub fn with_credentials(
        target: &RemoteTarget,
        credentials: Credentials,
        runtime: Handle,
    ) -> Self {
        let builder = Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(target.region))
            .credentials_provider(credentials);
        Self::from_config(tune(target, builder), runtime)
    }

    fn from_config(config: Config, runtime: Handle) -> Self {
        Self {
            client: Client::from_conf(config),
            runtime,
        }
    }

    async fn send(&self, function: &str, body: Vec<u8>) -> Result<Vec<u8>, InvocationFault> {
        let output = self
            .client
            .invoke()
            .function_name(function)
            .invocation_type(InvocationType::RequestResponse)
            .payload(Blob::new(body))
            .send()
            .await
            .map_err(|err| classify(function, err))?;

        if let Some(kind) = output.function_error() {
            warn!(function, kind, "remote function reported an error");
        }
        Ok(output
            .payload()
            .map(|blob| blob.clone().into_inner())
            .unwrap_or_default())
    }
}

impl Transport for LambdaTransport {
    fn invoke(&self, function: &str, body: Vec<u8>) -> Result<Vec<u8>, InvocationFault> {
        debug!(function, bytes = body.len(), "sending remote invocation");
        self.runtime.block_on(self.send(function, body))
    }
}

fn tune(target: &RemoteTarget, builder: config::Builder) -> Config {
    let timeouts = TimeoutConfig::builder()
        .connect_timeout(target.connect_timeout)
        .read_timeout(target.read_timeout)
        .build();
    let retries = RetryConfig::standard()
        .with_max_attempts(target.max_retries + 1)
        .with_initial_backoff(target.retry_backoff);
    let builder = builder.timeout_config(timeouts).retry_config(retries);
    match &target.endpoint {
        Some(endpoint) => builder
            .endpoint_url(endpoint.as_str().trim_end_matches('/'))
            .build(),
        None => builder.build(),
    }
}

fn classify(function: &str, err: SdkError<InvokeError, HttpResponse>) -> InvocationFault {
    let function = function.to_string();
    let message = DisplayErrorContext(&err).to_string();
    match &err {
        SdkError::TimeoutError(_) => InvocationFault::Timeout { function },
        SdkError::DispatchFailure(failure) if failure.is_timeout() => {
            InvocationFault::Timeout { function }
        }
        SdkError::ServiceError(context) => InvocationFault::Status {
            function,
            status: context.raw().status().as_u16(),
            message,
        },
        _ => InvocationFault::Transport { function, message },
    }
}
