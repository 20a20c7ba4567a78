use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;
use tokio::runtime::Handle;
use tracing::{Level, error, info, span, warn};

use crate::env::RemoteTarget;
use crate::envelope::{self, value_kind};
use crate::mock;

mod lambda;

pub use lambda::{Credentials, LambdaTransport};

/// Request payload handed to the remote target. Each operation owns its shape.
pub type RemotePayload = Map<String, Value>;

/// Every way a remote call can fail. Handlers turn these into degraded output.
#[derive(Debug, Error)]
pub enum InvocationFault {
    #[error("failed to encode remote payload: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("remote target `{function}` unreachable: {message}")]
    Transport { function: String, message: String },
    #[error("remote target `{function}` timed out")]
    Timeout { function: String },
    #[error("remote target `{function}` returned HTTP {status}: {message}")]
    Status {
        function: String,
        status: u16,
        message: String,
    },
    #[error("failed to decode remote response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("remote target returned {0} where an object was expected")]
    UnexpectedShape(&'static str),
}

/// Synchronous call into the remote compute target.
pub trait RemoteInvoker: Send + Sync {
    fn invoke(&self, payload: &RemotePayload) -> Result<RemotePayload, InvocationFault>;
}

/// Raw byte exchange with a named remote function. Implementations own
/// timeouts and transport-level retries.
pub trait Transport: Send + Sync {
    fn invoke(&self, function: &str, body: Vec<u8>) -> Result<Vec<u8>, InvocationFault>;
}

enum Route {
    Mock,
    Remote {
        function: String,
        transport: Arc<dyn Transport>,
    },
}

/// Remote invocation client with mock fallback.
pub struct RemoteClient {
    route: Route,
}

impl RemoteClient {
    /// Build the client for `target`. An unconfigured target never dials out;
    /// a configured one resolves credentials on `runtime` and blocks on it for
    /// every call.
    pub fn from_target(target: &RemoteTarget, runtime: Handle) -> Self {
        let Some(function) = target.function.clone() else {
            return Self::mock_only();
        };
        let transport = LambdaTransport::connect(target, runtime);
        Self::with_transport(function, Arc::new(transport))
    }

    pub fn with_transport(function: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            route: Route::Remote {
                function: function.into(),
                transport,
            },
        }
    }

    pub fn mock_only() -> Self {
        Self { route: Route::Mock }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self.route, Route::Mock)
    }

    fn call(
        function: &str,
        transport: &dyn Transport,
        payload: &RemotePayload,
    ) -> Result<RemotePayload, InvocationFault> {
        let body = serde_json::to_vec(payload).map_err(InvocationFault::Encode)?;
        let raw = transport.invoke(function, body)?;
        let decoded: Value = serde_json::from_slice(&raw)?;
        info!(response = %decoded, "remote target response");
        match envelope::unwrap(decoded)? {
            Value::Object(map) => Ok(map),
            other => Err(InvocationFault::UnexpectedShape(value_kind(&other))),
        }
    }
}

impl RemoteInvoker for RemoteClient {
    fn invoke(&self, payload: &RemotePayload) -> Result<RemotePayload, InvocationFault> {
        let (function, transport) = match &self.route {
            Route::Mock => {
                warn!("remote target not configured, returning mock response");
                return Ok(mock::respond(payload));
            }
            Route::Remote {
                function,
                transport,
            } => (function.as_str(), transport.as_ref()),
        };

        let invoke_span = span!(Level::INFO, "remote.invoke", function = %function);
        let _guard = invoke_span.enter();
        info!("invoking remote target");
        Self::call(function, transport, payload).inspect_err(|err| {
            error!(error = %err, "error invoking remote target");
        })
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use serde_json::json;

    use super::*;

    struct StubTransport {
        reply: Result<Vec<u8>, fn() -> InvocationFault>,
        seen: Mutex<Vec<(String, Value)>>,
    }

    impl StubTransport {
        fn replying(value: Value) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(serde_json::to_vec(&value).unwrap()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn replying_raw(raw: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(raw.as_bytes().to_vec()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing(fault: fn() -> InvocationFault) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(fault),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl Transport for StubTransport {
        fn invoke(&self, function: &str, body: Vec<u8>) -> Result<Vec<u8>, InvocationFault> {
            let payload: Value = serde_json::from_slice(&body).unwrap();
            self.seen.lock().push((function.to_string(), payload));
            match &self.reply {
                Ok(bytes) => Ok(bytes.clone()),
                Err(fault) => Err(fault()),
            }
        }
    }

    fn payload(value: Value) -> RemotePayload {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn unconfigured_target_uses_mock() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let client = RemoteClient::from_target(&RemoteTarget::default(), runtime.handle().clone());
        assert!(client.is_mock());
        let out = client
            .invoke(&payload(json!({"action": "kb_search", "query": "q"})))
            .unwrap();
        assert_eq!(out["total"], json!(2));
    }

    #[test]
    fn sends_payload_and_unwraps_envelope() {
        let transport = StubTransport::replying(json!({
            "statusCode": 200,
            "body": "{\"response\":\"hello\"}"
        }));
        let client = RemoteClient::with_transport("ai-fn", transport.clone());
        let out = client.invoke(&payload(json!({"message": "hi"}))).unwrap();
        assert_eq!(out, payload(json!({"response": "hello"})));

        let seen = transport.seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "ai-fn");
        assert_eq!(seen[0].1, json!({"message": "hi"}));
    }

    #[test]
    fn malformed_body_is_decode_fault() {
        let transport = StubTransport::replying(json!({"statusCode": 200, "body": "nope"}));
        let client = RemoteClient::with_transport("ai-fn", transport);
        let err = client.invoke(&payload(json!({"message": "hi"}))).unwrap_err();
        assert!(matches!(err, InvocationFault::Decode(_)));
    }

    #[test]
    fn non_json_response_is_decode_fault() {
        let client = RemoteClient::with_transport("ai-fn", StubTransport::replying_raw("<html>"));
        let err = client.invoke(&payload(json!({"message": "hi"}))).unwrap_err();
        assert!(matches!(err, InvocationFault::Decode(_)));
    }

    #[test]
    fn non_object_result_is_rejected() {
        let client = RemoteClient::with_transport("ai-fn", StubTransport::replying(json!([1])));
        let err = client.invoke(&payload(json!({"message": "hi"}))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "remote target returned an array where an object was expected"
        );
    }

    #[test]
    fn transport_faults_propagate() {
        let transport = StubTransport::failing(|| InvocationFault::Timeout {
            function: "ai-fn".into(),
        });
        let client = RemoteClient::with_transport("ai-fn", transport);
        let err = client.invoke(&payload(json!({"message": "hi"}))).unwrap_err();
        assert_eq!(err.to_string(), "remote target `ai-fn` timed out");
    }
}
