use std::time::Instant;

use resolver_proxy_core::{RemoteInvoker, RemotePayload};
use serde_json::{Map, Value, json};
use tracing::error;

use super::error_message;
use crate::value::{or_default, present};

const DEFAULT_MODEL: &str = "amazon.nova-micro";
const NO_RESPONSE: &str = "No response";

/// `getAIResponse`: forward a single prompt to the conversational target.
pub fn handle(args: &Map<String, Value>, invoker: &dyn RemoteInvoker) -> Value {
    let Some(prompt) = present(args, "prompt") else {
        return json!({ "error": "Prompt is required" });
    };

    let started = Instant::now();
    let mut payload = RemotePayload::new();
    payload.insert("message".to_string(), prompt.clone());

    match invoker.invoke(&payload) {
        Ok(response) => json!({
            "response": or_default(&response, "response", json!(NO_RESPONSE)),
            "model": or_default(&response, "model", json!(DEFAULT_MODEL)),
            "processingTime": elapsed_seconds(started),
        }),
        Err(err) => {
            error!(error = %err, "error getting AI response");
            json!({
                "response": error_message(&err),
                "model": "error",
                "processingTime": elapsed_seconds(started),
            })
        }
    }
}

/// Wall-clock seconds since `started`, to millisecond precision.
fn elapsed_seconds(started: Instant) -> f64 {
    (started.elapsed().as_secs_f64() * 1000.0).round() / 1000.0
}
