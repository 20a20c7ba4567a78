use resolver_proxy_core::{RemoteInvoker, RemotePayload};
use serde_json::{Map, Value, json};
use tracing::error;

use super::error_message;
use crate::value::{or_default, present};

const NO_RESPONSE: &str = "No response";

/// `chat`: conversational turn, optionally tied to a caller session.
pub fn handle(args: &Map<String, Value>, invoker: &dyn RemoteInvoker) -> Value {
    let Some(message) = present(args, "message") else {
        return json!({ "error": "Message is required" });
    };
    let session_id = or_default(args, "sessionId", json!(""));

    let mut payload = RemotePayload::new();
    payload.insert("message".to_string(), message.clone());

    match invoker.invoke(&payload) {
        Ok(response) => json!({
            "response": or_default(&response, "response", json!(NO_RESPONSE)),
            "sessionId": or_default(&response, "sessionId", session_id),
            "toolsUsed": or_default(&response, "toolsUsed", json!([])),
        }),
        Err(err) => {
            error!(error = %err, "error in chat");
            json!({
                "response": error_message(&err),
                "sessionId": session_id,
                "toolsUsed": [],
            })
        }
    }
}
