//! Canned responses used when no remote target is configured.

use serde_json::{Map, Value, json};

const ACTION_QUERY: &str = "query";
const ACTION_KB_SEARCH: &str = "kb_search";
const ACTION_PROCESS_BOOKING: &str = "process_booking";
const ACTION_CHAT: &str = "chat";

/// Resolve which canned response a payload asks for.
///
/// An explicit `action` wins. Conversational payloads only carry `message`,
/// so those resolve to `chat`.
pub fn resolve_action(payload: &Map<String, Value>) -> &str {
    match payload.get("action") {
        Some(Value::String(action)) => action.as_str(),
        Some(_) => "",
        None if payload.contains_key("message") => ACTION_CHAT,
        None => "",
    }
}

/// Deterministic placeholder for a remote call. Pure: the same payload always
/// yields the same mapping.
pub fn respond(payload: &Map<String, Value>) -> Map<String, Value> {
    let action = resolve_action(payload);
    let value = match action {
        ACTION_QUERY => json!({
            "response": format!("Mock response for: {}", text_field(payload, "prompt")),
            "model": "mock",
        }),
        ACTION_KB_SEARCH => json!({
            "results": [
                {"id": "1", "content": "Mock result 1", "score": 0.9},
                {"id": "2", "content": "Mock result 2", "score": 0.8},
            ],
            "total": 2,
        }),
        ACTION_PROCESS_BOOKING => json!({
            "success": true,
            "bookingId": "MOCK-12345",
            "message": "Mock booking processed",
            "confirmationCode": "MOCK-CONF-001",
        }),
        ACTION_CHAT => {
            let mut reply = json!({
                "response": format!("Mock chat response for: {}", text_field(payload, "message")),
                "toolsUsed": [],
                "model": "mock",
            });
            // Echo a caller-supplied session; otherwise the handler's default applies.
            if let Some(session) = payload.get("sessionId").filter(|id| !id.is_null()) {
                reply["sessionId"] = session.clone();
            }
            reply
        }
        other => json!({ "error": format!("Unknown action: {other}") }),
    };
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn text_field(payload: &Map<String, Value>, key: &str) -> String {
    match payload.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("object payload")
    }

    #[test]
    fn kb_search_is_deterministic() {
        let request = payload(json!({"action": "kb_search", "query": "q"}));
        let first = respond(&request);
        let second = respond(&request);
        assert_eq!(first, second);

        let results = first["results"].as_array().expect("results");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["score"], json!(0.9));
        assert_eq!(results[1]["score"], json!(0.8));
        assert_eq!(first["total"], json!(2));
    }

    #[test]
    fn booking_returns_fixed_identifiers() {
        let out = respond(&payload(json!({"action": "process_booking", "booking": {}})));
        assert_eq!(out["success"], json!(true));
        assert_eq!(out["bookingId"], json!("MOCK-12345"));
        assert_eq!(out["confirmationCode"], json!("MOCK-CONF-001"));
    }

    #[test]
    fn query_echoes_prompt() {
        let out = respond(&payload(json!({"action": "query", "prompt": "weather?"})));
        assert_eq!(out["response"], json!("Mock response for: weather?"));
        assert_eq!(out["model"], json!("mock"));
    }

    #[test]
    fn message_keyed_payload_resolves_to_chat() {
        let request = payload(json!({"message": "hi"}));
        assert_eq!(resolve_action(&request), "chat");
        let out = respond(&request);
        assert_eq!(out["response"], json!("Mock chat response for: hi"));
        assert!(!out.contains_key("sessionId"));
        assert_eq!(out["toolsUsed"], json!([]));
    }

    #[test]
    fn chat_passes_session_through() {
        let out = respond(&payload(json!({"message": "hi", "sessionId": "s1"})));
        assert_eq!(out["sessionId"], json!("s1"));
    }

    #[test]
    fn explicit_action_beats_message_key() {
        let out = respond(&payload(json!({"action": "refund", "message": "hi"})));
        assert_eq!(out, payload(json!({"error": "Unknown action: refund"})));
    }

    #[test]
    fn empty_payload_is_unknown_action() {
        let out = respond(&Map::new());
        assert_eq!(out["error"], json!("Unknown action: "));
    }
}
