use resolver_proxy_core::{RemoteInvoker, RemotePayload};
use serde_json::{Map, Value, json};
use tracing::error;

use crate::value::{or_default, present};

const DEFAULT_LIMIT: u64 = 5;

/// `searchKnowledgeBase`: structured search against the knowledge base target.
pub fn handle(args: &Map<String, Value>, invoker: &dyn RemoteInvoker) -> Value {
    let Some(query) = present(args, "query") else {
        return json!({ "error": "Query is required" });
    };
    let limit = or_default(args, "limit", json!(DEFAULT_LIMIT));

    let mut payload = RemotePayload::new();
    payload.insert("action".to_string(), json!("kb_search"));
    payload.insert("query".to_string(), query.clone());
    payload.insert("limit".to_string(), limit);

    match invoker.invoke(&payload) {
        Ok(response) => json!({
            "results": or_default(&response, "results", json!([])),
            "total": or_default(&response, "total", json!(0)),
        }),
        Err(err) => {
            error!(error = %err, "error searching knowledge base");
            json!({ "results": [], "total": 0 })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::testing::RecordingInvoker;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn missing_query_skips_remote_call() {
        let invoker = RecordingInvoker::replying(json!({}));
        let out = handle(&args(json!({"limit": 3})), &invoker);
        assert_eq!(out, json!({"error": "Query is required"}));
        assert_eq!(invoker.call_count(), 0);
    }

    #[test]
    fn limit_defaults_to_five() {
        let invoker = RecordingInvoker::replying(json!({"results": [{"id": "a"}], "total": 1}));
        let out = handle(&args(json!({"query": "opening hours"})), &invoker);

        assert_eq!(
            invoker.last_payload(),
            Some(json!({"action": "kb_search", "query": "opening hours", "limit": 5}))
        );
        assert_eq!(out, json!({"results": [{"id": "a"}], "total": 1}));
    }

    #[test]
    fn explicit_limit_is_forwarded() {
        let invoker = RecordingInvoker::replying(json!({}));
        handle(&args(json!({"query": "menu", "limit": 10})), &invoker);
        assert_eq!(invoker.last_payload().unwrap()["limit"], json!(10));

        handle(&args(json!({"query": "menu", "limit": null})), &invoker);
        assert_eq!(invoker.last_payload().unwrap()["limit"], json!(5));
    }

    #[test]
    fn empty_response_uses_defaults() {
        let invoker = RecordingInvoker::replying(json!({"error": "Unknown action: x"}));
        let out = handle(&args(json!({"query": "q"})), &invoker);
        assert_eq!(out, json!({"results": [], "total": 0}));
    }

    #[test]
    fn remote_fault_yields_empty_results() {
        let invoker = RecordingInvoker::timing_out();
        let out = handle(&args(json!({"query": "q"})), &invoker);
        assert_eq!(out, json!({"results": [], "total": 0}));
    }
}
