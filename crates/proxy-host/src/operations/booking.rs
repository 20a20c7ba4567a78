use resolver_proxy_core::{RemoteInvoker, RemotePayload, value_kind};
use serde_json::{Map, Value, json};
use tracing::error;

use super::{HandlerFault, error_message};
use crate::value::{or_default, or_null, present, render};

const DEFAULT_MESSAGE: &str = "Booking processed";

/// `processBooking`: turn the booking input into a natural-language request
/// and hand both to the booking target.
pub fn handle(
    args: &Map<String, Value>,
    invoker: &dyn RemoteInvoker,
) -> Result<Value, HandlerFault> {
    let empty = Map::new();
    let input = match args.get("input") {
        None | Some(Value::Null) => &empty,
        Some(Value::Object(input)) => input,
        Some(other) => return Err(HandlerFault::InvalidBookingInput(value_kind(other))),
    };

    if present(input, "brand").is_none() {
        return Ok(json!({ "success": false, "message": "Brand is required" }));
    }

    let prompt = build_prompt(input);
    let mut payload = RemotePayload::new();
    payload.insert("action".to_string(), json!("process_booking"));
    payload.insert("booking".to_string(), Value::Object(input.clone()));
    payload.insert("prompt".to_string(), json!(prompt));

    let output = match invoker.invoke(&payload) {
        Ok(response) => json!({
            "success": or_default(&response, "success", json!(false)),
            "bookingId": or_null(&response, "bookingId"),
            "message": or_default(&response, "message", json!(DEFAULT_MESSAGE)),
            "details": {
                "brand": or_null(input, "brand"),
                "branch": or_null(input, "branch"),
                "date": or_null(input, "date"),
                "time": or_null(input, "time"),
                "confirmationCode": or_null(&response, "confirmationCode"),
            },
        }),
        Err(err) => {
            error!(error = %err, "error processing booking");
            json!({ "success": false, "message": error_message(&err) })
        }
    };
    Ok(output)
}

/// Natural-language booking request. Clauses appear in a fixed order and only
/// for fields that are present.
pub fn build_prompt(input: &Map<String, Value>) -> String {
    let brand = present(input, "brand")
        .map(render)
        .unwrap_or_else(|| "unknown brand".to_string());
    let mut prompt = format!("Process a booking request for {brand}");

    if let Some(branch) = present(input, "branch") {
        prompt.push_str(&format!(" at {} branch", render(branch)));
    }
    if let Some(date) = present(input, "date") {
        prompt.push_str(&format!(" on {}", render(date)));
    }
    if let Some(time) = present(input, "time") {
        prompt.push_str(&format!(" at {}", render(time)));
    }
    if let Some(guests) = present(input, "guests") {
        prompt.push_str(&format!(" for {} guests", render(guests)));
    }
    if let Some(customer) = present(input, "customerName") {
        prompt.push_str(&format!(". Customer: {}", render(customer)));
    }
    prompt
}
