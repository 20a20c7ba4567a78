//! One handler per supported field.
//!
//! Every handler follows the same skeleton: check required arguments (and
//! answer with the field's validation shape without calling out), build the
//! remote payload, invoke, then map the result onto the field's fixed output
//! shape. Remote faults never escape a handler; they become the field's
//! failure shape. Only [`HandlerFault`] travels up to the dispatcher.

use serde_json::{Value, json};
use thiserror::Error;

pub mod ai_response;
pub mod booking;
pub mod chat;
pub mod kb_search;

/// Faults a handler cannot shape itself.
#[derive(Debug, Error)]
pub enum HandlerFault {
    #[error("arguments must be an object, got {0}")]
    InvalidArguments(&'static str),
    #[error("booking input must be an object, got {0}")]
    InvalidBookingInput(&'static str),
    #[error("failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),
}

pub(crate) fn error_message(err: &impl std::fmt::Display) -> Value {
    json!(format!("Error: {err}"))
}
