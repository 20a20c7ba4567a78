use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use resolver_proxy_core::{RemoteInvoker, value_kind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{Level, error, info, span, warn};

use crate::operations::{self, HandlerFault};

/// Event delivered by the resolver layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolverEvent {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub arguments: Value,
}

impl ResolverEvent {
    pub fn new(field: impl Into<String>, arguments: Value) -> Self {
        Self {
            field: field.into(),
            arguments,
        }
    }
}

/// Closed set of fields the AI proxy answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyField {
    GetAiResponse,
    SearchKnowledgeBase,
    ProcessBooking,
    Chat,
}

impl ProxyField {
    pub const ALL: [ProxyField; 4] = [
        ProxyField::GetAiResponse,
        ProxyField::SearchKnowledgeBase,
        ProxyField::ProcessBooking,
        ProxyField::Chat,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProxyField::GetAiResponse => "getAIResponse",
            ProxyField::SearchKnowledgeBase => "searchKnowledgeBase",
            ProxyField::ProcessBooking => "processBooking",
            ProxyField::Chat => "chat",
        }
    }
}

impl fmt::Display for ProxyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl FromStr for ProxyField {
    type Err = UnknownField;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ProxyField::ALL
            .into_iter()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| UnknownField(value.to_string()))
    }
}

/// Shaped error returned instead of raising past a dispatcher.
pub fn error_shape(message: impl Into<String>) -> Value {
    json!({ "error": message.into() })
}

pub fn unknown_field(field: &str) -> Value {
    warn!(field, "unknown field");
    error_shape(format!("Unknown field: {field}"))
}

/// `null` arguments behave like an empty mapping; anything else that is not
/// an object is a fault.
pub fn arguments_map(arguments: &Value) -> Result<Cow<'_, Map<String, Value>>, HandlerFault> {
    match arguments {
        Value::Object(map) => Ok(Cow::Borrowed(map)),
        Value::Null => Ok(Cow::Owned(Map::new())),
        other => Err(HandlerFault::InvalidArguments(value_kind(other))),
    }
}

/// Routes AI proxy fields to their handlers.
#[derive(Clone)]
pub struct Dispatcher {
    invoker: Arc<dyn RemoteInvoker>,
}

impl Dispatcher {
    pub fn new(invoker: Arc<dyn RemoteInvoker>) -> Self {
        Self { invoker }
    }

    /// Log the raw event, then dispatch it. Always yields a mapping.
    pub fn handle(&self, event: &ResolverEvent) -> Value {
        info!(
            event = %serde_json::to_string(event).unwrap_or_default(),
            "received event"
        );
        self.dispatch(&event.field, &event.arguments)
    }

    pub fn dispatch(&self, field: &str, arguments: &Value) -> Value {
        let Ok(op) = field.parse::<ProxyField>() else {
            return unknown_field(field);
        };
        let dispatch_span = span!(Level::INFO, "proxy.dispatch", field = %op);
        let _guard = dispatch_span.enter();
        match self.run(op, arguments) {
            Ok(output) => output,
            Err(fault) => {
                error!(error = %fault, "error processing request");
                error_shape(fault.to_string())
            }
        }
    }

    fn run(&self, op: ProxyField, arguments: &Value) -> Result<Value, HandlerFault> {
        let args = arguments_map(arguments)?;
        let invoker = self.invoker.as_ref();
        match op {
            ProxyField::GetAiResponse => Ok(operations::ai_response::handle(&args, invoker)),
            ProxyField::SearchKnowledgeBase => Ok(operations::kb_search::handle(&args, invoker)),
            ProxyField::ProcessBooking => operations::booking::handle(&args, invoker),
            ProxyField::Chat => Ok(operations::chat::handle(&args, invoker)),
        }
    }
}
