//! Remote-invocation core for the resolver proxy.
//!
//! This crate owns everything between a handler's request payload and the
//! normalized mapping it reads back: process configuration, the signed
//! transport to the remote compute target, envelope unwrapping, and the
//! deterministic mock used when no target is configured. Field routing and
//! output shaping live in `resolver-proxy-host`.

pub mod env;
pub mod envelope;
pub mod invoke;
pub mod mock;

pub use env::{ProxyConfig, RemoteTarget};
pub use envelope::value_kind;
pub use invoke::{
    Credentials, InvocationFault, LambdaTransport, RemoteClient, RemoteInvoker, RemotePayload,
    Transport,
};
