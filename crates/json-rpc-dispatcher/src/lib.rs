//! # JSON-RPC 2.0 Dispatcher
//!
//! A pure, transport-agnostic JSON-RPC 2.0 request dispatcher.
//! Callers hand it a decoded call object or batch; it validates the envelope, runs the
//! method's handler chain and hands back the response envelope(s). Framing the bytes on
//! the wire is left to the embedding application.
//!
//! ## Features
//! - Method registration with ordered handler chains (middleware with waterfall semantics)
//! - Concurrent batch dispatch with input-order results
//! - Notifications that produce no response
//! - Error code registry seeded with the standard codes, open to custom codes
//! - Lifecycle events (`request_raw`, `request`, `response_raw`, `response`)
//!
//! ```rust,no_run
//! use json_rpc_dispatcher::prelude::*;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), DispatcherError> {
//! let mut dispatcher = JsonRpcDispatcher::new();
//! dispatcher.register_method(
//!     "sum",
//!     [sync_fn(|params| {
//!         let first = params["first"].as_i64().ok_or_else(MethodError::invalid_params)?;
//!         let second = params["second"].as_i64().ok_or_else(MethodError::invalid_params)?;
//!         Ok(json!(first + second))
//!     })],
//! )?;
//!
//! let reply = dispatcher
//!     .handle(json!({
//!         "jsonrpc": "2.0",
//!         "method": "sum",
//!         "params": {"first": 5, "second": 8},
//!         "id": 777
//!     }))
//!     .await?;
//! assert_eq!(reply.as_single().and_then(JsonRpcMessage::result), Some(&json!(13)));
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod method;
pub mod prelude;
pub mod registry;
pub mod request;
pub mod response;
pub mod types;

// Re-export main types
pub use builder::DispatcherBuilder;
pub use config::{DispatcherConfig, UnknownErrorCodePolicy};
pub use dispatch::JsonRpcDispatcher;
pub use error::{
    DispatcherError, JsonRpcError, JsonRpcErrorCode, JsonRpcErrorObject, MethodError, Result,
};
pub use events::{DispatchEvent, EventEmitter, EventKind, ListenerId};
pub use method::{
    BoxedHandler, HandlerChain, MethodHandler, MethodRegistry, MethodResult, handler_fn, sync_fn,
};
pub use registry::ErrorRegistry;
pub use request::{InvalidCall, JsonRpcCall};
pub use response::{JsonRpcMessage, JsonRpcResponse, Reply};
pub use types::{CallId, JsonRpcVersion, RequestId};

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
}
