//! # JSON-RPC Dispatcher Prelude
//!
//! This module provides convenient re-exports of the most commonly used types
//! from the JSON-RPC dispatcher library.
//!
//! ```rust
//! use json_rpc_dispatcher::prelude::*;
//! ```

// Dispatcher and configuration
pub use crate::builder::DispatcherBuilder;
pub use crate::config::{DispatcherConfig, UnknownErrorCodePolicy};
pub use crate::dispatch::JsonRpcDispatcher;

// Handlers
pub use crate::method::{BoxedHandler, MethodHandler, MethodResult, handler_fn, sync_fn};

// Core JSON-RPC types
pub use crate::error::{DispatcherError, JsonRpcError, JsonRpcErrorCode, MethodError};
pub use crate::events::{DispatchEvent, EventKind};
pub use crate::response::{JsonRpcMessage, JsonRpcResponse, Reply};
pub use crate::types::{JsonRpcVersion, RequestId};

// Standard error codes
pub use crate::error_codes::*;
