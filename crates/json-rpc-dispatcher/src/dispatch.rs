use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::builder::DispatcherBuilder;
use crate::config::{DispatcherConfig, UnknownErrorCodePolicy};
use crate::error::{DispatcherError, JsonRpcError, JsonRpcErrorCode, Result};
use crate::events::{DispatchEvent, EventEmitter};
use crate::method::{BoxedHandler, MethodRegistry};
use crate::registry::ErrorRegistry;
use crate::request::JsonRpcCall;
use crate::response::{JsonRpcMessage, JsonRpcResponse, Reply};
use crate::types::RequestId;

/// JSON-RPC 2.0 dispatcher: method and error registries plus the lifecycle event hub.
///
/// Registration needs `&mut self` and dispatch only `&self`, so every method and error
/// code is in place before the first request is served.
#[derive(Debug)]
pub struct JsonRpcDispatcher {
    config: DispatcherConfig,
    methods: MethodRegistry,
    errors: ErrorRegistry,
    events: EventEmitter,
}

impl JsonRpcDispatcher {
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    pub fn with_config(config: DispatcherConfig) -> Self {
        Self {
            methods: MethodRegistry::new(config.reserved_prefix.clone()),
            errors: ErrorRegistry::new(),
            events: EventEmitter::new(),
            config,
        }
    }

    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Lifecycle events of this dispatcher
    pub fn events(&self) -> &EventEmitter {
        &self.events
    }

    pub fn methods(&self) -> &MethodRegistry {
        &self.methods
    }

    pub fn errors(&self) -> &ErrorRegistry {
        &self.errors
    }

    /// Register `name` with its handler chain, run in the given order for every call.
    pub fn register_method<I>(&mut self, name: &str, handlers: I) -> Result<()>
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        self.methods.register(name, handlers)
    }

    /// Register an application error code (`> 0`) that handlers may fail with.
    pub fn add_custom_error(
        &mut self,
        code: i64,
        message: impl Into<String>,
        force: bool,
    ) -> Result<()> {
        self.errors.add_custom_error(code, message, force)
    }

    /// Get all registered methods
    pub fn registered_methods(&self) -> Vec<String> {
        self.methods.registered_methods()
    }

    /// Dispatch a call object or a batch and deliver the reply to `callback`.
    ///
    /// `response_raw` fires before the callback and the `response` events after it.
    /// A data value that is neither an object nor an array is answered with a parse
    /// error without awaiting anything. On `Err` the callback is never invoked.
    pub async fn request<F>(&self, data: Value, callback: F) -> Result<()>
    where
        F: FnOnce(Reply),
    {
        let reply = self.dispatch(data).await?;
        callback(reply.clone());
        self.emit_responses(reply);
        Ok(())
    }

    /// Like [`request`](Self::request), returning the reply instead of calling back.
    pub async fn handle(&self, data: Value) -> Result<Reply> {
        let reply = self.dispatch(data).await?;
        self.emit_responses(reply.clone());
        Ok(reply)
    }

    /// Dispatch JSON text and serialize the answer.
    ///
    /// Text that is not valid JSON gets the parse-error envelope. `None` means there is
    /// nothing to send back, and batch answers leave out calls without a response.
    pub async fn handle_message(&self, text: &str) -> Result<Option<String>> {
        let data = serde_json::from_str::<Value>(text).unwrap_or_else(|err| {
            debug!(%err, "Unparseable JSON-RPC payload");
            Value::Null
        });
        let reply = self.handle(data).await?;
        match reply.to_wire_value()? {
            Some(value) => Ok(Some(serde_json::to_string(&value)?)),
            None => Ok(None),
        }
    }

    async fn dispatch(&self, data: Value) -> Result<Reply> {
        let reply = match data {
            Value::Array(items) => {
                debug!(calls = items.len(), "Dispatching JSON-RPC batch");
                Reply::Batch(self.handle_calls(&items).await?)
            }
            Value::Object(_) => {
                let mut results = self.handle_calls(std::slice::from_ref(&data)).await?;
                Reply::Single(results.pop().flatten())
            }
            other => {
                warn!(data = %other, "JSON-RPC payload is neither an object nor an array");
                self.events.emit(&DispatchEvent::RequestRaw(Value::Null));
                self.events.emit(&DispatchEvent::Request(Value::Null));
                Reply::Single(Some(
                    self.errors
                        .standard_error(JsonRpcErrorCode::ParseError, None)
                        .into(),
                ))
            }
        };

        let raw = match &reply {
            Reply::Single(message) => vec![message.clone()],
            Reply::Batch(messages) => messages.clone(),
        };
        self.events.emit(&DispatchEvent::ResponseRaw(raw));
        Ok(reply)
    }

    fn emit_responses(&self, reply: Reply) {
        match reply {
            Reply::Single(message) => self.events.emit(&DispatchEvent::Response(message)),
            Reply::Batch(messages) => {
                for message in messages {
                    self.events.emit(&DispatchEvent::Response(message));
                }
            }
        }
    }

    /// Run every call concurrently; slot `i` of the output answers `items[i]`.
    async fn handle_calls(&self, items: &[Value]) -> Result<Vec<Option<JsonRpcMessage>>> {
        join_all(items.iter().map(|item| self.handle_call(item)))
            .await
            .into_iter()
            .collect()
    }

    async fn handle_call(&self, item: &Value) -> Result<Option<JsonRpcMessage>> {
        self.events.emit(&DispatchEvent::RequestRaw(item.clone()));

        let call = match JsonRpcCall::from_value(item) {
            Ok(call) => call,
            Err(reason) => {
                warn!(?reason, "Invalid JSON-RPC request");
                return Ok(Some(
                    self.errors
                        .standard_error(JsonRpcErrorCode::InvalidRequest, None)
                        .into(),
                ));
            }
        };

        let Some(chain) = self.methods.get(&call.method) else {
            debug!(method = %call.method, "Method not found");
            return Ok(Some(
                self.errors
                    .standard_error(JsonRpcErrorCode::MethodNotFound, call.id)
                    .into(),
            ));
        };

        self.events.emit(&DispatchEvent::Request(item.clone()));
        debug!(
            method = %call.method,
            id = ?call.id,
            stages = chain.len(),
            "Dispatching JSON-RPC call"
        );

        match chain.run(call.params).await {
            Err(err) => Ok(Some(self.handler_error(err.code, call.id)?.into())),
            Ok(_) if call.id.is_none() => {
                debug!(method = %call.method, "Notification handled, no response");
                Ok(None)
            }
            Ok(result) => Ok(Some(JsonRpcResponse::for_call(result, call.id)?.into())),
        }
    }

    fn handler_error(&self, code: i64, id: Option<RequestId>) -> Result<JsonRpcError> {
        match self.errors.make_error_response(code, id.clone()) {
            Err(DispatcherError::UnknownErrorCode(code))
                if self.config.unknown_error_code == UnknownErrorCodePolicy::InternalError =>
            {
                warn!(
                    code,
                    "Handler failed with unregistered error code, answering Internal error"
                );
                Ok(self
                    .errors
                    .standard_error(JsonRpcErrorCode::InternalError, id))
            }
            Err(err) => {
                error!(code, "Handler failed with unregistered error code");
                Err(err)
            }
            ok => ok,
        }
    }
}

impl Default for JsonRpcDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
