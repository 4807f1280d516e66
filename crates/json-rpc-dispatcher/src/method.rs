use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::error::{DispatcherError, MethodError, Result};

/// Result type for method handlers
pub type MethodResult = std::result::Result<Value, MethodError>;

/// One stage of a method's handler chain.
///
/// A stage receives the output of the previous stage (the call's `params` for the first
/// one) and either passes a new value on or stops the chain with an error code.
#[async_trait]
pub trait MethodHandler: Send + Sync {
    async fn handle(&self, params: Value) -> MethodResult;
}

/// Shared handle to a registered handler
pub type BoxedHandler = Arc<dyn MethodHandler>;

/// Handler backed by an async closure
pub struct FunctionHandler<F> {
    handler_fn: F,
}

impl<F, Fut> FunctionHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = MethodResult> + Send,
{
    pub fn new(handler_fn: F) -> Self {
        Self { handler_fn }
    }
}

#[async_trait]
impl<F, Fut> MethodHandler for FunctionHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = MethodResult> + Send,
{
    async fn handle(&self, params: Value) -> MethodResult {
        (self.handler_fn)(params).await
    }
}

/// Handler backed by a plain closure that completes without awaiting
pub struct SyncHandler<F> {
    handler_fn: F,
}

#[async_trait]
impl<F> MethodHandler for SyncHandler<F>
where
    F: Fn(Value) -> MethodResult + Send + Sync,
{
    async fn handle(&self, params: Value) -> MethodResult {
        (self.handler_fn)(params)
    }
}

/// Wrap an async closure as a chain stage
pub fn handler_fn<F, Fut>(handler_fn: F) -> BoxedHandler
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MethodResult> + Send + 'static,
{
    Arc::new(FunctionHandler::new(handler_fn))
}

/// Wrap a synchronous closure as a chain stage
pub fn sync_fn<F>(handler_fn: F) -> BoxedHandler
where
    F: Fn(Value) -> MethodResult + Send + Sync + 'static,
{
    Arc::new(SyncHandler { handler_fn })
}

/// Ordered, non-empty sequence of handlers registered under one method name
#[derive(Clone)]
pub struct HandlerChain {
    handlers: Arc<[BoxedHandler]>,
}

impl HandlerChain {
    pub fn new<I>(handlers: I) -> Result<Self>
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        let handlers: Vec<BoxedHandler> = handlers.into_iter().collect();
        if handlers.is_empty() {
            return Err(DispatcherError::InvalidArgument(
                "there should be at least one handler callback".to_string(),
            ));
        }
        Ok(Self {
            handlers: handlers.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run every stage in order, threading the value through; the first error stops
    /// the chain.
    pub async fn run(&self, params: Value) -> MethodResult {
        let mut value = params;
        for handler in self.handlers.iter() {
            value = handler.handle(value).await?;
        }
        Ok(value)
    }
}

impl std::fmt::Debug for HandlerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerChain")
            .field("len", &self.handlers.len())
            .finish()
    }
}

/// Method name to handler chain mapping
#[derive(Debug)]
pub struct MethodRegistry {
    methods: HashMap<String, HandlerChain>,
    reserved_prefix: String,
}

impl MethodRegistry {
    pub fn new(reserved_prefix: impl Into<String>) -> Self {
        Self {
            methods: HashMap::new(),
            reserved_prefix: reserved_prefix.into(),
        }
    }

    /// Register the handler chain for `name`. Names are unique and cannot be
    /// unregistered.
    pub fn register<I>(&mut self, name: &str, handlers: I) -> Result<()>
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        if name.is_empty() {
            return Err(DispatcherError::InvalidArgument(
                "no method name".to_string(),
            ));
        }

        if self.is_reserved(name) {
            return Err(DispatcherError::ReservedName(name.to_string()));
        }

        if self.methods.contains_key(name) {
            return Err(DispatcherError::DuplicateMethod(name.to_string()));
        }

        let chain = HandlerChain::new(handlers)?;
        info!(method = name, stages = chain.len(), "Registered JSON-RPC method");
        self.methods.insert(name.to_string(), chain);
        Ok(())
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        !self.reserved_prefix.is_empty() && name.starts_with(&self.reserved_prefix)
    }

    pub fn get(&self, name: &str) -> Option<&HandlerChain> {
        self.methods.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Registered method names, sorted
    pub fn registered_methods(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_RESERVED_PREFIX)
    }
}
