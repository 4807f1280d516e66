//! Dispatcher Builder
//!
//! Collects configuration, error codes and methods, then validates them all at `build()`.

use crate::config::{DispatcherConfig, UnknownErrorCodePolicy};
use crate::dispatch::JsonRpcDispatcher;
use crate::error::Result;
use crate::method::BoxedHandler;

struct PendingError {
    code: i64,
    message: String,
    force: bool,
}

/// Builder for [`JsonRpcDispatcher`]
#[derive(Default)]
pub struct DispatcherBuilder {
    config: DispatcherConfig,

    /// Custom error codes, registered before any method
    errors: Vec<PendingError>,

    /// Methods in registration order
    methods: Vec<(String, Vec<BoxedHandler>)>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    pub fn reserved_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.reserved_prefix = prefix.into();
        self
    }

    pub fn unknown_error_code(mut self, policy: UnknownErrorCodePolicy) -> Self {
        self.config.unknown_error_code = policy;
        self
    }

    pub fn custom_error(mut self, code: i64, message: impl Into<String>) -> Self {
        self.errors.push(PendingError {
            code,
            message: message.into(),
            force: false,
        });
        self
    }

    /// Register a custom error, replacing any earlier message for the same code
    pub fn custom_error_forced(mut self, code: i64, message: impl Into<String>) -> Self {
        self.errors.push(PendingError {
            code,
            message: message.into(),
            force: true,
        });
        self
    }

    pub fn method<I>(mut self, name: impl Into<String>, handlers: I) -> Self
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        self.methods
            .push((name.into(), handlers.into_iter().collect()));
        self
    }

    /// Build the dispatcher, failing on the first invalid error code or method.
    pub fn build(self) -> Result<JsonRpcDispatcher> {
        let mut dispatcher = JsonRpcDispatcher::with_config(self.config);

        for error in self.errors {
            dispatcher.add_custom_error(error.code, error.message, error.force)?;
        }

        for (name, handlers) in self.methods {
            dispatcher.register_method(&name, handlers)?;
        }

        Ok(dispatcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DispatcherError;
    use crate::method::sync_fn;
    use serde_json::json;

    #[test]
    fn test_builder_registers_everything() {
        let dispatcher = DispatcherBuilder::new()
            .reserved_prefix("sys.")
            .custom_error(100, "Busy")
            .custom_error_forced(100, "Try again later")
            .method("ping", [sync_fn(|_| Ok(json!("pong")))])
            .method("rpc_echo", [sync_fn(Ok)])
            .build()
            .unwrap();

        assert_eq!(dispatcher.config().reserved_prefix, "sys.");
        assert_eq!(dispatcher.errors().message(100), Some("Try again later"));
        assert_eq!(
            dispatcher.registered_methods(),
            vec!["ping".to_string(), "rpc_echo".to_string()]
        );
    }

    #[test]
    fn test_builder_reports_first_failure() {
        let result = DispatcherBuilder::new()
            .method("ping", [sync_fn(Ok)])
            .method("ping", [sync_fn(Ok)])
            .build();
        assert!(matches!(result, Err(DispatcherError::DuplicateMethod(_))));

        let result = DispatcherBuilder::new().custom_error(-5, "nope").build();
        assert!(matches!(result, Err(DispatcherError::InvalidArgument(_))));

        let result = DispatcherBuilder::new()
            .method("rpc_ping", [sync_fn(Ok)])
            .build();
        assert!(matches!(result, Err(DispatcherError::ReservedName(_))));
    }
}
