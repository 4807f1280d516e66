//! Error code registry used to build error envelopes

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{DispatcherError, JsonRpcError, JsonRpcErrorCode, JsonRpcErrorObject, Result};
use crate::types::RequestId;

/// Mapping from error code to the message sent in error responses.
///
/// Seeded with the five standard JSON-RPC codes. Entries can be added or overwritten
/// (with `force`) but never removed.
#[derive(Debug, Clone)]
pub struct ErrorRegistry {
    errors: BTreeMap<i64, String>,
}

impl ErrorRegistry {
    pub fn new() -> Self {
        let errors = JsonRpcErrorCode::STANDARD
            .iter()
            .map(|code| (code.code(), code.message().to_string()))
            .collect();
        Self { errors }
    }

    /// Add an error code of any sign. Standard codes can only be replaced with `force`.
    pub fn add_error(&mut self, code: i64, message: impl Into<String>, force: bool) -> Result<()> {
        let message = message.into();
        if message.is_empty() {
            return Err(DispatcherError::InvalidArgument(
                "no error message".to_string(),
            ));
        }

        if !force && self.errors.contains_key(&code) {
            return Err(DispatcherError::DuplicateError(code));
        }

        debug!(code, message = %message, force, "Registered error code");
        self.errors.insert(code, message);
        Ok(())
    }

    /// Add an application error code. Codes `<= 0` belong to the protocol.
    pub fn add_custom_error(
        &mut self,
        code: i64,
        message: impl Into<String>,
        force: bool,
    ) -> Result<()> {
        if code <= 0 {
            return Err(DispatcherError::InvalidArgument(
                "error code should be greater than zero".to_string(),
            ));
        }
        self.add_error(code, message, force)
    }

    pub fn message(&self, code: i64) -> Option<&str> {
        self.errors.get(&code).map(String::as_str)
    }

    pub fn contains(&self, code: i64) -> bool {
        self.errors.contains_key(&code)
    }

    /// Registered codes in ascending order
    pub fn codes(&self) -> impl Iterator<Item = i64> + '_ {
        self.errors.keys().copied()
    }

    /// Build the error envelope for `code`, failing if the code was never registered.
    pub fn make_error_response(&self, code: i64, id: Option<RequestId>) -> Result<JsonRpcError> {
        let message = self
            .message(code)
            .ok_or(DispatcherError::UnknownErrorCode(code))?;
        Ok(JsonRpcError::new(id, JsonRpcErrorObject::new(code, message)))
    }

    /// Envelope for one of the standard codes, which are always present.
    pub(crate) fn standard_error(
        &self,
        code: JsonRpcErrorCode,
        id: Option<RequestId>,
    ) -> JsonRpcError {
        // Standard messages may have been overwritten with `force`
        let message = self.message(code.code()).unwrap_or(code.message());
        JsonRpcError::new(id, JsonRpcErrorObject::new(code.code(), message))
    }
}

impl Default for ErrorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
