use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::types::{JsonRpcVersion, RequestId};

/// The five protocol-standard JSON-RPC error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonRpcErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
}

impl JsonRpcErrorCode {
    /// Every standard code, in the order an error registry is seeded with them
    pub const STANDARD: [JsonRpcErrorCode; 5] = [
        JsonRpcErrorCode::ParseError,
        JsonRpcErrorCode::InvalidRequest,
        JsonRpcErrorCode::MethodNotFound,
        JsonRpcErrorCode::InvalidParams,
        JsonRpcErrorCode::InternalError,
    ];

    pub fn code(&self) -> i64 {
        match self {
            JsonRpcErrorCode::ParseError => crate::error_codes::PARSE_ERROR,
            JsonRpcErrorCode::InvalidRequest => crate::error_codes::INVALID_REQUEST,
            JsonRpcErrorCode::MethodNotFound => crate::error_codes::METHOD_NOT_FOUND,
            JsonRpcErrorCode::InvalidParams => crate::error_codes::INVALID_PARAMS,
            JsonRpcErrorCode::InternalError => crate::error_codes::INTERNAL_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            JsonRpcErrorCode::ParseError => "Parse error.",
            JsonRpcErrorCode::InvalidRequest => "Invalid Request.",
            JsonRpcErrorCode::MethodNotFound => "Method not found.",
            JsonRpcErrorCode::InvalidParams => "Invalid params.",
            JsonRpcErrorCode::InternalError => "Internal error.",
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::STANDARD.into_iter().find(|c| c.code() == code)
    }
}

impl fmt::Display for JsonRpcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// JSON-RPC Error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcErrorObject {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

impl From<JsonRpcErrorCode> for JsonRpcErrorObject {
    fn from(code: JsonRpcErrorCode) -> Self {
        Self::new(code.code(), code.message())
    }
}

/// JSON-RPC Error response
///
/// `id` serializes as `null` when the id of the failed call could not be determined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub error: JsonRpcErrorObject,
    pub id: Option<RequestId>,
}

impl JsonRpcError {
    pub fn new(id: Option<RequestId>, error: JsonRpcErrorObject) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            error,
            id,
        }
    }

    pub fn code(&self) -> i64 {
        self.error.code
    }
}

impl fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "JSON-RPC Error {}: {}",
            self.error.code, self.error.message
        )
    }
}

impl std::error::Error for JsonRpcError {}

/// Failure reported by a method handler.
///
/// The code is looked up in the dispatcher's error registry to build the error envelope,
/// so it must be one of the standard codes or a code added with `add_custom_error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("method handler failed with error code {code}")]
pub struct MethodError {
    pub code: i64,
}

impl MethodError {
    pub fn new(code: i64) -> Self {
        Self { code }
    }

    pub fn invalid_params() -> Self {
        JsonRpcErrorCode::InvalidParams.into()
    }

    pub fn internal_error() -> Self {
        JsonRpcErrorCode::InternalError.into()
    }
}

impl From<i64> for MethodError {
    fn from(code: i64) -> Self {
        Self::new(code)
    }
}

impl From<JsonRpcErrorCode> for MethodError {
    fn from(code: JsonRpcErrorCode) -> Self {
        Self::new(code.code())
    }
}

/// Misuse of the dispatcher API by the embedding application.
///
/// These are never turned into JSON-RPC error envelopes.
#[derive(Debug, Error)]
pub enum DispatcherError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("method name \"{0}\" is reserved")]
    ReservedName(String),

    #[error("method \"{0}\" is already registered")]
    DuplicateMethod(String),

    #[error("error code {0} is already defined")]
    DuplicateError(i64),

    #[error("error code {0} does not exist")]
    UnknownErrorCode(i64),

    #[error("no call id")]
    MissingCallId,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DispatcherError>;
