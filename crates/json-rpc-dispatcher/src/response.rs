use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DispatcherError, JsonRpcError, Result};
use crate::types::{JsonRpcVersion, RequestId};

/// A successful JSON-RPC response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub result: Value,
    pub id: RequestId,
}

impl JsonRpcResponse {
    pub fn new(id: RequestId, result: Value) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            result,
            id,
        }
    }

    /// Build the response for a completed call.
    ///
    /// A success response must echo a truthy id; notifications never get one.
    pub fn for_call(result: Value, id: Option<RequestId>) -> Result<Self> {
        let id = id.ok_or(DispatcherError::MissingCallId)?;
        Ok(Self::new(id, result))
    }
}

/// Union type that represents either a successful response or an error response
/// This ensures JSON-RPC 2.0 compliance by keeping success and error responses separate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcMessage {
    /// Successful response with result field
    Response(JsonRpcResponse),
    /// Error response with error field
    Error(JsonRpcError),
}

impl JsonRpcMessage {
    /// Check if this is an error response
    pub fn is_error(&self) -> bool {
        matches!(self, JsonRpcMessage::Error(_))
    }

    /// Get the request ID from either response or error
    pub fn id(&self) -> Option<&RequestId> {
        match self {
            JsonRpcMessage::Response(resp) => Some(&resp.id),
            JsonRpcMessage::Error(err) => err.id.as_ref(),
        }
    }

    pub fn result(&self) -> Option<&Value> {
        match self {
            JsonRpcMessage::Response(resp) => Some(&resp.result),
            JsonRpcMessage::Error(_) => None,
        }
    }

    pub fn error_code(&self) -> Option<i64> {
        match self {
            JsonRpcMessage::Response(_) => None,
            JsonRpcMessage::Error(err) => Some(err.code()),
        }
    }
}

impl From<JsonRpcResponse> for JsonRpcMessage {
    fn from(response: JsonRpcResponse) -> Self {
        Self::Response(response)
    }
}

impl From<JsonRpcError> for JsonRpcMessage {
    fn from(error: JsonRpcError) -> Self {
        Self::Error(error)
    }
}

/// What a dispatch delivers to its caller, shaped like the input it answered.
///
/// A `None` slot is a call that produced no response (a successful notification), which
/// is distinct from an error response.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Answer to a single call object
    Single(Option<JsonRpcMessage>),
    /// Answer to a batch, one slot per input element, in input order
    Batch(Vec<Option<JsonRpcMessage>>),
}

impl Reply {
    pub fn is_batch(&self) -> bool {
        matches!(self, Reply::Batch(_))
    }

    pub fn as_single(&self) -> Option<&JsonRpcMessage> {
        match self {
            Reply::Single(message) => message.as_ref(),
            Reply::Batch(_) => None,
        }
    }

    pub fn as_batch(&self) -> Option<&[Option<JsonRpcMessage>]> {
        match self {
            Reply::Single(_) => None,
            Reply::Batch(slots) => Some(slots),
        }
    }

    /// Wire form of the reply: `None` slots are dropped, and nothing is returned when no
    /// call produced a response.
    pub fn to_wire_value(&self) -> Result<Option<Value>> {
        match self {
            Reply::Single(None) => Ok(None),
            Reply::Single(Some(message)) => Ok(Some(serde_json::to_value(message)?)),
            Reply::Batch(slots) => {
                let messages = slots
                    .iter()
                    .flatten()
                    .map(serde_json::to_value)
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                if messages.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(Value::Array(messages)))
                }
            }
        }
    }
}
