use serde_json::Value;

use crate::types::{CallId, RequestId};

/// A validated JSON-RPC call object.
///
/// Built from the raw JSON value of one request (or one batch element). `params` is kept
/// as-is since it seeds the method's handler chain; it may be any JSON value, `null`
/// included, but it must be present.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcCall {
    pub method: String,
    pub params: Value,
    /// `None` for notifications
    pub id: Option<RequestId>,
}

/// Why a raw value is not a valid call object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidCall {
    NotAnObject,
    WrongVersion,
    MissingMethod,
    MissingParams,
    InvalidId,
}

impl JsonRpcCall {
    pub fn new(method: impl Into<String>, params: Value, id: Option<RequestId>) -> Self {
        Self {
            method: method.into(),
            params,
            id,
        }
    }

    /// Validate the JSON-RPC envelope of a raw call.
    pub fn from_value(item: &Value) -> Result<Self, InvalidCall> {
        let obj = item.as_object().ok_or(InvalidCall::NotAnObject)?;

        match obj.get("jsonrpc") {
            Some(Value::String(version)) if version == crate::JSONRPC_VERSION => {}
            _ => return Err(InvalidCall::WrongVersion),
        }

        let method = obj
            .get("method")
            .and_then(Value::as_str)
            .ok_or(InvalidCall::MissingMethod)?;
        let params = obj.get("params").ok_or(InvalidCall::MissingParams)?;

        let id = match CallId::from_member(obj.get("id")) {
            CallId::Invalid => return Err(InvalidCall::InvalidId),
            CallId::Notification => None,
            CallId::Id(id) => Some(id),
        };

        Ok(Self::new(method, params.clone(), id))
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}
