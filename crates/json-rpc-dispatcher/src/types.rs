use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// Identifier of a call that expects a response.
///
/// Only truthy ids are represented: a call whose `id` is absent, `null`, `false`, `0` or
/// `""` is a notification and carries no `RequestId` at all. Numbers keep their JSON
/// form, so `1.5`, `1e3` and ids past `i64::MAX` are echoed back as they came in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    String(String),
    Number(Number),
    Bool(bool),
}

/// Outcome of reading the `id` member of a raw call object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallId {
    /// Absent or falsy id: the call is a notification.
    Notification,
    /// Truthy scalar id.
    Id(RequestId),
    /// An array or object id.
    Invalid,
}

impl CallId {
    pub fn from_member(id: Option<&Value>) -> Self {
        match id {
            None | Some(Value::Null) | Some(Value::Bool(false)) => CallId::Notification,
            Some(Value::Bool(true)) => CallId::Id(RequestId::Bool(true)),
            Some(Value::String(s)) if s.is_empty() => CallId::Notification,
            Some(Value::String(s)) => CallId::Id(RequestId::String(s.clone())),
            // 0 and 0.0 alike
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => CallId::Notification,
            Some(Value::Number(n)) => CallId::Id(RequestId::Number(n.clone())),
            Some(Value::Array(_)) | Some(Value::Object(_)) => CallId::Invalid,
        }
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::String(s) => write!(f, "{}", s),
            RequestId::Number(n) => write!(f, "{}", n),
            RequestId::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        RequestId::Number(n.into())
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId::String(s.to_string())
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        RequestId::String(s)
    }
}

/// JSON-RPC version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonRpcVersion {
    #[default]
    V2_0,
}

impl JsonRpcVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonRpcVersion::V2_0 => crate::JSONRPC_VERSION,
        }
    }
}

impl fmt::Display for JsonRpcVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for JsonRpcVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for JsonRpcVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "2.0" => Ok(JsonRpcVersion::V2_0),
            _ => Err(serde::de::Error::custom(format!(
                "Invalid JSON-RPC version: {}",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_id_serialization() {
        assert_eq!(serde_json::to_string(&RequestId::from("test")).unwrap(), r#""test""#);
        assert_eq!(serde_json::to_string(&RequestId::from(42)).unwrap(), "42");
        assert_eq!(
            serde_json::from_str::<RequestId>("18446744073709551615").unwrap(),
            RequestId::Number(u64::MAX.into())
        );
    }

    #[test]
    fn test_falsy_ids_are_notifications() {
        for id in [json!(null), json!(false), json!(0), json!(0.0), json!(-0.0), json!("")] {
            assert_eq!(CallId::from_member(Some(&id)), CallId::Notification, "{id}");
        }
        assert_eq!(CallId::from_member(None), CallId::Notification);
    }

    #[test]
    fn test_truthy_ids() {
        assert_eq!(CallId::from_member(Some(&json!(777))), CallId::Id(RequestId::from(777)));
        assert_eq!(CallId::from_member(Some(&json!(-1))), CallId::Id(RequestId::from(-1)));
        assert_eq!(CallId::from_member(Some(&json!("abc"))), CallId::Id(RequestId::from("abc")));
        assert_eq!(CallId::from_member(Some(&json!(true))), CallId::Id(RequestId::Bool(true)));
    }

    #[test]
    fn test_numeric_ids_keep_their_form() {
        let big: Value = serde_json::from_str("18446744073709551615").unwrap();
        let exponent: Value = serde_json::from_str("1e3").unwrap();
        for id in [json!(1.5), exponent, big] {
            let CallId::Id(request_id) = CallId::from_member(Some(&id)) else {
                panic!("{id} should be a request id");
            };
            assert_eq!(serde_json::to_value(&request_id).unwrap(), id);
        }
    }

    #[test]
    fn test_structured_ids_are_invalid() {
        for id in [json!([1]), json!({"a": 1})] {
            assert_eq!(CallId::from_member(Some(&id)), CallId::Invalid, "{id}");
        }
    }

    #[test]
    fn test_json_rpc_version() {
        let version = JsonRpcVersion::V2_0;
        assert_eq!(version.as_str(), "2.0");
        assert_eq!(serde_json::to_string(&version).unwrap(), r#""2.0""#);
        assert!(serde_json::from_str::<JsonRpcVersion>(r#""1.0""#).is_err());
    }
}
