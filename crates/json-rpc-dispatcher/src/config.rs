//! Dispatcher configuration

use serde::{Deserialize, Serialize};

/// Method name prefix reserved for protocol extensions
pub const DEFAULT_RESERVED_PREFIX: &str = "rpc_";

/// What to do when a handler fails with an error code that was never registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownErrorCodePolicy {
    /// Abort the dispatch with `DispatcherError::UnknownErrorCode`
    #[default]
    Fail,
    /// Answer with -32603 Internal error and log a warning
    InternalError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Names starting with this prefix cannot be registered. Empty disables the check.
    pub reserved_prefix: String,
    pub unknown_error_code: UnknownErrorCodePolicy,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            reserved_prefix: DEFAULT_RESERVED_PREFIX.to_string(),
            unknown_error_code: UnknownErrorCodePolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = DispatcherConfig::default();
        assert_eq!(config.reserved_prefix, "rpc_");
        assert_eq!(config.unknown_error_code, UnknownErrorCodePolicy::Fail);
    }

    #[test]
    fn test_partial_deserialization() {
        let config: DispatcherConfig =
            serde_json::from_value(json!({"unknown_error_code": "internal_error"})).unwrap();
        assert_eq!(config.reserved_prefix, "rpc_");
        assert_eq!(config.unknown_error_code, UnknownErrorCodePolicy::InternalError);

        let config: DispatcherConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config, DispatcherConfig::default());
    }
}
