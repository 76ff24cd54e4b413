//! JSON-RPC 2.0 request and response envelopes.

use rewarder_core::{CoreError, HiveApiError};
use serde::{Deserialize, Serialize};

pub const JSONRPC_VERSION: &str = "2.0";

/// Upstream nodes accept a fixed id; requests are never multiplexed.
pub const REQUEST_ID: u64 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub method: String,
    pub params: serde_json::Value,
    pub id: u64,
}

impl RpcRequest {
    pub fn new(method: &str, params: impl Serialize) -> Result<Self, CoreError> {
        Ok(Self {
            jsonrpc: JSONRPC_VERSION,
            method: method.to_string(),
            params: serde_json::to_value(params)?,
            id: REQUEST_ID,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcEnvelope {
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

impl RpcEnvelope {
    pub fn decode(method: &str, body: &str) -> Result<Self, HiveApiError> {
        serde_json::from_str(body).map_err(|e| HiveApiError::InvalidResponse {
            method: method.to_string(),
            details: e.to_string(),
        })
    }

    /// Extracts `result`, turning an RPC `error` object or a missing key into
    /// a decode failure.
    pub fn into_result(self, method: &str) -> Result<serde_json::Value, HiveApiError> {
        match (self.result, self.error) {
            (Some(result), _) => Ok(result),
            (None, Some(error)) => Err(HiveApiError::RpcError {
                method: method.to_string(),
                code: error.code,
                message: error.message,
            }),
            (None, None) => Err(HiveApiError::MissingField {
                field: "result".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request =
            RpcRequest::new("condenser_api.get_content_replies", ("alice", "hello")).unwrap();
        let encoded = serde_json::to_value(&request).unwrap();

        assert_eq!(
            encoded,
            serde_json::json!({
                "jsonrpc": "2.0",
                "method": "condenser_api.get_content_replies",
                "params": ["alice", "hello"],
                "id": 1
            })
        );
    }

    #[test]
    fn test_envelope_with_result() {
        let envelope = RpcEnvelope::decode("m", r#"{"jsonrpc":"2.0","result":[1,2],"id":1}"#)
            .unwrap();
        assert_eq!(envelope.into_result("m").unwrap(), serde_json::json!([1, 2]));
    }

    #[test]
    fn test_envelope_with_error_object() {
        let envelope = RpcEnvelope::decode(
            "m",
            r#"{"jsonrpc":"2.0","error":{"code":-32602,"message":"Invalid parameters"},"id":1}"#,
        )
        .unwrap();
        assert!(matches!(
            envelope.into_result("m"),
            Err(HiveApiError::RpcError { code: -32602, .. })
        ));
    }

    #[test]
    fn test_envelope_without_result() {
        let envelope = RpcEnvelope::decode("m", r#"{"jsonrpc":"2.0","id":1}"#).unwrap();
        assert!(matches!(
            envelope.into_result("m"),
            Err(HiveApiError::MissingField { .. })
        ));
    }

    #[test]
    fn test_malformed_body() {
        assert!(matches!(
            RpcEnvelope::decode("m", "<html>Bad Gateway</html>"),
            Err(HiveApiError::InvalidResponse { .. })
        ));
    }
}
