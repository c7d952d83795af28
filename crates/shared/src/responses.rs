//! Replies to intents.

use serde::{Deserialize, Serialize};

/// A failed intent: stable machine-readable code plus a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Result of one intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IntentResponse {
    /// Operation succeeded
    Success {
        /// Optional data payload (varies by intent)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<serde_json::Value>,
    },
    /// Operation failed and wrote nothing
    Error(ErrorBody),
}

impl IntentResponse {
    /// Create a success response with data. A payload that cannot be
    /// encoded becomes a `SERIALIZATION_ERROR` reply.
    pub fn success<T: Serialize>(data: T) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => Self::Success { data: Some(value) },
            Err(e) => Self::error("SERIALIZATION_ERROR", e.to_string()),
        }
    }

    /// Create a success response without data
    pub fn success_empty() -> Self {
        Self::Success { data: None }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error(ErrorBody::new(code, message))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The error code, if this is an error.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Error(body) => Some(&body.code),
            Self::Success { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_serializes_flat_with_status_tag() {
        let json = serde_json::to_value(IntentResponse::error("INVENTORY_FULL", "Inventory is full"))
            .unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "INVENTORY_FULL");
        assert_eq!(json["message"], "Inventory is full");
    }

    #[test]
    fn empty_success_omits_data() {
        let json = serde_json::to_string(&IntentResponse::success_empty()).unwrap();
        assert_eq!(json, r#"{"status":"success"}"#);
    }

    #[test]
    fn unencodable_payload_is_an_error_not_null_data() {
        use std::collections::BTreeMap;

        // JSON object keys must be strings.
        let payload: BTreeMap<(u8, u8), u8> = BTreeMap::from([((1, 2), 3)]);
        let response = IntentResponse::success(payload);

        assert!(!response.is_success());
        assert_eq!(response.error_code(), Some("SERIALIZATION_ERROR"));
    }

    #[test]
    fn success_carries_the_encoded_payload() {
        let response = IntentResponse::success(vec![1, 2]);
        assert_eq!(
            response,
            IntentResponse::Success {
                data: Some(serde_json::json!([1, 2]))
            }
        );
    }
}
