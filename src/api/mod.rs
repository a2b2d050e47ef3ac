/// API routes and handlers
pub mod comments;
pub mod resources;
pub mod uploads;

use crate::context::AppContext;
use axum::Router;
use serde::{Deserialize, Serialize};

/// Uniform response envelope for every JSON endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Successful response carrying a payload
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Successful response carrying a payload and a human message
    pub fn data_with_message(data: T, message: &str) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.to_string()),
        }
    }
}

impl ApiEnvelope<()> {
    /// Successful response with only a message
    pub fn message(message: &str) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.to_string()),
        }
    }

    /// Failed response with a human-readable reason
    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.to_string()),
        }
    }
}

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .merge(resources::routes())
        .merge(comments::routes())
        .merge(uploads::routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_omits_absent_fields() {
        let value = serde_json::to_value(ApiEnvelope::data(vec![1, 2, 3])).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"], serde_json::json!([1, 2, 3]));
        assert!(value.get("message").is_none());

        let value = serde_json::to_value(ApiEnvelope::message("删除成功")).unwrap();
        assert_eq!(value["success"], true);
        assert!(value.get("data").is_none());
        assert_eq!(value["message"], "删除成功");
    }

    #[test]
    fn test_failure_envelope_shape() {
        let value = serde_json::to_value(ApiEnvelope::failure("资源不存在")).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["message"], "资源不存在");
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_envelope_round_trips() {
        let raw = r#"{"success":true,"data":{"id":"abc"}}"#;
        let envelope: ApiEnvelope<serde_json::Value> = serde_json::from_str(raw).unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.data.unwrap()["id"], "abc");
        assert!(envelope.message.is_none());
    }
}
