use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Envelope shared by every JSON endpoint: `data` on success,
/// `error` on failure.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// 机器可读的错误码，如 VALIDATION_ERROR
    pub code: String,
    /// 展示给录入人员的提示
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_envelope() {
        let body = serde_json::to_value(ApiResponse::<()>::failure("NOT_FOUND", "无此会话")).unwrap();
        assert_eq!(
            body,
            json!({
                "success": false,
                "error": { "code": "NOT_FOUND", "message": "无此会话" }
            })
        );
    }

    #[test]
    fn test_success_omits_error() {
        let body = serde_json::to_value(ApiResponse::success_with_message(3, "ok")).unwrap();
        assert_eq!(body, json!({ "success": true, "data": 3, "message": "ok" }));
    }
}
