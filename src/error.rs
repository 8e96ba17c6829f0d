use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ApiResponse;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Reference data error: {0}")]
    DataLoadError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::SessionError(_) => "SESSION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::DataLoadError(_) => "DATA_LOAD_ERROR",
            AppError::CsvError(_) => "CSV_ERROR",
            _ => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            AppError::ValidationError(_) => actix_web::http::StatusCode::BAD_REQUEST,
            AppError::SessionError(_) => actix_web::http::StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => actix_web::http::StatusCode::NOT_FOUND,
            _ => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                msg.clone()
            }
            AppError::SessionError(msg) => {
                log::warn!("Session error: {msg}");
                msg.clone()
            }
            AppError::NotFound(msg) => msg.clone(),
            AppError::DataLoadError(msg) => {
                log::error!("Reference data error: {msg}");
                "Reference data error".to_string()
            }
            AppError::CsvError(err) => {
                log::error!("CSV error: {err}");
                "CSV export failed".to_string()
            }
            _ => {
                log::error!("Internal error: {self}");
                "Internal server error".to_string()
            }
        };

        HttpResponse::build(self.status_code())
            .json(ApiResponse::<()>::failure(self.error_code(), message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::ValidationError("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::SessionError("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InternalError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::ValidationError("x".into()).error_code(), "VALIDATION_ERROR");
        assert_eq!(AppError::ConfigError("x".into()).error_code(), "INTERNAL_ERROR");
        assert_eq!(AppError::DataLoadError("x".into()).error_code(), "DATA_LOAD_ERROR");
    }

    #[actix_web::test]
    async fn test_error_response_body() {
        let response = AppError::ValidationError("价格必须为数字".into()).error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let body: ApiResponse<()> = serde_json::from_slice(&bytes).unwrap();
        assert!(!body.success);
        assert!(body.data.is_none());
        let error = body.error.unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert_eq!(error.message, "价格必须为数字");
    }

    #[actix_web::test]
    async fn test_internal_error_message_is_generic() {
        let response = AppError::InternalError("lock poisoned".into()).error_response();
        let bytes = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let body: ApiResponse<()> = serde_json::from_slice(&bytes).unwrap();
        let error = body.error.unwrap();
        assert_eq!(error.code, "INTERNAL_ERROR");
        assert_eq!(error.message, "Internal server error");
    }
}
