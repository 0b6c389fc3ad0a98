use axum::extract::multipart::MultipartError;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pdfdesk_core::error::CoreError;
use pdfdesk_core::pdf::MAX_FILE_SIZE_BYTES;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds a variant for requests
/// axum could not extract. Implements [`IntoResponse`] to produce the
/// standard error envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `pdfdesk_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The JSON body, query string or path could not be parsed.
    #[error("{0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::Core(CoreError::FileTooLarge {
                size: None,
                max: MAX_FILE_SIZE_BYTES,
            });
        }
        AppError::Core(CoreError::UploadFailed(err.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(CoreError::Internal(msg)) => {
                tracing::error!(error = %msg, "Internal core error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Core(core) => (
                StatusCode::from_u16(core.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                core.error_code(),
                core.to_string(),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        };

        if status.is_client_error() {
            tracing::debug!(status = status.as_u16(), code, %message, "Request rejected");
        }

        let body = json!({
            "success": false,
            "status_code": status.as_u16(),
            "message": message,
            "error_code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
