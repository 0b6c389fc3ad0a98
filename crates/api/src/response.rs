//! Shared response envelope for API handlers.
//!
//! Every success response is
//! `{ "success": true, "message": ..., "status_code": ..., "data": ... }`,
//! with a `pagination` object on list responses. Errors use the envelope
//! produced by [`AppError`](crate::error::AppError).

use axum::http::StatusCode;
use axum::Json;
use pdfdesk_core::pagination::PaginationMeta;
use serde::Serialize;

/// Standard success envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: &'static str,
    pub status_code: u16,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
}

impl<T: Serialize> ApiResponse<T> {
    fn with_status(status: StatusCode, message: &'static str, data: T) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                success: true,
                message,
                status_code: status.as_u16(),
                data,
                pagination: None,
            }),
        )
    }

    /// 200 envelope.
    pub fn ok(message: &'static str, data: T) -> (StatusCode, Json<Self>) {
        Self::with_status(StatusCode::OK, message, data)
    }

    /// 201 envelope.
    pub fn created(message: &'static str, data: T) -> (StatusCode, Json<Self>) {
        Self::with_status(StatusCode::CREATED, message, data)
    }

    /// 200 envelope with pagination metadata.
    pub fn paginated(
        message: &'static str,
        data: T,
        pagination: PaginationMeta,
    ) -> (StatusCode, Json<Self>) {
        let (status, Json(mut body)) = Self::ok(message, data);
        body.pagination = Some(pagination);
        (status, Json(body))
    }
}
