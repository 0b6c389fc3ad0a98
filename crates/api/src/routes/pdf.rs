//! Route definitions for the `/pdf` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::pdf;
use crate::state::AppState;

/// Routes mounted at `/pdf`.
///
/// ```text
/// POST   /generate      -> generate
/// POST   /upload        -> upload   (body limit raised to `upload_body_limit`)
/// GET    /list          -> list     (?status, page, limit)
/// DELETE /{id}          -> delete
/// ```
///
/// The upload limit sits above the 10 MB file cap so oversized files reach
/// validation and are rejected with `FILE_TOO_LARGE`.
pub fn router(upload_body_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/generate", post(pdf::generate))
        .route(
            "/upload",
            post(pdf::upload).layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .route("/list", get(pdf::list))
        .route("/{id}", delete(pdf::delete))
}
