pub mod health;
pub mod pdf;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /pdf/generate      generate report (POST)
/// /pdf/upload        upload file (POST)
/// /pdf/list          paginated listing (GET)
/// /pdf/{id}          soft delete (DELETE)
/// ```
pub fn api_routes(upload_body_limit: usize) -> Router<AppState> {
    Router::new().nest("/pdf", pdf::router(upload_body_limit))
}
