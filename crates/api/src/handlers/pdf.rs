//! Handlers for the `/pdf` resource.
//!
//! Handlers only extract and validate request input, call [`PdfService`],
//! and wrap the result in the response envelope.
//!
//! [`PdfService`]: crate::services::PdfService

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Multipart, OriginalUri, Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use pdfdesk_core::types::DbId;
use pdfdesk_core::validation::{GeneratePdfRequest, ListPdfParams, UploadedFile};

use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::state::AppState;

/// POST /api/pdf/generate
pub async fn generate(
    State(state): State<AppState>,
    body: Result<Json<GeneratePdfRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(request) = body?;
    let input = request.into_input()?;
    let pdf = state.pdf_service.generate(input).await?;
    Ok(ApiResponse::created("PDF generated successfully", pdf))
}

/// POST /api/pdf/upload
///
/// Expects a multipart form with a `file` part. Other parts are ignored; a
/// request that is not multipart at all counts as having no file.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<impl IntoResponse> {
    let file = match multipart {
        Ok(multipart) => read_file_part(multipart).await?,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Upload request is not multipart");
            None
        }
    };

    let pdf = state.pdf_service.upload(file).await?;
    Ok(ApiResponse::created("PDF uploaded successfully", pdf))
}

/// Collect the first `file` part that carries a file name.
async fn read_file_part(mut multipart: Multipart) -> AppResult<Option<UploadedFile>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let Some(original_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;
        return Ok(Some(UploadedFile {
            original_name,
            content_type,
            bytes: bytes.to_vec(),
        }));
    }
    Ok(None)
}

/// GET /api/pdf/list
pub async fn list(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    params: Result<Query<ListPdfParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = params?;
    let query = params.validate()?;

    let base_url = format!("{}{}", state.config.public_base_url, uri.path());
    let listing = state.pdf_service.list(&query, &base_url).await?;
    Ok(ApiResponse::paginated(
        "PDF list retrieved successfully",
        listing.items,
        listing.pagination,
    ))
}

/// DELETE /api/pdf/{id}
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = id?;
    let pdf = state.pdf_service.delete(id).await?;
    Ok(ApiResponse::ok("PDF deleted successfully", pdf))
}
