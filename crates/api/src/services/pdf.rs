//! PDF lifecycle service.
//!
//! The only component that creates or mutates PDF records. Handlers pass in
//! validated input; every failure leaves as a [`CoreError`] that already
//! carries its error code and HTTP status.

use std::sync::Arc;

use pdfdesk_core::clock::Clock;
use pdfdesk_core::error::CoreError;
use pdfdesk_core::naming::{self, FileKind};
use pdfdesk_core::pagination::PaginationMeta;
use pdfdesk_core::pdf::{PdfStatus, PDF_UPLOAD_PATH};
use pdfdesk_core::storage::BlobStore;
use pdfdesk_core::types::{DbId, Timestamp};
use pdfdesk_core::validation::{validate_upload, ListQuery, ReportInput, UploadedFile};
use pdfdesk_db::models::pdf_file::{CreatePdfFile, PdfFile, PdfListFilter};
use pdfdesk_db::PdfStore;
use pdfdesk_render::{
    template, LogoError, LogoResolver, PageStamp, RenderError, RenderOptions, ReportRenderer,
};
use serde::Serialize;

/// Footer stamps, in top-origin points on an A4 page.
const FOOTER_Y: f32 = 820.0;
const FOOTER_LEFT_X: f32 = 50.0;
const FOOTER_RIGHT_X: f32 = 480.0;

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

/// `data` of a successful generate.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPdf {
    pub id: DbId,
    pub filename: String,
    /// Public URL of the stored file.
    pub filepath: String,
    pub status: PdfStatus,
    pub created_at: Timestamp,
}

/// `data` of a successful upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadedPdf {
    pub id: DbId,
    pub original_name: String,
    pub filename: String,
    /// Public URL of the stored file.
    pub filepath: String,
    pub size: i64,
    pub status: PdfStatus,
    pub created_at: Timestamp,
}

/// One row of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct PdfListItem {
    pub id: DbId,
    pub filename: String,
    pub original_name: Option<String>,
    pub size: Option<i64>,
    pub status: PdfStatus,
    pub created_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl From<PdfFile> for PdfListItem {
    fn from(record: PdfFile) -> Self {
        Self {
            id: record.id,
            filename: record.filename,
            original_name: record.original_filename,
            size: record.size,
            status: record.status,
            created_at: record.created_at,
            deleted_at: record.deleted_at,
        }
    }
}

/// A page of records with its pagination metadata.
#[derive(Debug, Clone)]
pub struct PdfListing {
    pub items: Vec<PdfListItem>,
    pub pagination: PaginationMeta,
}

/// `data` of a successful delete.
#[derive(Debug, Clone, Serialize)]
pub struct DeletedPdf {
    pub id: DbId,
    pub filename: String,
    pub status: PdfStatus,
    pub deleted_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Internal step errors
// ---------------------------------------------------------------------------

/// Lower-layer failures inside generate and upload, before they are wrapped
/// into the operation's [`CoreError`] variant.
#[derive(Debug, thiserror::Error)]
enum StepError {
    #[error(transparent)]
    Logo(#[from] LogoError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Rendering task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

pub struct PdfService {
    store: Arc<dyn PdfStore>,
    blobs: Arc<dyn BlobStore>,
    renderer: Arc<dyn ReportRenderer>,
    logos: LogoResolver,
    clock: Arc<dyn Clock>,
    public_base_url: String,
}

impl PdfService {
    pub fn new(
        store: Arc<dyn PdfStore>,
        blobs: Arc<dyn BlobStore>,
        renderer: Arc<dyn ReportRenderer>,
        logos: LogoResolver,
        clock: Arc<dyn Clock>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            blobs,
            renderer,
            logos,
            clock,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Public URL for a blob path, served by the `/storage` route.
    pub fn public_url(&self, filepath: &str) -> String {
        format!("{}/storage/{filepath}", self.public_base_url)
    }

    /// Render a report and record it as `CREATED`.
    pub async fn generate(&self, input: ReportInput) -> Result<GeneratedPdf, CoreError> {
        match self.try_generate(&input).await {
            Ok(pdf) => {
                tracing::info!(pdf_id = pdf.id, filename = %pdf.filename, "PDF generated");
                Ok(pdf)
            }
            Err(StepError::Logo(e)) => {
                tracing::warn!(error = %e, "Logo could not be embedded");
                Err(CoreError::LogoLoad(format!("Unable to load logo image: {e}")))
            }
            Err(e) => {
                tracing::error!(error = %e, title = %input.title, "PDF generation failed");
                Err(CoreError::GenerationFailed(e.to_string()))
            }
        }
    }

    async fn try_generate(&self, input: &ReportInput) -> Result<GeneratedPdf, StepError> {
        let logo = self.logos.resolve(input.logo_url.as_deref()).await?;
        let now = self.clock.now();
        let html = template::report_html(input, &logo, now);

        let renderer = Arc::clone(&self.renderer);
        let generated = format!("Generated: {}", now.format("%d/%m/%Y %H:%M"));
        let bytes = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, RenderError> {
            let mut doc = renderer.render(&html, &RenderOptions::default())?;
            doc.stamp(&PageStamp::new(FOOTER_LEFT_X, FOOTER_Y, generated));
            doc.stamp(&PageStamp::new(
                FOOTER_RIGHT_X,
                FOOTER_Y,
                "Page {page} of {total}",
            ));
            Ok(doc.to_bytes())
        })
        .await??;

        let filename = naming::generate_filename(FileKind::Report, now);
        let (filepath, size) = self.store_blob(&filename, &bytes).await?;

        let record = self
            .store
            .create(&CreatePdfFile {
                filename,
                original_filename: Some(format!("{}.pdf", input.title)),
                filepath,
                size: Some(size),
                status: PdfStatus::Created,
            })
            .await?;

        Ok(GeneratedPdf {
            id: record.id,
            filepath: self.public_url(&record.filepath),
            filename: record.filename,
            status: record.status,
            created_at: record.created_at,
        })
    }

    /// Validate an uploaded file, store it and record it as `UPLOADED`.
    pub async fn upload(&self, file: Option<UploadedFile>) -> Result<UploadedPdf, CoreError> {
        let file = validate_upload(file)?;
        let original_name = file.original_name.clone();

        match self.try_upload(file).await {
            Ok(pdf) => {
                tracing::info!(
                    pdf_id = pdf.id,
                    filename = %pdf.filename,
                    size = pdf.size,
                    "PDF uploaded"
                );
                Ok(pdf)
            }
            Err(e) => {
                tracing::error!(error = %e, original_name = %original_name, "PDF upload failed");
                Err(CoreError::UploadFailed(e.to_string()))
            }
        }
    }

    async fn try_upload(&self, file: UploadedFile) -> Result<UploadedPdf, StepError> {
        let now = self.clock.now();
        let filename = naming::generate_filename(FileKind::Upload, now);
        let (filepath, size) = self.store_blob(&filename, &file.bytes).await?;

        let record = self
            .store
            .create(&CreatePdfFile {
                filename,
                original_filename: Some(file.original_name.clone()),
                filepath,
                size: Some(size),
                status: PdfStatus::Uploaded,
            })
            .await?;

        Ok(UploadedPdf {
            id: record.id,
            original_name: file.original_name,
            filepath: self.public_url(&record.filepath),
            filename: record.filename,
            size,
            status: record.status,
            created_at: record.created_at,
        })
    }

    /// Write bytes under the upload directory and read back their size.
    async fn store_blob(&self, filename: &str, bytes: &[u8]) -> Result<(String, i64), StepError> {
        self.blobs.ensure_dir(PDF_UPLOAD_PATH).await?;
        let filepath = naming::stored_path(filename);
        self.blobs.put(&filepath, bytes).await?;
        let size = self.blobs.size(&filepath).await?;
        let size = i64::try_from(size).map_err(|_| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, "blob size overflows i64")
        })?;
        Ok((filepath, size))
    }

    /// One page of records, newest first, soft-deleted rows included.
    ///
    /// `base_url` is the absolute URL of the list endpoint, used for the
    /// next/previous links.
    pub async fn list(&self, query: &ListQuery, base_url: &str) -> Result<PdfListing, CoreError> {
        let filter = PdfListFilter {
            status: query.status,
            include_deleted: true,
            limit: i64::from(query.limit),
            offset: query.offset(),
        };

        let page = self.store.list(&filter).await.map_err(|e| {
            tracing::error!(error = %e, "Listing PDF files failed");
            CoreError::ListFailed(e.to_string())
        })?;

        Ok(PdfListing {
            items: page.items.into_iter().map(PdfListItem::from).collect(),
            pagination: PaginationMeta::build(query, page.total, base_url),
        })
    }

    /// Soft-delete a record: `CREATED`/`UPLOADED` to `DELETED`, exactly once.
    ///
    /// The stored file is left in place.
    pub async fn delete(&self, id: DbId) -> Result<DeletedPdf, CoreError> {
        let record = self
            .store
            .find_with_deleted(id)
            .await
            .map_err(|e| delete_failed(id, e))?
            .ok_or(CoreError::NotFound { id })?;

        if record.is_deleted() {
            return Err(CoreError::AlreadyDeleted { id });
        }

        // A concurrent delete can win between the read and the guarded update.
        let deleted = self
            .store
            .mark_deleted(id)
            .await
            .map_err(|e| delete_failed(id, e))?
            .ok_or(CoreError::AlreadyDeleted { id })?;

        tracing::info!(pdf_id = id, filename = %deleted.filename, "PDF soft-deleted");
        Ok(DeletedPdf {
            id: deleted.id,
            filename: deleted.filename,
            status: deleted.status,
            deleted_at: deleted.deleted_at,
        })
    }
}

fn delete_failed(id: DbId, err: sqlx::Error) -> CoreError {
    tracing::error!(pdf_id = id, error = %err, "Deleting PDF file failed");
    CoreError::DeleteFailed(err.to_string())
}
