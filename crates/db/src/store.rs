//! The record store seam used by the lifecycle service.

use async_trait::async_trait;
use pdfdesk_core::types::DbId;

use crate::models::pdf_file::CreatePdfFile;
use crate::repositories::PdfFileRepo;
use crate::DbPool;

pub use crate::models::pdf_file::{ListPage, PdfFile, PdfListFilter};

/// Persistence operations for PDF records.
///
/// Soft-delete visibility is always explicit: `find_with_deleted` sees
/// tombstoned rows and `list` takes an `include_deleted` flag.
#[async_trait]
pub trait PdfStore: Send + Sync {
    async fn create(&self, input: &CreatePdfFile) -> Result<PdfFile, sqlx::Error>;

    async fn find_with_deleted(&self, id: DbId) -> Result<Option<PdfFile>, sqlx::Error>;

    async fn list(&self, filter: &PdfListFilter) -> Result<ListPage, sqlx::Error>;

    /// Atomically set `status = DELETED` and `deleted_at`.
    ///
    /// Returns `None` when the row is missing or already deleted.
    async fn mark_deleted(&self, id: DbId) -> Result<Option<PdfFile>, sqlx::Error>;

    async fn health_check(&self) -> Result<(), sqlx::Error>;
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgPdfStore {
    pool: DbPool,
}

impl PgPdfStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PdfStore for PgPdfStore {
    async fn create(&self, input: &CreatePdfFile) -> Result<PdfFile, sqlx::Error> {
        PdfFileRepo::create(&self.pool, input).await
    }

    async fn find_with_deleted(&self, id: DbId) -> Result<Option<PdfFile>, sqlx::Error> {
        PdfFileRepo::find_with_deleted(&self.pool, id).await
    }

    async fn list(&self, filter: &PdfListFilter) -> Result<ListPage, sqlx::Error> {
        PdfFileRepo::list(&self.pool, filter).await
    }

    async fn mark_deleted(&self, id: DbId) -> Result<Option<PdfFile>, sqlx::Error> {
        PdfFileRepo::mark_deleted(&self.pool, id).await
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }
}
