//! In-process record store.
//!
//! Mirrors the PostgreSQL semantics closely enough for development runs and
//! tests: sequential ids, store-managed timestamps, newest-first ordering
//! with id as the tie-breaker, and a guarded delete.

use async_trait::async_trait;
use chrono::Utc;
use pdfdesk_core::pdf::PdfStatus;
use pdfdesk_core::types::DbId;
use tokio::sync::Mutex;

use crate::models::pdf_file::{
    CreatePdfFile, ListPage, PdfFile, PdfListFilter, FILENAME_MAX_CHARS, FILEPATH_MAX_CHARS,
};
use crate::store::PdfStore;

#[derive(Default)]
struct Inner {
    next_id: DbId,
    rows: Vec<PdfFile>,
}

#[derive(Default)]
pub struct InMemoryPdfStore {
    inner: Mutex<Inner>,
}

impl InMemoryPdfStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows, including soft-deleted ones.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PdfStore for InMemoryPdfStore {
    async fn create(&self, input: &CreatePdfFile) -> Result<PdfFile, sqlx::Error> {
        check_constraints(input)?;

        let mut inner = self.inner.lock().await;
        if inner.rows.iter().any(|r| r.filename == input.filename) {
            return Err(sqlx::Error::Protocol(format!(
                "duplicate filename '{}'",
                input.filename
            )));
        }

        inner.next_id += 1;
        let now = Utc::now();
        let record = PdfFile {
            id: inner.next_id,
            filename: input.filename.clone(),
            original_filename: input.original_filename.clone(),
            filepath: input.filepath.clone(),
            size: input.size,
            status: input.status,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        inner.rows.push(record.clone());
        Ok(record)
    }

    async fn find_with_deleted(&self, id: DbId) -> Result<Option<PdfFile>, sqlx::Error> {
        let inner = self.inner.lock().await;
        Ok(inner.rows.iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self, filter: &PdfListFilter) -> Result<ListPage, sqlx::Error> {
        let inner = self.inner.lock().await;
        let mut matching: Vec<&PdfFile> = inner
            .rows
            .iter()
            .filter(|r| filter.status.map_or(true, |s| r.status == s))
            .filter(|r| filter.include_deleted || r.deleted_at.is_none())
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(filter.offset).unwrap_or(0))
            .take(usize::try_from(filter.limit).unwrap_or(0))
            .cloned()
            .collect();
        Ok(ListPage { items, total })
    }

    async fn mark_deleted(&self, id: DbId) -> Result<Option<PdfFile>, sqlx::Error> {
        let mut inner = self.inner.lock().await;
        let Some(row) = inner
            .rows
            .iter_mut()
            .find(|r| r.id == id && r.status != PdfStatus::Deleted && r.deleted_at.is_none())
        else {
            return Ok(None);
        };

        let now = Utc::now();
        row.status = PdfStatus::Deleted;
        row.deleted_at = Some(now);
        row.updated_at = now;
        Ok(Some(row.clone()))
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}

/// The CHECK constraints of the `pdf_files` table.
fn check_constraints(input: &CreatePdfFile) -> Result<(), sqlx::Error> {
    let violation = if input.filename.chars().count() > FILENAME_MAX_CHARS {
        Some("ck_pdf_files_filename_len")
    } else if input.filepath.chars().count() > FILEPATH_MAX_CHARS {
        Some("ck_pdf_files_filepath_len")
    } else if input.size.is_some_and(|s| s < 0) {
        Some("ck_pdf_files_size_non_negative")
    } else {
        None
    };

    match violation {
        Some(constraint) => Err(sqlx::Error::Protocol(format!(
            "check constraint '{constraint}' violated"
        ))),
        None => Ok(()),
    }
}
