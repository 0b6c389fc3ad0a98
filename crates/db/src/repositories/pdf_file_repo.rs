//! Repository for the `pdf_files` table.

use pdfdesk_core::pdf::PdfStatus;
use pdfdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::pdf_file::{CreatePdfFile, ListPage, PdfFile, PdfListFilter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, filename, original_filename, filepath, size, status, \
    created_at, updated_at, deleted_at";

/// Shared WHERE clause for listing: `$1` is the optional status, `$2` the
/// include-deleted flag.
const LIST_FILTER: &str = "($1::TEXT IS NULL OR status = $1) AND ($2 OR deleted_at IS NULL)";

/// Provides persistence operations for PDF records.
pub struct PdfFileRepo;

impl PdfFileRepo {
    /// Insert a new PDF record.
    pub async fn create(pool: &PgPool, input: &CreatePdfFile) -> Result<PdfFile, sqlx::Error> {
        let query = format!(
            "INSERT INTO pdf_files (filename, original_filename, filepath, size, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PdfFile>(&query)
            .bind(&input.filename)
            .bind(&input.original_filename)
            .bind(&input.filepath)
            .bind(input.size)
            .bind(input.status.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a record by ID, including soft-deleted rows.
    pub async fn find_with_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PdfFile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pdf_files WHERE id = $1");
        sqlx::query_as::<_, PdfFile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Count and fetch one page, newest first.
    pub async fn list(pool: &PgPool, filter: &PdfListFilter) -> Result<ListPage, sqlx::Error> {
        let status = filter.status.map(PdfStatus::as_str);

        let count_query = format!("SELECT COUNT(*) FROM pdf_files WHERE {LIST_FILTER}");
        let (total,): (i64,) = sqlx::query_as(&count_query)
            .bind(status)
            .bind(filter.include_deleted)
            .fetch_one(pool)
            .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM pdf_files
             WHERE {LIST_FILTER}
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        let items = sqlx::query_as::<_, PdfFile>(&query)
            .bind(status)
            .bind(filter.include_deleted)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await?;

        Ok(ListPage { items, total })
    }

    /// Flip the status to `DELETED` and stamp `deleted_at` in one transaction.
    ///
    /// The status update only matches a live row, so a concurrent delete that
    /// loses the row lock sees zero affected rows and gets `None`.
    pub async fn mark_deleted(pool: &PgPool, id: DbId) -> Result<Option<PdfFile>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let flipped = sqlx::query(
            "UPDATE pdf_files SET status = $2 \
             WHERE id = $1 AND status <> $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(PdfStatus::Deleted.as_str())
        .execute(&mut *tx)
        .await?;

        if flipped.rows_affected() == 0 {
            tracing::debug!(pdf_id = id, "No live row to mark deleted");
            tx.rollback().await?;
            return Ok(None);
        }

        let query = format!(
            "UPDATE pdf_files SET deleted_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let record = sqlx::query_as::<_, PdfFile>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(record))
    }
}
