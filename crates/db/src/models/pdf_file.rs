//! PDF file entity model and DTOs.

use pdfdesk_core::pdf::PdfStatus;
use pdfdesk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Longest `filename` the schema accepts, in characters.
pub const FILENAME_MAX_CHARS: usize = 255;

/// Longest `filepath` the schema accepts, in characters.
pub const FILEPATH_MAX_CHARS: usize = 500;

/// A row from the `pdf_files` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct PdfFile {
    pub id: DbId,
    pub filename: String,
    pub original_filename: Option<String>,
    pub filepath: String,
    pub size: Option<i64>,
    #[sqlx(try_from = "String")]
    pub status: PdfStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl PdfFile {
    /// Whether the record has reached the terminal state, by either marker.
    pub fn is_deleted(&self) -> bool {
        self.status.is_terminal() || self.deleted_at.is_some()
    }
}

/// DTO for inserting a new PDF record.
#[derive(Debug, Clone)]
pub struct CreatePdfFile {
    pub filename: String,
    pub original_filename: Option<String>,
    pub filepath: String,
    pub size: Option<i64>,
    pub status: PdfStatus,
}

/// Filters and window for a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfListFilter {
    pub status: Option<PdfStatus>,
    /// Whether soft-deleted rows are part of the result.
    pub include_deleted: bool,
    pub limit: i64,
    pub offset: i64,
}

/// One page of records plus the filtered total.
#[derive(Debug, Clone)]
pub struct ListPage {
    pub items: Vec<PdfFile>,
    pub total: i64,
}
