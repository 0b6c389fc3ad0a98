//! Stored PDF naming convention.
//!
//! Filenames are always generated here, never taken from the client:
//! `{kind}_{YYYYMMDD_HHMMSS}_{suffix}.pdf` where `suffix` is six random
//! alphanumeric characters.

use rand::Rng;

use crate::pdf::PDF_UPLOAD_PATH;
use crate::types::Timestamp;

/// Length of the random filename suffix.
pub const SUFFIX_LENGTH: usize = 6;

/// Which lifecycle path produced the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Report,
    Upload,
}

impl FileKind {
    fn prefix(self) -> &'static str {
        match self {
            FileKind::Report => "report",
            FileKind::Upload => "upload",
        }
    }
}

/// Generate a fresh filename for `kind` at instant `now`.
pub fn generate_filename(kind: FileKind, now: Timestamp) -> String {
    let suffix: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(SUFFIX_LENGTH)
        .map(char::from)
        .collect();
    format_filename(kind, now, &suffix)
}

/// Deterministic part of [`generate_filename`].
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use pdfdesk_core::naming::{format_filename, FileKind};
///
/// let now = Utc.with_ymd_and_hms(2026, 2, 5, 10, 8, 39).unwrap();
/// assert_eq!(
///     format_filename(FileKind::Report, now, "aB3xYz"),
///     "report_20260205_100839_aB3xYz.pdf"
/// );
/// ```
pub fn format_filename(kind: FileKind, now: Timestamp, suffix: &str) -> String {
    format!(
        "{}_{}_{suffix}.pdf",
        kind.prefix(),
        now.format("%Y%m%d_%H%M%S")
    )
}

/// Relative blob path for a generated filename.
pub fn stored_path(filename: &str) -> String {
    format!("{PDF_UPLOAD_PATH}/{filename}")
}
