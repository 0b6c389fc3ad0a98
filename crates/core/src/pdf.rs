//! PDF record status and lifecycle constants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum accepted upload size (10 MiB).
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Directory (relative to the blob storage root) holding every stored PDF.
pub const PDF_UPLOAD_PATH: &str = "uploads/pdf";

/// The only extension accepted for uploads. Compared case-sensitively.
pub const PDF_EXTENSION: &str = "pdf";

/// The only declared MIME type accepted for uploads.
pub const PDF_MIME_TYPE: &str = "application/pdf";

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a PDF record.
///
/// `Created` and `Uploaded` are initial states; `Deleted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PdfStatus {
    Created,
    Uploaded,
    Deleted,
}

impl PdfStatus {
    pub const ALL: [PdfStatus; 3] = [PdfStatus::Created, PdfStatus::Uploaded, PdfStatus::Deleted];

    /// Database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            PdfStatus::Created => "CREATED",
            PdfStatus::Uploaded => "UPLOADED",
            PdfStatus::Deleted => "DELETED",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == PdfStatus::Deleted
    }
}

impl fmt::Display for PdfStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PdfStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PdfStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "The selected status is invalid. Must be one of: CREATED, UPLOADED, DELETED (got '{s}')"
                ))
            })
    }
}

/// Lets `sqlx` decode the `status` TEXT column straight into the enum.
impl TryFrom<String> for PdfStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
