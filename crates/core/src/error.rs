use crate::types::DbId;

/// Domain error taxonomy for the PDF lifecycle.
///
/// Every variant carries a stable `error_code` and HTTP status, set where the
/// failure is detected rather than inferred from the message afterwards.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Malformed generate or list input.
    #[error("{0}")]
    Validation(String),

    #[error("No file uploaded")]
    NoFile,

    #[error("Only PDF files are allowed")]
    InvalidExtension,

    #[error("Invalid file type. Must be application/pdf")]
    InvalidMimeType,

    /// `size` is unknown when the body was cut off at the transport limit.
    #[error("File size exceeds maximum limit (10MB)")]
    FileTooLarge { size: Option<u64>, max: u64 },

    #[error("PDF file not found")]
    NotFound { id: DbId },

    #[error("PDF file is already deleted")]
    AlreadyDeleted { id: DbId },

    /// Any failure while rendering or storing a generated report.
    #[error("Failed to generate PDF: {0}")]
    GenerationFailed(String),

    /// Storage or store failure after an upload passed validation.
    #[error("Failed to upload PDF: {0}")]
    UploadFailed(String),

    /// The fetched logo could not be identified as an image.
    #[error("Failed to generate PDF: {0}")]
    LogoLoad(String),

    #[error("Failed to list PDF files: {0}")]
    ListFailed(String),

    #[error("Failed to delete PDF file: {0}")]
    DeleteFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Stable machine-readable code for the error envelope.
    pub fn error_code(&self) -> &'static str {
        match self {
            CoreError::Validation(_) => "VALIDATION_ERROR",
            CoreError::NoFile => "NO_FILE",
            CoreError::InvalidExtension => "INVALID_EXTENSION",
            CoreError::InvalidMimeType => "INVALID_MIME_TYPE",
            CoreError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            CoreError::NotFound { .. } => "NOT_FOUND",
            CoreError::AlreadyDeleted { .. } => "ALREADY_DELETED",
            CoreError::GenerationFailed(_) | CoreError::LogoLoad(_) => "GENERATION_FAILED",
            CoreError::UploadFailed(_) => "UPLOAD_FAILED",
            CoreError::ListFailed(_) => "LIST_FAILED",
            CoreError::DeleteFailed(_) => "DELETE_FAILED",
            CoreError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status the error maps to at the API boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            CoreError::FileTooLarge { .. } => 413,
            CoreError::InvalidExtension | CoreError::InvalidMimeType => 422,
            CoreError::NotFound { .. } => 404,
            CoreError::AlreadyDeleted { .. } => 409,
            CoreError::Internal(_) => 500,
            CoreError::Validation(_)
            | CoreError::NoFile
            | CoreError::GenerationFailed(_)
            | CoreError::UploadFailed(_)
            | CoreError::LogoLoad(_)
            | CoreError::ListFailed(_)
            | CoreError::DeleteFailed(_) => 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_errors_follow_code_table() {
        let cases = [
            (CoreError::FileTooLarge { size: Some(11), max: 10 }, "FILE_TOO_LARGE", 413),
            (CoreError::InvalidExtension, "INVALID_EXTENSION", 422),
            (CoreError::InvalidMimeType, "INVALID_MIME_TYPE", 422),
            (CoreError::NoFile, "NO_FILE", 400),
            (CoreError::UploadFailed("disk full".into()), "UPLOAD_FAILED", 400),
        ];
        for (err, code, status) in cases {
            assert_eq!(err.error_code(), code);
            assert_eq!(err.status_code(), status);
        }
    }

    #[test]
    fn delete_errors_map_to_404_and_409() {
        assert_eq!(CoreError::NotFound { id: 1 }.status_code(), 404);
        assert_eq!(CoreError::AlreadyDeleted { id: 1 }.status_code(), 409);
        assert!(CoreError::NotFound { id: 999 }
            .to_string()
            .contains("not found"));
    }

    #[test]
    fn logo_failure_surfaces_as_generation_failure() {
        let err = CoreError::LogoLoad("unrecognized format".into());
        assert_eq!(err.error_code(), "GENERATION_FAILED");
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "Failed to generate PDF: unrecognized format");
    }

    #[test]
    fn wrapped_failures_carry_cause() {
        let err = CoreError::GenerationFailed("disk full".into());
        assert_eq!(err.to_string(), "Failed to generate PDF: disk full");
    }
}
