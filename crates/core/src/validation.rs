//! Request validation for the generate, upload and list operations.
//!
//! Each validator turns loosely-typed request input into a strongly-typed
//! value the lifecycle service can trust, or a [`CoreError`] that already
//! knows its error code and HTTP status.

use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::error::CoreError;
use crate::pdf::{PdfStatus, MAX_FILE_SIZE_BYTES, PDF_EXTENSION, PDF_MIME_TYPE};

/// Default page for list requests.
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size for list requests.
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest page size a client may ask for.
pub const MAX_LIMIT: u32 = 100;

// ---------------------------------------------------------------------------
// Generate
// ---------------------------------------------------------------------------

/// Raw `POST /pdf/generate` body.
///
/// Every field is optional at the serde level so that a missing field is
/// reported as a validation failure rather than a deserialization error.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct GeneratePdfRequest {
    #[validate(required, length(max = 255))]
    pub title: Option<String>,
    #[validate(required, length(max = 255))]
    pub institution_name: Option<String>,
    #[validate(required, length(max = 500))]
    pub address: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(url, length(max = 500))]
    pub logo_url: Option<String>,
    #[validate(required)]
    pub content: Option<String>,
}

/// Validated report input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportInput {
    pub title: String,
    pub institution_name: String,
    pub address: String,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
    pub content: String,
}

impl GeneratePdfRequest {
    /// Trim every string and treat blank strings as absent.
    fn normalized(self) -> Self {
        Self {
            title: blank_to_none(self.title),
            institution_name: blank_to_none(self.institution_name),
            address: blank_to_none(self.address),
            phone: blank_to_none(self.phone),
            logo_url: blank_to_none(self.logo_url),
            content: blank_to_none(self.content),
        }
    }

    /// Validate and convert into a [`ReportInput`].
    pub fn into_input(self) -> Result<ReportInput, CoreError> {
        let req = self.normalized();
        req.validate().map_err(validation_error)?;

        // `required` has been checked above, so these are all `Some`.
        match (req.title, req.institution_name, req.address, req.content) {
            (Some(title), Some(institution_name), Some(address), Some(content)) => {
                Ok(ReportInput {
                    title,
                    institution_name,
                    address,
                    phone: req.phone,
                    logo_url: req.logo_url,
                    content,
                })
            }
            _ => Err(CoreError::Validation(
                "Validation failed: required field missing".into(),
            )),
        }
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Flatten `validator` output into one message, sorted by field name.
fn validation_error(errors: ValidationErrors) -> CoreError {
    let mut messages: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter()
                .map(move |err| (field.clone(), describe(&field, err)))
                .collect::<Vec<_>>()
        })
        .collect();
    messages.sort();
    messages.dedup();

    let fields: Vec<&str> = {
        let mut f: Vec<&str> = messages.iter().map(|(field, _)| field.as_str()).collect();
        f.dedup();
        f
    };
    let details: Vec<&str> = messages.iter().map(|(_, msg)| msg.as_str()).collect();

    CoreError::Validation(format!(
        "Validation failed for field(s): {}. {}",
        fields.join(", "),
        details.join(" ")
    ))
}

fn describe(field: &str, err: &validator::ValidationError) -> String {
    let label = field.replace('_', " ");
    match err.code.as_ref() {
        "required" => format!("The {label} field is required."),
        "url" => format!("The {label} field must be a valid URL."),
        "length" => match err.params.get("max") {
            Some(max) => {
                format!("The {label} field must not be greater than {max} characters.")
            }
            None => format!("The {label} field has an invalid length."),
        },
        other => format!("The {label} field is invalid ({other})."),
    }
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

/// A file part received from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied file name, kept verbatim as `original_filename`.
    pub original_name: String,
    /// Declared `Content-Type` of the part.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Extension after the last `.` of the client file name, or `""`.
    pub fn extension(&self) -> &str {
        self.original_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or("")
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Check an optional upload: presence, then extension, MIME type and size,
/// in that order.
pub fn validate_upload(file: Option<UploadedFile>) -> Result<UploadedFile, CoreError> {
    let file = match file {
        Some(f) if !f.original_name.is_empty() => f,
        _ => return Err(CoreError::NoFile),
    };

    if file.extension() != PDF_EXTENSION {
        return Err(CoreError::InvalidExtension);
    }

    if file.content_type.as_deref() != Some(PDF_MIME_TYPE) {
        return Err(CoreError::InvalidMimeType);
    }

    if file.size() > MAX_FILE_SIZE_BYTES {
        return Err(CoreError::FileTooLarge {
            size: Some(file.size()),
            max: MAX_FILE_SIZE_BYTES,
        });
    }

    Ok(file)
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// Raw `GET /pdf/list` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPdfParams {
    pub status: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Validated list filters and pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub status: Option<PdfStatus>,
    pub page: u32,
    pub limit: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            status: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ListQuery {
    /// Row offset of the first item on the page.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

impl ListPdfParams {
    pub fn validate(&self) -> Result<ListQuery, CoreError> {
        let mut problems: Vec<String> = Vec::new();

        let status = match non_empty(&self.status) {
            None => None,
            Some(raw) => match raw.parse::<PdfStatus>() {
                Ok(status) => Some(status),
                Err(_) => {
                    problems.push(
                        "The selected status is invalid. Must be one of: CREATED, UPLOADED, DELETED."
                            .into(),
                    );
                    None
                }
            },
        };

        let page = parse_bounded(&self.page, "page", 1, None, DEFAULT_PAGE, &mut problems);
        let limit = parse_bounded(
            &self.limit,
            "limit",
            1,
            Some(MAX_LIMIT),
            DEFAULT_LIMIT,
            &mut problems,
        );

        if problems.is_empty() {
            Ok(ListQuery {
                status,
                page,
                limit,
            })
        } else {
            Err(CoreError::Validation(problems.join(" ")))
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_bounded(
    value: &Option<String>,
    field: &str,
    min: u32,
    max: Option<u32>,
    default: u32,
    problems: &mut Vec<String>,
) -> u32 {
    let Some(raw) = non_empty(value) else {
        return default;
    };
    let Ok(parsed) = raw.parse::<i64>() else {
        problems.push(format!("The {field} field must be an integer."));
        return default;
    };
    if parsed < i64::from(min) {
        problems.push(format!("The {field} field must be at least {min}."));
        return default;
    }
    if let Some(max) = max {
        if parsed > i64::from(max) {
            problems.push(format!("The {field} field must not be greater than {max}."));
            return default;
        }
    }
    u32::try_from(parsed).unwrap_or_else(|_| {
        problems.push(format!("The {field} field is too large."));
        default
    })
}
