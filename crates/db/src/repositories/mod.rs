//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod pdf_file_repo;

pub use pdf_file_repo::PdfFileRepo;
