//! Application services orchestrating the store, blob storage and renderer.

pub mod pdf;

pub use pdf::PdfService;
