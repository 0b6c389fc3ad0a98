use std::sync::Arc;

use pdfdesk_db::PdfStore;

use crate::config::ServerConfig;
use crate::services::PdfService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Record store, used directly by the health check.
    pub store: Arc<dyn PdfStore>,
    /// PDF lifecycle service.
    pub pdf_service: Arc<PdfService>,
}
