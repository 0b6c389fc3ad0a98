use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use pdfdesk_core::clock::SystemClock;
use pdfdesk_core::storage::LocalBlobStore;
use pdfdesk_db::{InMemoryPdfStore, PdfStore, PgPdfStore};
use pdfdesk_render::{HtmlPdfRenderer, LogoResolver};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pdfdesk_api::config::ServerConfig;
use pdfdesk_api::router::build_app_router;
use pdfdesk_api::services::PdfService;
use pdfdesk_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdfdesk_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Record store ---
    let store: Arc<dyn PdfStore> = match &config.database_url {
        Some(database_url) => {
            let pool = pdfdesk_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            pdfdesk_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            pdfdesk_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(PgPdfStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store (data is not persisted)");
            Arc::new(InMemoryPdfStore::new())
        }
    };

    // --- Blob storage ---
    tokio::fs::create_dir_all(&config.storage_root)
        .await
        .expect("Failed to create storage root");
    tracing::info!(root = %config.storage_root.display(), "Blob storage ready");

    // --- Lifecycle service ---
    let logos = LogoResolver::new(
        Duration::from_secs(config.logo_fetch_timeout_secs),
        config.logo_max_bytes,
    )
    .expect("Failed to build logo HTTP client");

    let pdf_service = PdfService::new(
        Arc::clone(&store),
        Arc::new(LocalBlobStore::new(config.storage_root.clone())),
        Arc::new(HtmlPdfRenderer),
        logos,
        Arc::new(SystemClock),
        config.public_base_url.clone(),
    );

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        store,
        pdf_service: Arc::new(pdf_service),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server shuts
/// down cleanly whether stopped interactively or by a process manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
