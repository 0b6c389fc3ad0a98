//! Record store for PDF metadata.
//!
//! [`PdfStore`] is the seam the lifecycle service talks to. [`PgPdfStore`]
//! backs it with PostgreSQL through the zero-sized repositories in
//! [`repositories`]; [`InMemoryPdfStore`] is a process-local stand-in for
//! development and tests.

use sqlx::postgres::PgPoolOptions;

pub mod memory;
pub mod models;
pub mod repositories;
pub mod store;

pub use memory::InMemoryPdfStore;
pub use store::{ListPage, PdfListFilter, PdfStore, PgPdfStore};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
