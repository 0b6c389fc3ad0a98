use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In production,
/// override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`).
    pub request_timeout_secs: u64,
    /// PostgreSQL connection string. `None` runs against the in-memory store.
    pub database_url: Option<String>,
    /// Directory blobs are written under and served from at `/storage`.
    pub storage_root: PathBuf,
    /// Absolute base URL used for public file links and pagination links.
    pub public_base_url: String,
    /// Request body limit for the upload route.
    pub upload_body_limit_bytes: usize,
    /// Timeout for fetching a report logo.
    pub logo_fetch_timeout_secs: u64,
    /// Largest logo body that will be embedded.
    pub logo_max_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `HOST`                    | `0.0.0.0`               |
    /// | `PORT`                    | `3000`                  |
    /// | `CORS_ORIGINS`            | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`    | `60`                    |
    /// | `DATABASE_URL`            | unset (in-memory store) |
    /// | `STORAGE_ROOT`            | `storage/public`        |
    /// | `PUBLIC_BASE_URL`         | `http://localhost:3000` |
    /// | `UPLOAD_BODY_LIMIT_BYTES` | `33554432`              |
    /// | `LOGO_FETCH_TIMEOUT_SECS` | `10`                    |
    /// | `LOGO_MAX_BYTES`          | `2097152`               |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let storage_root = PathBuf::from(
            std::env::var("STORAGE_ROOT").unwrap_or_else(|_| "storage/public".into()),
        );

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();

        let upload_body_limit_bytes: usize = std::env::var("UPLOAD_BODY_LIMIT_BYTES")
            .unwrap_or_else(|_| "33554432".into())
            .parse()
            .expect("UPLOAD_BODY_LIMIT_BYTES must be a valid usize");

        let logo_fetch_timeout_secs: u64 = std::env::var("LOGO_FETCH_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("LOGO_FETCH_TIMEOUT_SECS must be a valid u64");

        let logo_max_bytes: usize = std::env::var("LOGO_MAX_BYTES")
            .unwrap_or_else(|_| "2097152".into())
            .parse()
            .expect("LOGO_MAX_BYTES must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            storage_root,
            public_base_url,
            upload_body_limit_bytes,
            logo_fetch_timeout_secs,
            logo_max_bytes,
        }
    }
}
