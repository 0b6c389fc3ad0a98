//! Blob storage for PDF bytes.
//!
//! Paths are relative to the storage root and always use `/` separators,
//! e.g. `uploads/pdf/report_20260101_000000_abcdef.pdf`.

use std::io;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Byte storage addressed by relative path.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Whether a file or directory exists at `path`.
    async fn exists(&self, path: &str) -> io::Result<bool>;

    /// Create `path` and any missing parents.
    async fn create_dir(&self, path: &str) -> io::Result<()>;

    /// Write `data` to `path`, replacing any existing file.
    async fn put(&self, path: &str, data: &[u8]) -> io::Result<()>;

    /// Size in bytes of the file at `path`.
    async fn size(&self, path: &str) -> io::Result<u64>;

    /// Create `dir` unless it already exists.
    async fn ensure_dir(&self, dir: &str) -> io::Result<()> {
        if !self.exists(dir).await? {
            self.create_dir(dir).await?;
        }
        Ok(())
    }
}

/// Local filesystem blob storage rooted at a directory.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative blob path, refusing anything that would escape the root.
    fn full_path(&self, path: &str) -> io::Result<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || path.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid blob path '{path}'"),
            ));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn exists(&self, path: &str) -> io::Result<bool> {
        fs::try_exists(self.full_path(path)?).await
    }

    async fn create_dir(&self, path: &str) -> io::Result<()> {
        let full = self.full_path(path)?;
        fs::create_dir_all(&full).await?;
        tracing::debug!(path = %full.display(), "Created storage directory");
        Ok(())
    }

    async fn put(&self, path: &str, data: &[u8]) -> io::Result<()> {
        let full = self.full_path(path)?;
        let mut file = fs::File::create(&full).await?;
        file.write_all(data).await?;
        file.flush().await?;
        tracing::debug!(path = %full.display(), bytes = data.len(), "Stored blob");
        Ok(())
    }

    async fn size(&self, path: &str) -> io::Result<u64> {
        let meta = fs::metadata(self.full_path(path)?).await?;
        Ok(meta.len())
    }
}
