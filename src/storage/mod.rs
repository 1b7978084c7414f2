use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};

use crate::error::{AppError, Result};

/// Bucket for contributed PDF documents.
pub const DOCUMENTS_BUCKET: &str = "pdfs";

/// Bucket for announcement images.
pub const ANNOUNCEMENTS_BUCKET: &str = "announcements";

/// A stored blob as seen by the reconciliation sweep.
#[derive(Debug, Clone)]
pub struct BlobEntry {
    pub key: String,
    pub modified: DateTime<Utc>,
}

/// Durable blob storage, one namespace per bucket. Records reference blobs
/// by bucket + key; public access goes through `public_url`.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, bucket: &str, key: &str, data: &[u8]) -> Result<()>;

    async fn delete(&self, bucket: &str, key: &str) -> Result<()>;

    async fn exists(&self, bucket: &str, key: &str) -> Result<bool>;

    /// Open a blob for streaming reads.
    async fn open(&self, bucket: &str, key: &str) -> Result<Box<dyn AsyncRead + Send + Unpin>>;

    /// List every blob in a bucket. Used by the reconciliation sweep.
    async fn list(&self, bucket: &str) -> Result<Vec<BlobEntry>>;

    /// Public URL for a blob, matching the hosted-store URL shape the
    /// listing clients already consume.
    fn public_url(&self, bucket: &str, key: &str) -> String;
}

/// Local-filesystem blob store: `{root}/{bucket}/{key}`.
pub struct LocalBlobStore {
    root: PathBuf,
    base_url: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    /// Resolve a bucket + key to a path under the root. Keys containing
    /// path separators or parent components are rejected.
    fn resolve(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains('/') || key.contains('\\') {
            return Err(AppError::Storage(format!("invalid blob key: {}", key)));
        }
        for component in Path::new(key).components() {
            if matches!(component, Component::ParentDir) {
                return Err(AppError::Storage(format!("invalid blob key: {}", key)));
            }
        }
        Ok(self.root.join(bucket).join(key))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, bucket: &str, key: &str, data: &[u8]) -> Result<()> {
        let path = self.resolve(bucket, key)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("failed to create bucket dir: {}", e)))?;
        }

        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| AppError::Storage(format!("failed to create blob: {}", e)))?;

        file.write_all(data)
            .await
            .map_err(|e| AppError::Storage(format!("failed to write blob: {}", e)))?;
        file.flush()
            .await
            .map_err(|e| AppError::Storage(format!("failed to flush blob: {}", e)))?;

        tracing::debug!(bucket = bucket, key = key, size = data.len(), "blob written");
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<()> {
        let path = self.resolve(bucket, key)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(bucket = bucket, key = key, "blob deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(bucket = bucket, key = key, "blob not found for deletion");
                Ok(())
            }
            Err(e) => Err(AppError::Storage(format!("failed to delete blob: {}", e))),
        }
    }

    async fn exists(&self, bucket: &str, key: &str) -> Result<bool> {
        let path = self.resolve(bucket, key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn open(&self, bucket: &str, key: &str) -> Result<Box<dyn AsyncRead + Send + Unpin>> {
        let path = self.resolve(bucket, key)?;

        let file = fs::File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::NotFound(format!("blob not found: {}/{}", bucket, key))
            } else {
                AppError::Storage(format!("failed to open blob: {}", e))
            }
        })?;

        Ok(Box::new(file))
    }

    async fn list(&self, bucket: &str) -> Result<Vec<BlobEntry>> {
        let dir = self.root.join(bucket);

        let mut entries = Vec::new();
        let mut read_dir = match fs::read_dir(&dir).await {
            Ok(rd) => rd,
            // A bucket nothing was ever written to is an empty bucket.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(entries),
            Err(e) => return Err(AppError::Storage(format!("failed to list bucket: {}", e))),
        };

        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| AppError::Storage(format!("failed to list bucket: {}", e)))?
        {
            let metadata = entry
                .metadata()
                .await
                .map_err(|e| AppError::Storage(format!("failed to stat blob: {}", e)))?;
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());
            entries.push(BlobEntry {
                key: entry.file_name().to_string_lossy().into_owned(),
                modified,
            });
        }

        Ok(entries)
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url.trim_end_matches('/'),
            bucket,
            key
        )
    }
}

/// Strip an uploaded filename down to a safe blob-key suffix: the final path
/// component with anything outside `[A-Za-z0-9._-]` replaced by `_`.
pub fn sanitize_filename(filename: &str) -> String {
    let base = Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('_').is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}
