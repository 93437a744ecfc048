//! File storage for uploaded ad images.
//!
//! Handlers only see the [`FileStorage`] trait; the server wires in
//! [`LocalFileStorage`], which writes under `MEDIA_ROOT` and serves files back
//! through the `/media` route.

use std::io;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use classifieds_core::media::media_url;

/// Blob storage addressed by relative keys such as `ads/7_ab12.png`.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Write `bytes` under `key`, replacing any existing blob. Returns the
    /// public URL of the stored file.
    async fn store(&self, key: &str, bytes: &[u8]) -> io::Result<String>;

    /// Delete the blob under `key`. A missing blob is not an error.
    async fn remove(&self, key: &str) -> io::Result<()>;

    /// Public URL for `key`.
    fn url(&self, key: &str) -> String;
}

/// Stores blobs as plain files below a root directory.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to a path inside the root. Keys that would escape the
    /// root (absolute paths, `..`) are rejected.
    fn path_for(&self, key: &str) -> io::Result<PathBuf> {
        let relative = Path::new(key);
        let is_plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if key.is_empty() || !is_plain {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid storage key '{key}'"),
            ));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store(&self, key: &str, bytes: &[u8]) -> io::Result<String> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        Ok(self.url(key))
    }

    async fn remove(&self, key: &str) -> io::Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    fn url(&self, key: &str) -> String {
        media_url(&self.public_base_url, key)
    }
}
