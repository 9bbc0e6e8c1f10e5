//! Persistent backing for the URL cache.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use gallery_common::{GalleryError, GalleryResult};

use crate::url_cache::CacheEntry;

/// Default size bound of the persisted cache, in bytes.
pub const DEFAULT_CACHE_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Key-value storage that survives restarts.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Load every persisted entry. A store that was never written is empty.
    async fn load(&self) -> GalleryResult<HashMap<String, CacheEntry>>;

    /// Replace the persisted contents with `entries`.
    async fn save(&self, entries: &HashMap<String, CacheEntry>) -> GalleryResult<()>;
}

/// JSON file store with a byte quota.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    path: PathBuf,
    max_bytes: u64,
}

impl FileCacheStore {
    pub fn new(path: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            path: path.into(),
            max_bytes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl CacheStore for FileCacheStore {
    async fn load(&self) -> GalleryResult<HashMap<String, CacheEntry>> {
        match tokio::fs::read(&self.path).await {
            Ok(raw) => Ok(serde_json::from_slice(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, entries: &HashMap<String, CacheEntry>) -> GalleryResult<()> {
        let raw = serde_json::to_vec(entries)
            .map_err(|e| GalleryError::CacheWrite(e.to_string()))?;

        if raw.len() as u64 > self.max_bytes {
            return Err(GalleryError::CacheWrite(format!(
                "quota exceeded: {} bytes > {} bytes",
                raw.len(),
                self.max_bytes
            )));
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| GalleryError::CacheWrite(e.to_string()))?;
            }
        }

        // Write-then-rename so a crash never leaves a truncated file. Each
        // save gets its own temp file.
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, &raw)
            .await
            .map_err(|e| GalleryError::CacheWrite(e.to_string()))?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(GalleryError::CacheWrite(e.to_string()));
        }

        debug!(path = %self.path.display(), bytes = raw.len(), "Persisted URL cache");
        Ok(())
    }
}
