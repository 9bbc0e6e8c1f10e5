//! Turning object paths into URLs visitors can load.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;

use gallery_common::GalleryResult;

use crate::object_store::{BucketClient, UrlMode};
use crate::url_cache::UrlCache;

/// Resolves object paths to public or signed URLs.
///
/// Public URLs are deterministic and bypass the cache entirely. Signed URLs
/// are looked up in the cache first and minted on a miss.
#[derive(Clone)]
pub struct UrlResolver {
    bucket: Arc<dyn BucketClient>,
    cache: Option<Arc<UrlCache>>,
    mode: UrlMode,
    signed_ttl: Duration,
}

impl UrlResolver {
    pub fn public(bucket: Arc<dyn BucketClient>) -> Self {
        Self {
            bucket,
            cache: None,
            mode: UrlMode::Public,
            signed_ttl: Duration::ZERO,
        }
    }

    pub fn signed(bucket: Arc<dyn BucketClient>, cache: Option<Arc<UrlCache>>, ttl: Duration) -> Self {
        Self {
            bucket,
            cache,
            mode: UrlMode::Signed,
            signed_ttl: ttl,
        }
    }

    pub fn mode(&self) -> UrlMode {
        self.mode
    }

    /// URL for one object path.
    pub async fn resolve(&self, path: &str) -> GalleryResult<String> {
        match self.mode {
            UrlMode::Public => Ok(self.bucket.public_url(path)),
            UrlMode::Signed => {
                let url = self.resolve_signed(path).await;
                self.flush().await;
                url
            }
        }
    }

    /// URLs for many paths, in input order. Signing runs concurrently and
    /// the cache is persisted once at the end.
    pub async fn resolve_many(&self, paths: &[String]) -> Vec<GalleryResult<String>> {
        match self.mode {
            UrlMode::Public => paths
                .iter()
                .map(|path| Ok(self.bucket.public_url(path)))
                .collect(),
            UrlMode::Signed => {
                let urls = join_all(paths.iter().map(|path| self.resolve_signed(path))).await;
                self.flush().await;
                urls
            }
        }
    }

    async fn resolve_signed(&self, path: &str) -> GalleryResult<String> {
        if let Some(cache) = &self.cache {
            if let Some(url) = cache.get(path).await {
                return Ok(url);
            }
        }

        let url = self.bucket.signed_url(path, self.signed_ttl).await?;

        if let Some(cache) = &self.cache {
            cache.stage(path, &url).await;
        }
        Ok(url)
    }

    async fn flush(&self) {
        if let Some(cache) = &self.cache {
            cache.flush().await;
        }
    }

    /// Forget cached URLs after the objects behind them changed.
    pub async fn invalidate(&self, paths: &[String]) {
        if let Some(cache) = &self.cache {
            cache.invalidate(paths).await;
        }
    }
}
