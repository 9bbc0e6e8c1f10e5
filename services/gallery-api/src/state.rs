//! Application state and shared resources.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use content::ContentResolver;
use storage::url_cache::DEFAULT_MAX_ENTRIES;
use storage::{
    BucketClient, FileCacheStore, ObjectStorage, ObjectStorageConfig, UrlCache, UrlMode,
    UrlResolver,
};

use crate::config::Args;

/// Shared application state.
pub struct AppState {
    pub resolver: ContentResolver,
    /// Present only in signed mode
    pub url_cache: Option<Arc<UrlCache>>,
}

impl AppState {
    pub async fn new(args: &Args, storage_config: &ObjectStorageConfig) -> Result<Self> {
        let storage = ObjectStorage::new(storage_config).context("Failed to create storage client")?;
        let bucket: Arc<dyn BucketClient> = Arc::new(storage);

        let (urls, url_cache) = match storage_config.url_mode {
            UrlMode::Public => (UrlResolver::public(bucket.clone()), None),
            UrlMode::Signed => {
                let store = Arc::new(FileCacheStore::new(args.cache_path.clone(), args.cache_max_bytes));
                let cache = Arc::new(
                    UrlCache::open(store, storage_config.signed_url_ttl(), DEFAULT_MAX_ENTRIES)
                        .await,
                );
                info!(
                    path = %args.cache_path.display(),
                    entries = cache.len().await,
                    "Signed URL cache opened"
                );
                (
                    UrlResolver::signed(bucket.clone(), Some(cache.clone()), storage_config.signed_url_ttl()),
                    Some(cache),
                )
            }
        };

        Ok(Self::with_resolver(ContentResolver::new(bucket, urls), url_cache))
    }

    pub fn with_resolver(resolver: ContentResolver, url_cache: Option<Arc<UrlCache>>) -> Self {
        Self { resolver, url_cache }
    }
}
