//! Object storage client for site assets (S3 compatible).

use async_trait::async_trait;
use bytes::Bytes;
use futures::future::join_all;
use object_store::{
    aws::AmazonS3Builder, path::Path, signer::Signer, ObjectStore, PutMode, PutOptions,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use gallery_common::{EntryMetadata, GalleryError, GalleryResult, StorageEntry};

/// Placeholder objects some providers create to materialize empty folders.
const FOLDER_PLACEHOLDER: &str = ".emptyFolderPlaceholder";

/// Operations the content resolver and admin surface need from a bucket.
#[async_trait]
pub trait BucketClient: Send + Sync {
    /// Non-recursive listing of `prefix`, sorted by name.
    ///
    /// Fails with `NotFound` when nothing lives under a non-root prefix and
    /// with `Transient` on network failure.
    async fn list(&self, prefix: &str) -> GalleryResult<Vec<StorageEntry>>;

    /// Permanent URL for a publicly readable object. Pure string construction.
    fn public_url(&self, path: &str) -> String;

    /// Time-limited URL for a private object. Fails with `Access` if the
    /// object is missing or the credentials cannot sign.
    async fn signed_url(&self, path: &str, ttl: Duration) -> GalleryResult<String>;

    /// Fetch an object's bytes.
    async fn get(&self, path: &str) -> GalleryResult<Bytes>;

    /// Store `data` at `path`. With `overwrite == false` an existing object
    /// fails the call with `Conflict`.
    async fn upload(&self, path: &str, data: Bytes, overwrite: bool) -> GalleryResult<String>;

    /// Remove objects by exact path. A partial failure reports the paths
    /// that could not be removed.
    async fn remove(&self, paths: &[String]) -> GalleryResult<()>;
}

/// How image URLs are handed to visitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlMode {
    /// Bucket is publicly readable; URLs are deterministic and never cached
    #[default]
    Public,
    /// Bucket is private; URLs are signed and cached until they expire
    Signed,
}

/// Configuration for object storage connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectStorageConfig {
    /// S3 endpoint URL
    pub endpoint: String,
    /// Bucket name
    pub bucket: String,
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Region (any value works for most S3-compatible providers)
    pub region: String,
    /// Allow HTTP (for local development)
    pub allow_http: bool,
    /// Prefix for public object URLs; defaults to `{endpoint}/{bucket}`
    pub public_base_url: Option<String>,
    /// Public or signed URLs
    pub url_mode: UrlMode,
    /// Lifetime of signed URLs in seconds
    pub signed_url_ttl_secs: u64,
}

impl Default for ObjectStorageConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            bucket: "projects".to_string(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            region: "us-east-1".to_string(),
            allow_http: false,
            public_base_url: None,
            url_mode: UrlMode::Public,
            signed_url_ttl_secs: 6 * 60 * 60,
        }
    }
}

impl ObjectStorageConfig {
    /// Check that the credentials needed at startup are present.
    pub fn validate(&self) -> GalleryResult<()> {
        let mut missing = Vec::new();
        if self.endpoint.trim().is_empty() {
            missing.push("storage endpoint");
        }
        if self.bucket.trim().is_empty() {
            missing.push("bucket name");
        }
        if self.access_key_id.trim().is_empty() {
            missing.push("access key");
        }
        if self.secret_access_key.trim().is_empty() {
            missing.push("secret key");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(GalleryError::Configuration(format!(
                "missing {}",
                missing.join(", ")
            )))
        }
    }

    /// Prefix used to build public object URLs.
    pub fn public_base_url(&self) -> String {
        match &self.public_base_url {
            Some(url) if !url.trim().is_empty() => url.trim_end_matches('/').to_string(),
            _ => format!("{}/{}", self.endpoint.trim_end_matches('/'), self.bucket),
        }
    }

    pub fn signed_url_ttl(&self) -> Duration {
        Duration::from_secs(self.signed_url_ttl_secs)
    }
}

/// Object storage client for the site bucket.
pub struct ObjectStorage {
    store: Arc<dyn ObjectStore>,
    signer: Option<Arc<dyn Signer>>,
    bucket: String,
    public_base_url: String,
}

impl ObjectStorage {
    /// Create a new object storage client from config.
    pub fn new(config: &ObjectStorageConfig) -> GalleryResult<Self> {
        config.validate()?;

        let mut builder = AmazonS3Builder::new()
            .with_endpoint(&config.endpoint)
            .with_bucket_name(&config.bucket)
            .with_access_key_id(&config.access_key_id)
            .with_secret_access_key(&config.secret_access_key)
            .with_region(&config.region);

        if config.allow_http {
            builder = builder.with_allow_http(true);
        }

        let s3 = Arc::new(builder.build().map_err(|e| {
            GalleryError::Configuration(format!("Failed to create S3 client: {}", e))
        })?);

        Ok(Self {
            store: s3.clone(),
            signer: Some(s3),
            bucket: config.bucket.clone(),
            public_base_url: config.public_base_url(),
        })
    }

    /// Wrap an existing store. Without a signer, `signed_url` always fails.
    pub fn with_store(
        store: Arc<dyn ObjectStore>,
        bucket: impl Into<String>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            signer: None,
            bucket: bucket.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl BucketClient for ObjectStorage {
    #[instrument(skip(self), fields(bucket = %self.bucket))]
    async fn list(&self, prefix: &str) -> GalleryResult<Vec<StorageEntry>> {
        let prefix = prefix.trim_matches('/');
        let prefix_path = (!prefix.is_empty()).then(|| Path::from(prefix));

        let result = self
            .store
            .list_with_delimiter(prefix_path.as_ref())
            .await
            .map_err(|e| map_store_error(prefix, e))?;

        let mut entries = Vec::with_capacity(result.common_prefixes.len() + result.objects.len());

        for folder in &result.common_prefixes {
            if let Some(name) = folder.filename() {
                entries.push(StorageEntry::folder(prefix, name));
            }
        }

        for meta in &result.objects {
            let Some(name) = meta.location.filename() else {
                continue;
            };
            if name == FOLDER_PLACEHOLDER {
                continue;
            }
            entries.push(StorageEntry::file(
                prefix,
                name,
                EntryMetadata {
                    size: meta.size as u64,
                    last_modified: Some(meta.last_modified),
                },
            ));
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));

        if entries.is_empty() && !prefix.is_empty() {
            return Err(GalleryError::NotFound(prefix.to_string()));
        }

        debug!(count = entries.len(), "Listed prefix");
        Ok(entries)
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base_url, path.trim_start_matches('/'))
    }

    #[instrument(skip(self), fields(bucket = %self.bucket, path = %path))]
    async fn signed_url(&self, path: &str, ttl: Duration) -> GalleryResult<String> {
        let signer = self.signer.as_ref().ok_or_else(|| {
            GalleryError::Access("store does not support signed URLs".to_string())
        })?;
        let location = Path::from(path);

        // Signing is offline, so check the object exists first.
        match self.store.head(&location).await {
            Ok(_) => {}
            Err(object_store::Error::NotFound { .. }) => {
                return Err(GalleryError::Access(format!("{} does not exist", path)))
            }
            Err(e) => return Err(map_store_error(path, e)),
        }

        let url = signer
            .signed_url(reqwest::Method::GET, &location, ttl)
            .await
            .map_err(|e| GalleryError::Access(format!("Failed to sign {}: {}", path, e)))?;

        Ok(url.to_string())
    }

    #[instrument(skip(self), fields(bucket = %self.bucket, path = %path))]
    async fn get(&self, path: &str) -> GalleryResult<Bytes> {
        let location = Path::from(path);

        let result = self
            .store
            .get(&location)
            .await
            .map_err(|e| map_store_error(path, e))?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| map_store_error(path, e))?;

        debug!(size = bytes.len(), "Read object");
        Ok(bytes)
    }

    #[instrument(skip(self, data), fields(bucket = %self.bucket, path = %path))]
    async fn upload(&self, path: &str, data: Bytes, overwrite: bool) -> GalleryResult<String> {
        let location = Path::from(path);
        let mode = if overwrite {
            PutMode::Overwrite
        } else {
            PutMode::Create
        };
        debug!(size = data.len(), overwrite, "Writing object");

        self.store
            .put_opts(
                &location,
                data.into(),
                PutOptions {
                    mode,
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| map_store_error(path, e))?;

        Ok(path.to_string())
    }

    #[instrument(skip(self), fields(bucket = %self.bucket, count = paths.len()))]
    async fn remove(&self, paths: &[String]) -> GalleryResult<()> {
        let results = join_all(paths.iter().map(|path| async move {
            let location = Path::from(path.as_str());
            (path, self.store.delete(&location).await)
        }))
        .await;

        let mut failed = Vec::new();
        for (path, result) in results {
            if let Err(e) = result {
                warn!(path = %path, error = %e, "Failed to delete object");
                failed.push(path.clone());
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(GalleryError::PartialRemoval { failed })
        }
    }
}

/// Translate provider errors into the gallery taxonomy.
fn map_store_error(path: &str, err: object_store::Error) -> GalleryError {
    match err {
        object_store::Error::NotFound { .. } => GalleryError::NotFound(path.to_string()),
        object_store::Error::AlreadyExists { .. } | object_store::Error::Precondition { .. } => {
            GalleryError::Conflict(path.to_string())
        }
        object_store::Error::InvalidPath { source } => {
            GalleryError::InvalidRequest(format!("{}: {}", path, source))
        }
        object_store::Error::NotSupported { source } => {
            GalleryError::Internal(format!("{}: {}", path, source))
        }
        other => GalleryError::Transient(format!("{}: {}", path, other)),
    }
}
