//! Storage abstractions for the gallery services.
//!
//! Provides:
//! - A bucket client contract and its S3-compatible implementation
//! - The bucket path layout used by the site
//! - A TTL cache for signed URLs, persisted between runs
//! - URL resolution (public or signed) on top of both

pub mod cache_store;
pub mod layout;
pub mod object_store;
pub mod url_cache;
pub mod urls;

pub use self::object_store::{BucketClient, ObjectStorage, ObjectStorageConfig, UrlMode};
pub use cache_store::{CacheStore, FileCacheStore};
pub use layout::StoragePath;
pub use url_cache::{CacheEntry, UrlCache, UrlCacheStats, DEFAULT_SIGNED_URL_TTL};
pub use urls::UrlResolver;
