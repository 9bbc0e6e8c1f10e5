//! In-memory [`BucketClient`] for tests.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use gallery_common::{EntryMetadata, GalleryError, GalleryResult, StorageEntry};
use storage::BucketClient;

/// Base of every public URL the fake hands out.
pub const PUBLIC_BASE: &str = "https://cdn.test";

/// Bucket held in a sorted map, with switches for failure scenarios.
///
/// Signed URLs carry a sequence number so tests can tell a cached URL
/// from a freshly minted one.
#[derive(Default)]
pub struct FakeBucket {
    objects: Mutex<BTreeMap<String, Bytes>>,
    failing_listings: Mutex<HashSet<String>>,
    failing_removals: Mutex<HashSet<String>>,
    failing_gets: Mutex<HashSet<String>>,
    failing_signatures: Mutex<HashSet<String>>,
    list_calls: AtomicUsize,
    signed_calls: AtomicUsize,
}

impl FakeBucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bucket containing `paths`, each holding placeholder image bytes.
    pub fn with_files<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let bucket = Self::new();
        for path in paths {
            bucket.insert(path.as_ref(), crate::fixtures::PLACEHOLDER_IMAGE);
        }
        bucket
    }

    pub fn insert(&self, path: &str, data: impl Into<Bytes>) {
        self.objects
            .lock()
            .unwrap()
            .insert(path.trim_matches('/').to_string(), data.into());
    }

    /// Make every listing of `prefix` fail with a transient error.
    pub fn fail_listing(&self, prefix: &str) {
        self.failing_listings
            .lock()
            .unwrap()
            .insert(prefix.trim_matches('/').to_string());
    }

    /// Make removal of `path` fail.
    pub fn fail_removal(&self, path: &str) {
        self.failing_removals.lock().unwrap().insert(path.to_string());
    }

    /// Make reads of `path` fail with a transient error.
    pub fn fail_get(&self, path: &str) {
        self.failing_gets.lock().unwrap().insert(path.to_string());
    }

    /// Make signing `path` fail with an access error even though it exists.
    pub fn fail_signing(&self, path: &str) {
        self.failing_signatures
            .lock()
            .unwrap()
            .insert(path.to_string());
    }

    pub fn contains(&self, path: &str) -> bool {
        self.objects.lock().unwrap().contains_key(path)
    }

    pub fn paths(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn signed_url_calls(&self) -> usize {
        self.signed_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BucketClient for FakeBucket {
    async fn list(&self, prefix: &str) -> GalleryResult<Vec<StorageEntry>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let prefix = prefix.trim_matches('/');

        if self.failing_listings.lock().unwrap().contains(prefix) {
            return Err(GalleryError::Transient(format!(
                "{}: connection reset",
                prefix
            )));
        }

        let objects = self.objects.lock().unwrap();
        let mut folders = BTreeSet::new();
        let mut entries = Vec::new();

        for (path, data) in objects.iter() {
            let rest = if prefix.is_empty() {
                path.as_str()
            } else {
                match path.strip_prefix(prefix).and_then(|r| r.strip_prefix('/')) {
                    Some(rest) => rest,
                    None => continue,
                }
            };

            match rest.split_once('/') {
                Some((folder, _)) => {
                    folders.insert(folder.to_string());
                }
                None => entries.push(StorageEntry::file(
                    prefix,
                    rest,
                    EntryMetadata {
                        size: data.len() as u64,
                        last_modified: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).single(),
                    },
                )),
            }
        }

        entries.extend(folders.into_iter().map(|name| StorageEntry::folder(prefix, name)));
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        if entries.is_empty() && !prefix.is_empty() {
            return Err(GalleryError::NotFound(prefix.to_string()));
        }
        Ok(entries)
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", PUBLIC_BASE, path)
    }

    async fn signed_url(&self, path: &str, ttl: Duration) -> GalleryResult<String> {
        if !self.contains(path) {
            return Err(GalleryError::Access(format!("{} does not exist", path)));
        }
        if self.failing_signatures.lock().unwrap().contains(path) {
            return Err(GalleryError::Access(format!("{}: permission denied", path)));
        }
        let seq = self.signed_calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!(
            "https://signed.test/{}?expires={}&sig={}",
            path,
            ttl.as_secs(),
            seq
        ))
    }

    async fn get(&self, path: &str) -> GalleryResult<Bytes> {
        if self.failing_gets.lock().unwrap().contains(path) {
            return Err(GalleryError::Transient(format!("{}: timed out", path)));
        }
        self.objects
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| GalleryError::NotFound(path.to_string()))
    }

    async fn upload(&self, path: &str, data: Bytes, overwrite: bool) -> GalleryResult<String> {
        let mut objects = self.objects.lock().unwrap();
        if !overwrite && objects.contains_key(path) {
            return Err(GalleryError::Conflict(path.to_string()));
        }
        objects.insert(path.to_string(), data);
        Ok(path.to_string())
    }

    async fn remove(&self, paths: &[String]) -> GalleryResult<()> {
        let failing = self.failing_removals.lock().unwrap().clone();
        let mut objects = self.objects.lock().unwrap();

        let mut failed = Vec::new();
        for path in paths {
            if failing.contains(path) {
                failed.push(path.clone());
            } else {
                objects.remove(path);
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(GalleryError::PartialRemoval { failed })
        }
    }
}
