//! Content resolution: bucket listing -> ordered, display-ready records.
//!
//! One call walks these stages:
//!
//! ```text
//! Idle -> Listing -> ExpandingFolders -> Parsing -> Merging -> Sorting -> Ready
//!            \-------------\-> Failed
//! ```
//!
//! Only a failed root listing is fatal to a call, and even then the caller
//! gets an empty [`Resolution`] carrying the error rather than an `Err`.
//! Everything below the root (a folder that cannot be listed, a missing
//! dictionary, an image whose URL cannot be signed) drops the affected
//! piece, logs it and records a [`ResolveWarning`].
//!
//! Nothing is kept between calls. Dropping the returned future abandons
//! the in-flight requests.

use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use gallery_common::{GalleryError, GalleryResult, Locale, Record, StorageEntry};
use storage::{BucketClient, StoragePath, UrlResolver};

use crate::filename::{compare_image_names, is_image, parse_name, ParsedName};
use crate::localization::{resolve_labels, LocalizationDict};

/// What the records under a prefix represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Files sharing a slug are merged into one record
    Projects,
    /// One portrait per member; later files with a known slug are ignored
    Team,
}

/// Parameters for one resolution pass.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub root_prefix: String,
    /// Optional JSON dictionary with per-slug overrides
    pub dictionary_path: Option<String>,
    pub kind: ContentKind,
    /// List each sub-folder and turn it into a multi-image record
    pub expand_folders: bool,
}

impl ResolverConfig {
    /// `portfolio/` with folder-backed projects and `titles.json`.
    pub fn projects() -> Self {
        Self {
            root_prefix: StoragePath::PORTFOLIO.to_string(),
            dictionary_path: Some(StoragePath::project_titles()),
            kind: ContentKind::Projects,
            expand_folders: true,
        }
    }

    /// `team/` portraits with `team.json`.
    pub fn team() -> Self {
        Self {
            root_prefix: StoragePath::TEAM.to_string(),
            dictionary_path: Some(StoragePath::team_dictionary()),
            kind: ContentKind::Team,
            expand_folders: false,
        }
    }
}

/// Stages of a resolution pass, reported in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStage {
    Idle,
    Listing,
    ExpandingFolders,
    Parsing,
    Merging,
    Sorting,
    Ready,
    Failed,
}

/// A non-fatal problem met during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveWarning {
    /// The dictionary exists but could not be fetched or parsed
    DictionaryUnavailable { path: String, reason: String },
    /// A project folder could not be listed; its record is missing
    FolderUnavailable { folder: String, reason: String },
    /// No URL could be produced for an image; it was left out
    ImageUnavailable { path: String, reason: String },
    /// A name yielded an empty slug and was skipped
    Unparseable { name: String },
}

/// Outcome of a resolution pass.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub records: Vec<Record>,
    pub warnings: Vec<ResolveWarning>,
    /// Set when the root listing failed; `records` is then empty
    pub failure: Option<GalleryError>,
}

impl Resolution {
    fn failed(error: GalleryError) -> Self {
        Self {
            failure: Some(error),
            ..Default::default()
        }
    }

    pub fn is_ready(&self) -> bool {
        self.failure.is_none()
    }
}

/// Records-to-be, before URLs and labels are attached.
struct Candidate {
    parsed: ParsedName,
    image_paths: Vec<String>,
}

/// Resolves bucket prefixes into records.
#[derive(Clone)]
pub struct ContentResolver {
    bucket: Arc<dyn BucketClient>,
    urls: UrlResolver,
}

impl ContentResolver {
    pub fn new(bucket: Arc<dyn BucketClient>, urls: UrlResolver) -> Self {
        Self { bucket, urls }
    }

    pub fn bucket(&self) -> &Arc<dyn BucketClient> {
        &self.bucket
    }

    pub fn urls(&self) -> &UrlResolver {
        &self.urls
    }

    /// Run one resolution pass.
    #[instrument(skip(self, config), fields(prefix = %config.root_prefix, kind = ?config.kind))]
    pub async fn resolve(&self, config: &ResolverConfig) -> Resolution {
        debug!(stage = ?ResolveStage::Listing, "Listing root prefix");
        let root = match self.bucket.list(&config.root_prefix).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(stage = ?ResolveStage::Failed, error = %e, "Root listing failed");
                return Resolution::failed(e);
            }
        };

        let mut warnings = Vec::new();

        let folders: Vec<&StorageEntry> = if config.expand_folders {
            root.iter().filter(|entry| is_folder_entry(entry)).collect()
        } else {
            Vec::new()
        };

        debug!(
            stage = ?ResolveStage::ExpandingFolders,
            folders = folders.len(),
            "Expanding folders"
        );
        let (mut expanded, dict) = futures::join!(
            self.expand_folders(&folders, &mut warnings),
            self.fetch_dictionary(config.dictionary_path.as_deref()),
        );
        let dict = match dict {
            Ok(dict) => dict,
            Err(warning) => {
                warnings.push(warning);
                None
            }
        };

        debug!(stage = ?ResolveStage::Parsing, "Parsing names");
        let candidates = group_candidates(&root, &mut expanded, config, &mut warnings);

        debug!(stage = ?ResolveStage::Merging, candidates = candidates.len(), "Merging labels");
        let mut records = self
            .build_records(candidates, dict.as_ref(), &mut warnings)
            .await;

        debug!(stage = ?ResolveStage::Sorting, "Sorting records");
        sort_records(&mut records);

        info!(
            stage = ?ResolveStage::Ready,
            records = records.len(),
            warnings = warnings.len(),
            "Content resolved"
        );

        Resolution {
            records,
            warnings,
            failure: None,
        }
    }

    /// Fetch and parse a dictionary file.
    pub async fn load_dictionary(&self, path: &str) -> GalleryResult<LocalizationDict> {
        let raw = self.bucket.get(path).await?;
        LocalizationDict::from_json(&raw)
            .map_err(|e| GalleryError::InvalidRequest(format!("{}: {}", path, e)))
    }

    /// URL of the hero background, preferring WebP over JPEG.
    pub async fn resolve_hero(&self) -> Option<String> {
        let entries = match self.bucket.list(StoragePath::HERO).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Hero listing failed");
                return None;
            }
        };

        let entry = StoragePath::HERO_CANDIDATES
            .iter()
            .find_map(|name| entries.iter().find(|e| e.is_file() && e.name == *name))?;

        match self.urls.resolve(&entry.path).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(path = %entry.path, error = %e, "Hero URL unavailable");
                None
            }
        }
    }

    /// List every folder concurrently. A folder that fails to list, or
    /// holds no images, is left out of the map.
    async fn expand_folders(
        &self,
        folders: &[&StorageEntry],
        warnings: &mut Vec<ResolveWarning>,
    ) -> HashMap<String, Vec<String>> {
        let listings = join_all(folders.iter().map(|folder| async move {
            (folder.path.clone(), self.bucket.list(&folder.path).await)
        }))
        .await;

        let mut expanded = HashMap::with_capacity(listings.len());
        for (folder, listing) in listings {
            match listing {
                Ok(entries) => {
                    let mut images: Vec<String> = entries
                        .into_iter()
                        .filter(|e| e.is_file() && is_image(&e.name))
                        .map(|e| e.path)
                        .collect();
                    if images.is_empty() {
                        debug!(folder = %folder, "Folder has no images");
                        continue;
                    }
                    images.sort_by(|a, b| compare_image_names(a, b));
                    expanded.insert(folder, images);
                }
                Err(e) => {
                    warn!(folder = %folder, error = %e, "Folder listing failed, skipping");
                    warnings.push(ResolveWarning::FolderUnavailable {
                        folder,
                        reason: e.to_string(),
                    });
                }
            }
        }
        expanded
    }

    /// A missing dictionary is normal; anything else is worth a warning.
    async fn fetch_dictionary(
        &self,
        path: Option<&str>,
    ) -> Result<Option<LocalizationDict>, ResolveWarning> {
        let Some(path) = path else {
            return Ok(None);
        };

        match self.load_dictionary(path).await {
            Ok(dict) => Ok(Some(dict)),
            Err(GalleryError::NotFound(_)) => {
                debug!(path = %path, "No dictionary, using filename labels");
                Ok(None)
            }
            Err(e) => {
                warn!(path = %path, error = %e, "Dictionary unavailable, using filename labels");
                Err(ResolveWarning::DictionaryUnavailable {
                    path: path.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    async fn build_records(
        &self,
        candidates: Vec<Candidate>,
        dict: Option<&LocalizationDict>,
        warnings: &mut Vec<ResolveWarning>,
    ) -> Vec<Record> {
        // One batch for every image so signed URLs are persisted once.
        let paths: Vec<String> = candidates
            .iter()
            .flat_map(|c| c.image_paths.iter().cloned())
            .collect();
        let mut resolved = self.urls.resolve_many(&paths).await.into_iter();

        let mut records = Vec::with_capacity(candidates.len());
        for candidate in &candidates {
            let mut images = Vec::with_capacity(candidate.image_paths.len());
            for path in &candidate.image_paths {
                let Some(url) = resolved.next() else {
                    break;
                };
                match url {
                    Ok(url) => images.push(url),
                    Err(e) => {
                        warn!(path = %path, error = %e, "Image URL unavailable");
                        warnings.push(ResolveWarning::ImageUnavailable {
                            path: path.clone(),
                            reason: e.to_string(),
                        });
                    }
                }
            }

            if images.is_empty() {
                continue;
            }

            let slug = &candidate.parsed.slug;
            let en = resolve_labels(slug, &candidate.parsed, dict, Locale::En);
            let az = resolve_labels(slug, &candidate.parsed, dict, Locale::Az);

            records.push(Record {
                slug: slug.clone(),
                title_en: en.title,
                title_az: az.title,
                secondary_en: en.secondary,
                secondary_az: az.secondary,
                images,
                created_at: dict.and_then(|d| d.created_at(slug)),
            });
        }
        records
    }
}

/// Folders are entries without file metadata and without an image extension.
fn is_folder_entry(entry: &StorageEntry) -> bool {
    entry.metadata.is_none() && !is_image(&entry.name)
}

/// Turn the root listing into one candidate per slug, in listing order.
fn group_candidates(
    root: &[StorageEntry],
    expanded: &mut HashMap<String, Vec<String>>,
    config: &ResolverConfig,
    warnings: &mut Vec<ResolveWarning>,
) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut by_slug: HashMap<String, usize> = HashMap::new();

    for entry in root {
        let images = if is_folder_entry(entry) {
            match expanded.remove(&entry.path) {
                Some(images) => images,
                None => continue,
            }
        } else if entry.is_file() && is_image(&entry.name) {
            vec![entry.path.clone()]
        } else {
            continue;
        };

        let parsed = parse_name(&entry.name);
        if !parsed.is_parseable() {
            debug!(name = %entry.name, "Skipping unparseable name");
            warnings.push(ResolveWarning::Unparseable {
                name: entry.name.clone(),
            });
            continue;
        }

        match by_slug.get(&parsed.slug) {
            Some(&idx) => match config.kind {
                ContentKind::Projects => candidates[idx].image_paths.extend(images),
                ContentKind::Team => {
                    debug!(name = %entry.name, slug = %parsed.slug, "Duplicate member, keeping first");
                }
            },
            None => {
                by_slug.insert(parsed.slug.clone(), candidates.len());
                candidates.push(Candidate {
                    parsed,
                    image_paths: images,
                });
            }
        }
    }

    for candidate in &mut candidates {
        candidate.image_paths.sort_by(|a, b| compare_image_names(a, b));
    }
    candidates
}

/// Newest first; undated records keep listing order after all dated ones.
fn sort_records(records: &mut [Record]) {
    records.sort_by(|a, b| match (a.created_at, b.created_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}
