//! End-to-end resolution against the in-memory bucket.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use content::{ContentResolver, ResolveWarning, ResolverConfig};
use gallery_common::{GalleryError, Locale};
use storage::cache_store::DEFAULT_CACHE_MAX_BYTES;
use storage::url_cache::DEFAULT_MAX_ENTRIES;
use storage::{FileCacheStore, UrlCache, UrlResolver, DEFAULT_SIGNED_URL_TTL};
use test_utils::{
    portfolio_bucket, portfolio_bucket_with_titles, team_bucket, temp_cache_dir, FakeBucket,
};

fn public_resolver(bucket: Arc<FakeBucket>) -> ContentResolver {
    ContentResolver::new(bucket.clone(), UrlResolver::public(bucket))
}

#[tokio::test]
async fn test_projects_from_folder_and_root_file() {
    let bucket = Arc::new(portfolio_bucket_with_titles());
    let resolver = public_resolver(bucket);

    let resolution = resolver.resolve(&ResolverConfig::projects()).await;
    assert!(resolution.is_ready());
    assert!(resolution.warnings.is_empty());

    let records = &resolution.records;
    assert_eq!(records.len(), 2);

    // Newest first: zen-garden (2024) before oasis (2023).
    let zen = &records[0];
    assert_eq!(zen.slug, "zen-garden");
    assert_eq!(zen.title(Locale::En), "Modern Zen Garden");
    assert_eq!(zen.title(Locale::Az), "Müasir Zen bağı");
    assert_eq!(zen.secondary(Locale::En), "Private Residence");
    assert_eq!(zen.secondary(Locale::Az), "Şəxsi iqamətgah");
    assert_eq!(
        zen.images,
        vec![
            "https://cdn.test/portfolio/zen-garden/1.jpg",
            "https://cdn.test/portfolio/zen-garden/2.jpg",
            "https://cdn.test/portfolio/zen-garden/10.jpg",
        ]
    );
    assert_eq!(zen.created_at, Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).single());

    let oasis = &records[1];
    assert_eq!(oasis.slug, "oasis");
    assert_eq!(oasis.title(Locale::En), "Oasis");
    assert_eq!(oasis.secondary(Locale::En), "Acme");
    assert_eq!(oasis.secondary(Locale::Az), "Akme");
    assert_eq!(oasis.images, vec!["https://cdn.test/portfolio/oasis--acme_1.jpg"]);
}

#[tokio::test]
async fn test_missing_dictionary_uses_filenames() {
    let bucket = Arc::new(portfolio_bucket());
    let resolver = public_resolver(bucket);

    let resolution = resolver.resolve(&ResolverConfig::projects()).await;
    assert!(resolution.is_ready());
    assert!(resolution.warnings.is_empty());

    let slugs: Vec<_> = resolution.records.iter().map(|r| r.slug.as_str()).collect();
    // Undated records keep listing order.
    assert_eq!(slugs, vec!["oasis", "zen-garden"]);

    let zen = &resolution.records[1];
    assert_eq!(zen.title(Locale::Az), "Zen Garden");
    assert_eq!(zen.secondary(Locale::Az), "");
    assert!(zen.created_at.is_none());
}

#[tokio::test]
async fn test_broken_dictionary_is_a_warning() {
    let bucket = Arc::new(portfolio_bucket());
    bucket.insert("portfolio/titles.json", &b"{ not json"[..]);
    let resolver = public_resolver(bucket);

    let resolution = resolver.resolve(&ResolverConfig::projects()).await;
    assert!(resolution.is_ready());
    assert_eq!(resolution.records.len(), 2);
    assert!(matches!(
        resolution.warnings.as_slice(),
        [ResolveWarning::DictionaryUnavailable { path, .. }] if path == "portfolio/titles.json"
    ));
}

#[tokio::test]
async fn test_failed_folder_is_skipped() {
    let bucket = Arc::new(portfolio_bucket_with_titles());
    bucket.fail_listing("portfolio/zen-garden");
    let resolver = public_resolver(bucket);

    let resolution = resolver.resolve(&ResolverConfig::projects()).await;
    assert!(resolution.is_ready());

    let slugs: Vec<_> = resolution.records.iter().map(|r| r.slug.as_str()).collect();
    assert_eq!(slugs, vec!["oasis"]);
    assert!(matches!(
        resolution.warnings.as_slice(),
        [ResolveWarning::FolderUnavailable { folder, .. }] if folder == "portfolio/zen-garden"
    ));
}

#[tokio::test]
async fn test_folder_without_images_is_dropped() {
    let bucket = Arc::new(portfolio_bucket());
    bucket.insert("portfolio/drafts/readme.txt", &b"wip"[..]);
    let resolver = public_resolver(bucket);

    let resolution = resolver.resolve(&ResolverConfig::projects()).await;
    assert!(resolution.records.iter().all(|r| r.slug != "drafts"));
    assert_eq!(resolution.records.len(), 2);
}

#[tokio::test]
async fn test_root_failure_yields_empty_resolution() {
    let bucket = Arc::new(portfolio_bucket());
    bucket.fail_listing("portfolio");
    let resolver = public_resolver(bucket);

    let resolution = resolver.resolve(&ResolverConfig::projects()).await;
    assert!(!resolution.is_ready());
    assert!(resolution.records.is_empty());
    assert!(matches!(resolution.failure, Some(GalleryError::Transient(_))));
}

#[tokio::test]
async fn test_empty_root_is_not_found() {
    let resolver = public_resolver(Arc::new(FakeBucket::new()));

    let resolution = resolver.resolve(&ResolverConfig::team()).await;
    assert!(resolution.records.is_empty());
    assert!(matches!(resolution.failure, Some(GalleryError::NotFound(_))));
}

#[tokio::test]
async fn test_resolution_is_repeatable() {
    let bucket = Arc::new(portfolio_bucket_with_titles());
    let resolver = public_resolver(bucket);

    let first = resolver.resolve(&ResolverConfig::projects()).await;
    let second = resolver.resolve(&ResolverConfig::projects()).await;
    assert_eq!(first.records, second.records);
}

#[tokio::test]
async fn test_team_members() {
    let bucket = Arc::new(team_bucket());
    let resolver = public_resolver(bucket);

    let resolution = resolver.resolve(&ResolverConfig::team()).await;
    assert!(resolution.is_ready());

    let records = &resolution.records;
    assert_eq!(records.len(), 2);

    let aysel = &records[0];
    assert_eq!(aysel.slug, "aysel");
    assert_eq!(aysel.title(Locale::En), "Aysel");
    assert_eq!(aysel.secondary(Locale::En), "Founder & Lead Designer");
    assert_eq!(aysel.secondary(Locale::Az), "Təsisçi və baş dizayner");
    assert!(aysel.is_founder());

    let kamran = &records[1];
    assert_eq!(kamran.title(Locale::Az), "Kamran");
    assert_eq!(kamran.secondary(Locale::En), "Landscape Architect");
    assert_eq!(kamran.secondary(Locale::Az), "Landşaft memarı");
    assert_eq!(
        kamran.images,
        vec!["https://cdn.test/team/kamran--landscape-architect_2.png"]
    );
    assert!(!kamran.is_founder());
}

#[tokio::test]
async fn test_team_ignores_subfolders() {
    let bucket = Arc::new(team_bucket());
    bucket.insert("team/archive/old--member.jpg", &b"x"[..]);
    let resolver = public_resolver(bucket.clone());

    let resolution = resolver.resolve(&ResolverConfig::team()).await;
    assert_eq!(resolution.records.len(), 2);
    // Root listing only, no folder expansion.
    assert_eq!(bucket.list_calls(), 1);
}

#[tokio::test]
async fn test_signed_urls_come_from_cache_on_second_pass() {
    let dir = temp_cache_dir();
    let store = Arc::new(FileCacheStore::new(
        dir.path().join("urls.json"),
        DEFAULT_CACHE_MAX_BYTES,
    ));
    let cache = Arc::new(UrlCache::open(store, DEFAULT_SIGNED_URL_TTL, DEFAULT_MAX_ENTRIES).await);

    let bucket = Arc::new(portfolio_bucket_with_titles());
    let urls = UrlResolver::signed(bucket.clone(), Some(cache), DEFAULT_SIGNED_URL_TTL);
    let resolver = ContentResolver::new(bucket.clone(), urls);

    let first = resolver.resolve(&ResolverConfig::projects()).await;
    assert_eq!(bucket.signed_url_calls(), 4);
    assert!(first.records[0].images[0].starts_with("https://signed.test/"));

    let second = resolver.resolve(&ResolverConfig::projects()).await;
    assert_eq!(bucket.signed_url_calls(), 4);
    assert_eq!(first.records, second.records);
}

#[tokio::test]
async fn test_hero_prefers_webp() {
    let bucket = Arc::new(FakeBucket::with_files(["hero/hero.jpg", "hero/hero.webp"]));
    let resolver = public_resolver(bucket);
    assert_eq!(
        resolver.resolve_hero().await.as_deref(),
        Some("https://cdn.test/hero/hero.webp")
    );

    let bucket = Arc::new(FakeBucket::with_files(["hero/hero.jpg"]));
    let resolver = public_resolver(bucket);
    assert_eq!(
        resolver.resolve_hero().await.as_deref(),
        Some("https://cdn.test/hero/hero.jpg")
    );

    let resolver = public_resolver(Arc::new(FakeBucket::new()));
    assert!(resolver.resolve_hero().await.is_none());
}

#[tokio::test]
async fn test_unsignable_images_are_dropped() {
    let bucket = Arc::new(portfolio_bucket());
    bucket.fail_signing("portfolio/zen-garden/2.jpg");
    bucket.fail_signing("portfolio/oasis--acme_1.jpg");
    let urls = UrlResolver::signed(bucket.clone(), None, DEFAULT_SIGNED_URL_TTL);
    let resolver = ContentResolver::new(bucket, urls);

    let resolution = resolver.resolve(&ResolverConfig::projects()).await;
    assert!(resolution.is_ready());

    // oasis had a single image and disappears; zen-garden keeps the rest.
    assert_eq!(resolution.records.len(), 1);
    let zen = &resolution.records[0];
    assert_eq!(zen.slug, "zen-garden");
    assert_eq!(zen.images.len(), 2);
    assert!(zen.images[0].contains("zen-garden/1.jpg"));
    assert!(zen.images[1].contains("zen-garden/10.jpg"));

    let mut unavailable: Vec<&str> = resolution
        .warnings
        .iter()
        .filter_map(|w| match w {
            ResolveWarning::ImageUnavailable { path, .. } => Some(path.as_str()),
            _ => None,
        })
        .collect();
    unavailable.sort();
    assert_eq!(
        unavailable,
        vec!["portfolio/oasis--acme_1.jpg", "portfolio/zen-garden/2.jpg"]
    );
}

#[tokio::test]
async fn test_large_folder_keeps_signed_cache_enabled() {
    let dir = temp_cache_dir();
    let store = Arc::new(FileCacheStore::new(
        dir.path().join("urls.json"),
        DEFAULT_CACHE_MAX_BYTES,
    ));
    let cache = Arc::new(UrlCache::open(store, DEFAULT_SIGNED_URL_TTL, DEFAULT_MAX_ENTRIES).await);

    let paths: Vec<String> = (1..=40).map(|i| format!("portfolio/zen-garden/{i}.jpg")).collect();
    let bucket = Arc::new(FakeBucket::with_files(&paths));
    let urls = UrlResolver::signed(bucket.clone(), Some(cache.clone()), DEFAULT_SIGNED_URL_TTL);
    let resolver = ContentResolver::new(bucket.clone(), urls);

    let first = resolver.resolve(&ResolverConfig::projects()).await;
    assert_eq!(first.records.len(), 1);
    assert_eq!(first.records[0].images.len(), 40);
    assert!(!cache.is_degraded());
    assert_eq!(cache.stats().write_failures.load(Ordering::Relaxed), 0);

    let second = resolver.resolve(&ResolverConfig::projects()).await;
    assert_eq!(bucket.signed_url_calls(), 40);
    assert_eq!(first.records, second.records);
}
