//! Common test fixtures for gallery tests.
//!
//! Bucket layouts follow the production conventions:
//! `portfolio/<slug>/<n>.<ext>`, `portfolio/<slug>--<client>[_n].<ext>`,
//! `team/<name>--<role>[_n].<ext>` and the optional JSON dictionaries.

use crate::FakeBucket;

/// Bytes stored for every fixture image. Content is never inspected.
pub const PLACEHOLDER_IMAGE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Dictionary overriding one project title and supplying a client translation.
pub const TITLES_JSON: &str = r#"{
    "projects": {
        "zen-garden": {
            "title": { "en": "Modern Zen Garden", "az": "Müasir Zen bağı" },
            "client": { "en": "Private Residence" },
            "createdAt": "2024-05-01"
        },
        "oasis": {
            "createdAt": "2023-09-12T10:00:00Z"
        }
    },
    "clients": {
        "Private Residence": { "az": "Şəxsi iqamətgah" },
        "Acme": { "az": "Akme" }
    }
}"#;

/// Team dictionary using the `members`/`name`/`role` vocabulary.
pub const TEAM_JSON: &str = r#"{
    "members": {
        "aysel": {
            "name": { "az": "Aysel" },
            "role": { "en": "Founder & Lead Designer", "az": "Təsisçi və baş dizayner" }
        }
    },
    "roles": {
        "Landscape Architect": { "az": "Landşaft memarı" }
    }
}"#;

/// Bucket paths for the folder + root-file portfolio scenario.
pub const PORTFOLIO_PATHS: [&str; 4] = [
    "portfolio/zen-garden/1.jpg",
    "portfolio/zen-garden/2.jpg",
    "portfolio/zen-garden/10.jpg",
    "portfolio/oasis--acme_1.jpg",
];

/// Bucket paths for the team section.
pub const TEAM_PATHS: [&str; 3] = [
    "team/aysel--founder.jpg",
    "team/kamran--landscape-architect_2.png",
    "team/notes.txt",
];

/// Portfolio with one folder-backed project and one single-image project.
pub fn portfolio_bucket() -> FakeBucket {
    FakeBucket::with_files(PORTFOLIO_PATHS)
}

/// Portfolio plus its `titles.json`.
pub fn portfolio_bucket_with_titles() -> FakeBucket {
    let bucket = portfolio_bucket();
    bucket.insert("portfolio/titles.json", TITLES_JSON.as_bytes().to_vec());
    bucket
}

/// Team folder plus its `team.json`.
pub fn team_bucket() -> FakeBucket {
    let bucket = FakeBucket::with_files(TEAM_PATHS);
    bucket.insert("team/team.json", TEAM_JSON.as_bytes().to_vec());
    bucket
}

/// Scratch directory for file-backed caches.
pub fn temp_cache_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("gallery-cache-")
        .tempdir()
        .expect("failed to create temp dir")
}
