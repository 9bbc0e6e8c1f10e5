//! Bucket listing entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One item returned by a non-recursive bucket listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEntry {
    /// Final path segment (file or folder name)
    pub name: String,
    /// True for virtual folders (common prefixes)
    pub is_folder: bool,
    /// Full object path inside the bucket, without a trailing slash
    pub path: String,
    /// File metadata; always `None` for folders
    pub metadata: Option<EntryMetadata>,
}

/// Metadata the provider reports for files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMetadata {
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

impl StorageEntry {
    pub fn file(prefix: &str, name: impl Into<String>, metadata: EntryMetadata) -> Self {
        let name = name.into();
        Self {
            path: join_path(prefix, &name),
            name,
            is_folder: false,
            metadata: Some(metadata),
        }
    }

    pub fn folder(prefix: &str, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: join_path(prefix, &name),
            name,
            is_folder: true,
            metadata: None,
        }
    }

    /// True when the provider reported this entry as a plain file.
    pub fn is_file(&self) -> bool {
        !self.is_folder && self.metadata.is_some()
    }
}

/// Join a prefix and a name into a bucket path; the root prefix is `""`.
pub fn join_path(prefix: &str, name: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "hero.jpg"), "hero.jpg");
        assert_eq!(join_path("portfolio/", "a.jpg"), "portfolio/a.jpg");
        assert_eq!(join_path("/team", "x.png"), "team/x.png");
    }

    #[test]
    fn test_folder_has_no_metadata() {
        let folder = StorageEntry::folder("portfolio", "zen-garden");
        assert!(folder.is_folder);
        assert!(!folder.is_file());
        assert_eq!(folder.path, "portfolio/zen-garden");
    }
}
