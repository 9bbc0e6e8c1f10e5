//! Path builder for the bucket layout the site reads.

use uuid::Uuid;

use gallery_common::{join_path, GalleryError, GalleryResult};

/// Path builder for consistent storage layout.
pub struct StoragePath;

impl StoragePath {
    /// Team portraits: team/{name}--{role}[_n].{ext}
    pub const TEAM: &'static str = "team";

    /// Projects: portfolio/{slug}/{n}.{ext} or portfolio/{slug}--{client}[_n].{ext}
    pub const PORTFOLIO: &'static str = "portfolio";

    /// Hero background images.
    pub const HERO: &'static str = "hero";

    /// Hero candidates, most preferred first.
    pub const HERO_CANDIDATES: [&'static str; 2] = ["hero.webp", "hero.jpg"];

    /// Per-project title overrides.
    pub fn project_titles() -> String {
        join_path(Self::PORTFOLIO, "titles.json")
    }

    /// Per-member name/role overrides.
    pub fn team_dictionary() -> String {
        join_path(Self::TEAM, "team.json")
    }

    /// Build a fresh, collision-free path for an uploaded file.
    /// Format: {prefix}/{uuid}.{ext}
    pub fn upload_name(prefix: &str, original_filename: &str) -> String {
        let ext = extension_of(original_filename);
        join_path(prefix, &format!("{}.{}", Uuid::new_v4(), ext))
    }

    /// Normalize an operator-supplied prefix, rejecting traversal.
    pub fn sanitize_prefix(prefix: &str) -> GalleryResult<String> {
        let trimmed = prefix.trim().trim_matches('/');
        if trimmed
            .split('/')
            .any(|segment| segment == ".." || segment == "." || (segment.is_empty() && !trimmed.is_empty()))
        {
            return Err(GalleryError::InvalidRequest(format!(
                "invalid prefix: {}",
                prefix
            )));
        }
        Ok(trimmed.to_string())
    }
}

/// Lowercased extension of a filename, or `bin` when it has none.
fn extension_of(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_ascii_lowercase(),
        _ => "bin".to_string(),
    }
}
