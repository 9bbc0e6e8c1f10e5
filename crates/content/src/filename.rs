//! Object naming conventions.
//!
//! Metadata is encoded in object names:
//! - `team/aysel--lead-designer.jpg` -> slug `aysel`, label `Lead Designer`
//! - `portfolio/oasis--acme_2.jpg` -> slug `oasis`, label `Acme`
//! - `portfolio/zen-garden/1.jpg` -> slug `zen-garden` (positional image)
//!
//! Parsing is total: malformed names degrade to an empty slug, which
//! callers treat as unparseable.

use std::cmp::Ordering;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Extensions treated as images, compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "webp", "avif", "gif"];

/// Separates the slug from the secondary label.
pub const LABEL_DELIMITER: &str = "--";

/// Structured form of an object or folder name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedName {
    /// Lowercase, hyphenated key used for dictionary lookups
    pub slug: String,
    /// Human-readable title derived from the name
    pub primary_label: String,
    /// Client or role; empty when the name has no delimiter
    pub secondary_label: String,
}

impl ParsedName {
    pub fn is_parseable(&self) -> bool {
        !self.slug.is_empty()
    }
}

/// Recognized image extension of `name`, lowercased.
pub fn image_extension(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || stem.ends_with('/') {
        return None;
    }
    let ext = ext.to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

pub fn is_image(name: &str) -> bool {
    image_extension(name).is_some()
}

fn strip_image_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if is_image(name) => stem,
        _ => name,
    }
}

/// Parse a name or `/`-joined path.
pub fn parse_name(input: &str) -> ParsedName {
    let segments: Vec<&str> = input.split('/').filter(|s| !s.is_empty()).collect();
    let Some((last, parents)) = segments.split_last() else {
        return ParsedName::default();
    };

    let mut stem = strip_image_extension(last);

    // `portfolio/zen-garden/1.jpg` names the project through its folder.
    if !stem.contains(LABEL_DELIMITER) && is_positional(stem) {
        if let Some(parent) = parents.last() {
            stem = *parent;
        }
    }

    let (left, right) = match stem.split_once(LABEL_DELIMITER) {
        Some((left, right)) => (left, Some(right)),
        None => (stem, None),
    };

    ParsedName {
        slug: slugify(left),
        primary_label: title_case(&left.to_lowercase()),
        secondary_label: right
            .map(|r| title_case(strip_numeric_suffix(r)))
            .unwrap_or_default(),
    }
}

/// True for names like `1`, `02` or `3_1` that only carry a position.
fn is_positional(stem: &str) -> bool {
    stem.chars().any(|c| c.is_ascii_digit())
        && stem
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '-' | '_' | ' '))
}

/// Drop a trailing `_<digits>` or `-<digits>` disambiguator.
fn strip_numeric_suffix(s: &str) -> &str {
    match s.rfind(['_', '-']) {
        Some(idx) if idx > 0 => {
            let digits = &s[idx + 1..];
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                &s[..idx]
            } else {
                s
            }
        }
        _ => s,
    }
}

/// Lowercase, diacritic-free, hyphen-separated identifier.
pub fn slugify(s: &str) -> String {
    let mut slug = String::with_capacity(s.len());
    let mut pending_hyphen = false;

    for c in fold_diacritics(s).flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

fn fold_diacritics(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().filter(|c| !is_combining_mark(*c)).map(|c| match c {
        // No decomposition exists for these Azerbaijani letters.
        'ə' | 'Ə' => 'e',
        'ı' => 'i',
        other => other,
    })
}

/// Capitalize each word, splitting on whitespace, `-` and `_`.
pub fn title_case(s: &str) -> String {
    s.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Leading digits of the final path segment, e.g. `10` for `10-terrace.jpg`.
pub fn leading_number(name: &str) -> Option<u64> {
    let file = name.rsplit('/').next().unwrap_or(name);
    let digits: String = file.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

/// Image order within a record: numbered files ascending, then the rest
/// lexicographically.
pub fn compare_image_names(a: &str, b: &str) -> Ordering {
    match (leading_number(a), leading_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimited_name_with_suffix() {
        let parsed = parse_name("slug--label_2.jpg");
        assert_eq!(parsed.slug, "slug");
        assert_eq!(parsed.primary_label, "Slug");
        assert_eq!(parsed.secondary_label, "Label");

        let parsed = parse_name("oasis--acme-12.webp");
        assert_eq!(parsed.slug, "oasis");
        assert_eq!(parsed.secondary_label, "Acme");
    }

    #[test]
    fn test_name_without_delimiter() {
        for name in ["zen-garden.jpg", "city_park.PNG", "backyard oasis.avif"] {
            let parsed = parse_name(name);
            assert!(parsed.secondary_label.is_empty(), "{name}");
            assert_eq!(parsed.primary_label, title_case(&parsed.slug), "{name}");
        }
    }

    #[test]
    fn test_team_path() {
        let parsed = parse_name("team/aysel--lead-designer.jpg");
        assert_eq!(parsed.slug, "aysel");
        assert_eq!(parsed.primary_label, "Aysel");
        assert_eq!(parsed.secondary_label, "Lead Designer");
    }

    #[test]
    fn test_positional_image_uses_folder() {
        let parsed = parse_name("portfolio/zen-garden/1.jpg");
        assert_eq!(parsed.slug, "zen-garden");
        assert_eq!(parsed.primary_label, "Zen Garden");
        assert!(parsed.secondary_label.is_empty());
    }

    #[test]
    fn test_folder_name() {
        let parsed = parse_name("Zen_Garden--Private-Residence");
        assert_eq!(parsed.slug, "zen-garden");
        assert_eq!(parsed.primary_label, "Zen Garden");
        assert_eq!(parsed.secondary_label, "Private Residence");
    }

    #[test]
    fn test_only_first_delimiter_splits() {
        let parsed = parse_name("a--b--c.jpg");
        assert_eq!(parsed.slug, "a");
        assert_eq!(parsed.secondary_label, "B C");
    }

    #[test]
    fn test_diacritics_are_folded() {
        assert_eq!(slugify("Şəhər Parkı"), "seher-parki");
        assert_eq!(slugify("Göygöl  Bağı!!"), "goygol-bagi");
        assert_eq!(slugify("İçərişəhər"), "iceriseher");
    }

    #[test]
    fn test_slug_trims_and_collapses() {
        assert_eq!(slugify("--Modern   Garden__"), "modern-garden");
        assert_eq!(slugify("a...b"), "a-b");
    }

    #[test]
    fn test_degenerate_names() {
        assert!(!parse_name("").is_parseable());
        assert!(!parse_name("--.jpg").is_parseable());
        assert!(!parse_name("___.png").is_parseable());
        assert!(!parse_name("/").is_parseable());
    }

    #[test]
    fn test_unrecognized_extension_is_kept() {
        let parsed = parse_name("notes.txt");
        assert_eq!(parsed.slug, "notes-txt");
        assert!(!is_image("notes.txt"));
    }

    #[test]
    fn test_is_image() {
        assert!(is_image("a.JPG"));
        assert!(is_image("a.jpeg"));
        assert!(is_image("dir/a.avif"));
        assert!(!is_image("titles.json"));
        assert!(!is_image(".jpg"));
        assert!(!is_image("jpg"));
    }

    #[test]
    fn test_image_ordering() {
        let mut names = vec!["10.jpg", "cover.jpg", "2.jpg", "1.jpg", "after.png"];
        names.sort_by(|a, b| compare_image_names(a, b));
        assert_eq!(names, vec!["1.jpg", "2.jpg", "10.jpg", "after.png", "cover.jpg"]);
    }

    #[test]
    fn test_leading_number_uses_file_segment() {
        assert_eq!(leading_number("portfolio/2024-garden/7_a.jpg"), Some(7));
        assert_eq!(leading_number("portfolio/garden/a7.jpg"), None);
    }
}
