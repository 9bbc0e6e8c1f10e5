//! Bilingual labels from filenames and optional dictionary files.
//!
//! `portfolio/titles.json` and `team/team.json` share one shape:
//!
//! ```json
//! {
//!   "projects": { "<slug>": { "title": {"en": "..", "az": ".."}, "client": {..}, "createdAt": ".." } },
//!   "clients":  { "<label>": { "az": ".." } }
//! }
//! ```
//!
//! The team file says `members`/`name`/`role`/`roles` instead. Every level
//! is optional.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use gallery_common::{CreatedAt, Locale};

use crate::filename::{slugify, ParsedName};

/// Text in both site locales; either side may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "LocalizedTextRepr")]
pub struct LocalizedText {
    pub en: Option<String>,
    pub az: Option<String>,
}

/// Editors sometimes write a bare string where a locale map is expected.
#[derive(Deserialize)]
#[serde(untagged)]
enum LocalizedTextRepr {
    Plain(String),
    Map {
        #[serde(default)]
        en: Option<String>,
        #[serde(default)]
        az: Option<String>,
    },
}

impl From<LocalizedTextRepr> for LocalizedText {
    fn from(repr: LocalizedTextRepr) -> Self {
        match repr {
            LocalizedTextRepr::Plain(text) => LocalizedText {
                en: Some(text.clone()),
                az: Some(text),
            },
            LocalizedTextRepr::Map { en, az } => LocalizedText { en, az },
        }
    }
}

impl LocalizedText {
    /// Non-blank text for `locale`.
    pub fn get(&self, locale: Locale) -> Option<&str> {
        let text = match locale {
            Locale::En => self.en.as_deref(),
            Locale::Az => self.az.as_deref(),
        };
        text.map(str::trim).filter(|t| !t.is_empty())
    }
}

/// Per-slug overrides for one record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordOverride {
    #[serde(default, alias = "name")]
    pub title: Option<LocalizedText>,
    #[serde(default, alias = "client", alias = "role")]
    pub secondary: Option<LocalizedText>,
    #[serde(default, rename = "createdAt", alias = "created_at")]
    pub created_at: Option<CreatedAt>,
}

/// Parsed dictionary file. An absent file is the empty dictionary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalizationDict {
    #[serde(default, alias = "projects", alias = "members")]
    pub records: HashMap<String, RecordOverride>,
    /// Secondary-label translations shared across records
    #[serde(default, alias = "clients", alias = "roles")]
    pub labels: HashMap<String, LocalizedText>,
}

impl LocalizationDict {
    pub fn from_json(raw: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(raw)
    }

    /// Overrides for `slug`. Keys written in display form ("Zen Garden")
    /// match their slug.
    pub fn record(&self, slug: &str) -> Option<&RecordOverride> {
        self.records
            .get(slug)
            .or_else(|| by_slug(&self.records, slug))
    }

    /// Translation entry for a client or role label.
    pub fn label(&self, label: &str) -> Option<&LocalizedText> {
        if label.is_empty() {
            return None;
        }
        self.labels
            .get(label)
            .or_else(|| by_slug(&self.labels, &slugify(label)))
    }

    pub fn created_at(&self, slug: &str) -> Option<DateTime<Utc>> {
        self.record(slug)?.created_at.as_ref()?.to_datetime()
    }
}

/// Entry whose key slugifies to `slug`. When several keys collide the
/// smallest key wins, so the pick does not depend on map iteration order.
fn by_slug<'a, T>(map: &'a HashMap<String, T>, slug: &str) -> Option<&'a T> {
    let mut matches: Vec<(&String, &T)> =
        map.iter().filter(|(key, _)| slugify(key) == slug).collect();
    matches.sort_by(|a, b| a.0.cmp(b.0));
    if matches.len() > 1 {
        debug!(slug, key = %matches[0].0, "Several dictionary keys share a slug");
    }
    matches.first().map(|(_, value)| *value)
}

/// Final display strings for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localized {
    pub title: String,
    pub secondary: String,
}

/// Merge filename-derived labels with dictionary overrides.
///
/// Title: record override in `locale`, then in the other locale, then the
/// filename title. Secondary: record override in `locale`, then the shared
/// label table, then the record override in the other locale, then the
/// filename label.
pub fn resolve_labels(
    slug: &str,
    parsed: &ParsedName,
    dict: Option<&LocalizationDict>,
    locale: Locale,
) -> Localized {
    let record = dict.and_then(|d| d.record(slug));
    let title_override = record.and_then(|r| r.title.as_ref());
    let secondary_override = record.and_then(|r| r.secondary.as_ref());

    let title = title_override
        .and_then(|t| t.get(locale).or_else(|| t.get(locale.other())))
        .map(str::to_string)
        .unwrap_or_else(|| parsed.primary_label.clone());

    let from_labels = || {
        let dict = dict?;
        let candidates = [
            secondary_override.and_then(|s| s.get(locale.other())),
            Some(parsed.secondary_label.as_str()),
        ];
        candidates
            .into_iter()
            .flatten()
            .find_map(|candidate| dict.label(candidate)?.get(locale))
    };

    let secondary = secondary_override
        .and_then(|s| s.get(locale))
        .or_else(from_labels)
        .or_else(|| secondary_override.and_then(|s| s.get(locale.other())))
        .map(str::to_string)
        .unwrap_or_else(|| parsed.secondary_label.clone());

    Localized { title, secondary }
}
