//! Display-ready records produced by content resolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Locale;

/// A resolved project or team member.
///
/// `images` is never empty for a record handed to presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub slug: String,
    pub title_en: String,
    pub title_az: String,
    pub secondary_en: String,
    pub secondary_az: String,
    pub images: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Record {
    pub fn title(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.title_en,
            Locale::Az => &self.title_az,
        }
    }

    pub fn secondary(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.secondary_en,
            Locale::Az => &self.secondary_az,
        }
    }

    /// First image, used as the card cover.
    pub fn cover(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Team members whose role marks them as a founder, in either locale.
    pub fn is_founder(&self) -> bool {
        self.secondary_en.to_lowercase().contains("founder")
            || self.secondary_az.to_lowercase().contains("təsisçi")
    }
}
