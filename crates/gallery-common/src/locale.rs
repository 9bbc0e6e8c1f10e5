//! Display locales supported by the site.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A display locale.
///
/// Filenames in the bucket are written in English, so `En` is also the
/// locale that filename-derived labels are assumed to be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    #[default]
    Az,
}

impl Locale {
    /// Locale of the text encoded in object names.
    pub const FILENAME: Locale = Locale::En;

    /// The other supported locale.
    pub fn other(self) -> Locale {
        match self {
            Locale::En => Locale::Az,
            Locale::Az => Locale::En,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Az => "az",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unsupported locale: {0}")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "az" => Ok(Locale::Az),
            other => Err(UnknownLocale(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("az".parse::<Locale>().unwrap(), Locale::Az);
        assert!("ru".parse::<Locale>().is_err());
    }

    #[test]
    fn test_other() {
        assert_eq!(Locale::En.other(), Locale::Az);
        assert_eq!(Locale::Az.other(), Locale::En);
    }
}
