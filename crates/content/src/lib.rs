//! Content resolution for the gallery site.
//!
//! Turns a flat bucket listing into ordered, bilingual records:
//! - [`filename`]: naming conventions (`slug--label_2.jpg`) to structured names
//! - [`localization`]: merging names with optional JSON dictionaries
//! - [`resolver`]: listing, folder expansion, URL resolution and ordering
//! - [`featured`]: slicing resolved records for carousels and "show more"

pub mod featured;
pub mod filename;
pub mod localization;
pub mod resolver;

pub use featured::{featured_window, show_more, step_window, ShowMore};
pub use filename::{compare_image_names, is_image, parse_name, slugify, title_case, ParsedName};
pub use localization::{resolve_labels, LocalizationDict, LocalizedText, Localized, RecordOverride};
pub use resolver::{
    ContentKind, ContentResolver, Resolution, ResolveStage, ResolveWarning, ResolverConfig,
};
