//! Common types and utilities shared across the gallery crates and services.

pub mod entry;
pub mod error;
pub mod locale;
pub mod record;
pub mod time;

pub use entry::{join_path, EntryMetadata, StorageEntry};
pub use error::{GalleryError, GalleryResult};
pub use locale::Locale;
pub use record::Record;
pub use time::{parse_timestamp, CreatedAt};
