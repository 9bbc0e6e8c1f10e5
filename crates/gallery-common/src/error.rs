//! Error types for the gallery crates and services.

use thiserror::Error;

/// Result type alias using GalleryError.
pub type GalleryResult<T> = Result<T, GalleryError>;

/// Primary error type for gallery operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GalleryError {
    // === Startup Errors ===
    #[error("Configuration error: {0}")]
    Configuration(String),

    // === Object Store Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Transient storage error: {0}")]
    Transient(String),

    #[error("Access denied: {0}")]
    Access(String),

    #[error("Object already exists: {0}")]
    Conflict(String),

    #[error("Failed to remove {} of the requested paths: {}", .failed.len(), .failed.join(", "))]
    PartialRemoval { failed: Vec<String> },

    // === Cache Errors ===
    #[error("Cache write failed: {0}")]
    CacheWrite(String),

    // === Request Errors ===
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GalleryError {
    /// Whether a caller may reasonably try the same operation again.
    ///
    /// Nothing in the resolver retries on its own; this only informs callers
    /// such as an admin "refresh" action.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GalleryError::Transient(_) | GalleryError::PartialRemoval { .. })
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            GalleryError::InvalidRequest(_) => 400,
            GalleryError::Access(_) => 403,
            GalleryError::NotFound(_) => 404,
            GalleryError::Conflict(_) => 409,

            GalleryError::Transient(_) | GalleryError::PartialRemoval { .. } => 502,

            _ => 500,
        }
    }
}

impl From<std::io::Error> for GalleryError {
    fn from(err: std::io::Error) -> Self {
        GalleryError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for GalleryError {
    fn from(err: serde_json::Error) -> Self {
        GalleryError::Internal(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_removal_lists_failed_paths() {
        let err = GalleryError::PartialRemoval {
            failed: vec!["portfolio/a.jpg".to_string(), "portfolio/b.jpg".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("2 of the requested paths"));
        assert!(msg.contains("portfolio/a.jpg, portfolio/b.jpg"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(GalleryError::Conflict("x".into()).http_status_code(), 409);
        assert_eq!(GalleryError::NotFound("x".into()).http_status_code(), 404);
        assert_eq!(GalleryError::Transient("x".into()).http_status_code(), 502);
        assert_eq!(GalleryError::Configuration("x".into()).http_status_code(), 500);
    }

    #[test]
    fn test_only_network_failures_are_retryable() {
        assert!(GalleryError::Transient("timeout".into()).is_retryable());
        assert!(!GalleryError::Configuration("missing key".into()).is_retryable());
        assert!(!GalleryError::Conflict("exists".into()).is_retryable());
    }
}
