//! HTTP handlers.
//!
//! - [`content`]: projects, team and hero for the public site
//! - [`admin`]: listing, uploading and deleting bucket files
//! - [`health`]: liveness and cache statistics

pub mod admin;
pub mod content;
pub mod health;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use gallery_common::{GalleryError, Locale};

pub use admin::{delete_file_handler, list_files_handler, upload_file_handler};
pub use content::{hero_handler, projects_handler, team_handler};
pub use health::health_handler;

/// Error body returned by every handler.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub retryable: bool,
}

/// A [`GalleryError`] rendered as JSON with its HTTP status.
#[derive(Debug)]
pub struct ApiError(pub GalleryError);

impl From<GalleryError> for ApiError {
    fn from(err: GalleryError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse {
            error: self.0.to_string(),
            retryable: self.0.is_retryable(),
        };
        (status, Json(body)).into_response()
    }
}

/// Parse an optional `lang` query value; absent means the site default.
pub(crate) fn parse_locale(lang: Option<&str>) -> Result<Locale, ApiError> {
    match lang {
        None => Ok(Locale::default()),
        Some(code) if code.trim().is_empty() => Ok(Locale::default()),
        Some(code) => code
            .parse()
            .map_err(|e: gallery_common::locale::UnknownLocale| {
                ApiError(GalleryError::InvalidRequest(e.to_string()))
            }),
    }
}
