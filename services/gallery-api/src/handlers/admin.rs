//! Admin endpoints for managing bucket files.
//!
//! Uploads never overwrite: every file gets a fresh `{prefix}/{uuid}.{ext}`
//! name. Deleting a file also drops its cached signed URL.

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use gallery_common::{GalleryError, StorageEntry};
use storage::StoragePath;

use super::ApiError;
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct FileView {
    pub name: String,
    pub path: String,
    pub is_folder: bool,
    pub size: Option<u64>,
    pub last_modified: Option<DateTime<Utc>>,
    /// Only for files; absent when the URL could not be produced
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FilesResponse {
    pub prefix: String,
    pub files: Vec<FileView>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub path: String,
    pub url: Option<String>,
}

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub prefix: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    #[serde(default)]
    pub prefix: String,
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub path: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /admin/files?prefix= - One level of the bucket with URLs for files
#[instrument(skip(state))]
pub async fn list_files_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<FilesResponse>, ApiError> {
    let prefix = StoragePath::sanitize_prefix(&query.prefix)?;

    let entries = match state.resolver.bucket().list(&prefix).await {
        Ok(entries) => entries,
        // An empty folder simply has nothing in it.
        Err(GalleryError::NotFound(_)) => Vec::new(),
        Err(e) => {
            error!(prefix = %prefix, error = %e, "Failed to list files");
            return Err(e.into());
        }
    };

    let mut files = Vec::with_capacity(entries.len());
    for entry in entries {
        let url = file_url(&state, &entry).await;
        files.push(FileView {
            size: entry.metadata.as_ref().map(|m| m.size),
            last_modified: entry.metadata.as_ref().and_then(|m| m.last_modified),
            name: entry.name,
            path: entry.path,
            is_folder: entry.is_folder,
            url,
        });
    }

    Ok(Json(FilesResponse { prefix, files }))
}

/// POST /admin/files?prefix=&filename= - Store the raw request body
#[instrument(skip(state, body), fields(bytes = body.len()))]
pub async fn upload_file_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let prefix = StoragePath::sanitize_prefix(&query.prefix)?;
    if body.is_empty() {
        return Err(GalleryError::InvalidRequest("empty upload".to_string()).into());
    }

    let path = StoragePath::upload_name(&prefix, &query.filename);
    let path = state.resolver.bucket().upload(&path, body, false).await?;
    info!(path = %path, filename = %query.filename, "File uploaded");

    let url = match state.resolver.urls().resolve(&path).await {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(path = %path, error = %e, "Uploaded file has no URL yet");
            None
        }
    };

    Ok((StatusCode::CREATED, Json(UploadResponse { path, url })))
}

/// DELETE /admin/files?path= - Remove one exact path
#[instrument(skip(state))]
pub async fn delete_file_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, ApiError> {
    let path = query.path.trim().trim_matches('/').to_string();
    if path.is_empty() || path.split('/').any(|s| s == "..") {
        return Err(GalleryError::InvalidRequest(format!("invalid path: {}", query.path)).into());
    }

    let paths = vec![path];
    let result = state.resolver.bucket().remove(&paths).await;
    // Whatever was removed must not be served from the cache again.
    state.resolver.urls().invalidate(&paths).await;

    match result {
        Ok(()) => {
            info!(path = %paths[0], "File deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => {
            error!(path = %paths[0], error = %e, "Failed to delete file");
            Err(e.into())
        }
    }
}

async fn file_url(state: &AppState, entry: &StorageEntry) -> Option<String> {
    if !entry.is_file() {
        return None;
    }
    match state.resolver.urls().resolve(&entry.path).await {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(path = %entry.path, error = %e, "No URL for file");
            None
        }
    }
}
