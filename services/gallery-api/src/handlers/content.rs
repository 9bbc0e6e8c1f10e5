//! Public content endpoints.

use axum::{
    extract::{Extension, Query},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use content::{featured_window, Resolution, ResolverConfig};
use gallery_common::{Locale, Record};

use super::{parse_locale, ApiError};
use crate::state::AppState;

/// Cards in the featured carousel when the client does not ask.
pub const DEFAULT_FEATURED_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Ready,
    /// Root listing failed; the site shows a "coming soon" state
    Unavailable,
}

impl ContentStatus {
    fn of(resolution: &Resolution) -> Self {
        if resolution.is_ready() {
            ContentStatus::Ready
        } else {
            ContentStatus::Unavailable
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ProjectView {
    pub slug: String,
    pub title: String,
    pub client: String,
    pub cover: Option<String>,
    pub images: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl ProjectView {
    fn new(record: &Record, locale: Locale) -> Self {
        Self {
            slug: record.slug.clone(),
            title: record.title(locale).to_string(),
            client: record.secondary(locale).to_string(),
            cover: record.cover().map(str::to_string),
            images: record.images.clone(),
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectsResponse {
    pub status: ContentStatus,
    pub lang: Locale,
    pub projects: Vec<ProjectView>,
    pub featured: Vec<ProjectView>,
    pub warnings: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberView {
    pub slug: String,
    pub name: String,
    pub role: String,
    pub photo: Option<String>,
}

impl MemberView {
    fn new(record: &Record, locale: Locale) -> Self {
        Self {
            slug: record.slug.clone(),
            name: record.title(locale).to_string(),
            role: record.secondary(locale).to_string(),
            photo: record.cover().map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub status: ContentStatus,
    pub lang: Locale,
    pub founders: Vec<MemberView>,
    pub members: Vec<MemberView>,
}

#[derive(Debug, Serialize)]
pub struct HeroResponse {
    pub url: Option<String>,
}

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ProjectsQuery {
    pub lang: Option<String>,
    pub featured_start: Option<usize>,
    pub featured_size: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TeamQuery {
    pub lang: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/projects - Resolved projects, newest first, plus the carousel window
#[instrument(skip(state))]
pub async fn projects_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<ProjectsQuery>,
) -> Result<Json<ProjectsResponse>, ApiError> {
    let locale = parse_locale(query.lang.as_deref())?;

    let resolution = state.resolver.resolve(&ResolverConfig::projects()).await;
    if let Some(err) = &resolution.failure {
        warn!(error = %err, "Projects unavailable");
    }

    let projects: Vec<ProjectView> = resolution
        .records
        .iter()
        .map(|record| ProjectView::new(record, locale))
        .collect();
    let featured = featured_window(
        &projects,
        query.featured_start.unwrap_or(0),
        query.featured_size.unwrap_or(DEFAULT_FEATURED_SIZE),
    );

    info!(projects = projects.len(), lang = %locale, "Projects request");

    Ok(Json(ProjectsResponse {
        status: ContentStatus::of(&resolution),
        lang: locale,
        projects,
        featured,
        warnings: resolution.warnings.len(),
    }))
}

/// GET /api/team - Team members, founders first
#[instrument(skip(state))]
pub async fn team_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<TeamQuery>,
) -> Result<Json<TeamResponse>, ApiError> {
    let locale = parse_locale(query.lang.as_deref())?;

    let resolution = state.resolver.resolve(&ResolverConfig::team()).await;
    if let Some(err) = &resolution.failure {
        warn!(error = %err, "Team unavailable");
    }

    let (founders, members): (Vec<&Record>, Vec<&Record>) =
        resolution.records.iter().partition(|r| r.is_founder());

    Ok(Json(TeamResponse {
        status: ContentStatus::of(&resolution),
        lang: locale,
        founders: founders.into_iter().map(|r| MemberView::new(r, locale)).collect(),
        members: members.into_iter().map(|r| MemberView::new(r, locale)).collect(),
    }))
}

/// GET /api/hero - Hero background URL, if one is uploaded
pub async fn hero_handler(Extension(state): Extension<Arc<AppState>>) -> Json<HeroResponse> {
    Json(HeroResponse {
        url: state.resolver.resolve_hero().await,
    })
}
