//! Gallery API service library.
//!
//! Exposes the router and its modules so the binary and the integration
//! tests build the same application.

pub mod config;
pub mod handlers;
pub mod state;

use axum::{
    extract::Extension,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Build the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_handler))
        // Public content
        .route("/api/projects", get(handlers::projects_handler))
        .route("/api/team", get(handlers::team_handler))
        .route("/api/hero", get(handlers::hero_handler))
        // Admin
        .route(
            "/admin/files",
            get(handlers::list_files_handler)
                .post(handlers::upload_file_handler)
                .delete(handlers::delete_file_handler),
        )
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
