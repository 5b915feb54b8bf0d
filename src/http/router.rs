//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Schedule groups
        .route("/groups", post(handlers::create_group))
        .route("/groups", get(handlers::list_groups))
        .route("/groups/{group_id}/timetable", get(handlers::get_timetable))
        .route("/groups/{group_id}/generate", post(handlers::generate))
        .route("/groups/{group_id}/confirm", post(handlers::confirm_group))
        // Drafts
        .route("/groups/{group_id}/drafts", post(handlers::create_draft))
        .route("/groups/{group_id}/drafts", get(handlers::list_drafts))
        // Meetings
        .route(
            "/meetings/{meeting_id}/validate",
            post(handlers::validate_meeting),
        )
        .route("/meetings/{meeting_id}", put(handlers::update_meeting))
        .route("/meetings", put(handlers::update_meeting_by_locator))
        .route(
            "/meetings/{meeting_id}/alternatives",
            get(handlers::get_alternatives),
        )
        // Reference timetables
        .route("/references", post(handlers::upload_references));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        // Allow large catalog payloads during generation requests.
        .layer(DefaultBodyLimit::max(16 * 1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
