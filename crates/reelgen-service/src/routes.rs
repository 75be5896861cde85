//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post, put};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{generate, health, jobs, profiles, usage, webhooks};
use crate::state::AppState;

/// Maximum concurrent requests for generation submissions.
/// Each submission fans out to the provider, so keep this modest.
const GENERATE_MAX_CONCURRENT_REQUESTS: usize = 25;

/// Maximum concurrent requests for general API endpoints.
const API_MAX_CONCURRENT_REQUESTS: usize = 100;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Generation (JWT auth, concurrency-limited)
/// - `POST /v1/generate/video` - Submit a text-to-video job
/// - `POST /v1/generate/audio` - Submit a text-to-audio job
///
/// ## Jobs (JWT auth)
/// - `GET /v1/jobs` - List the caller's jobs, newest first
/// - `GET /v1/jobs/:id` - Fetch a single job
/// - `POST /v1/jobs/:id/refresh` - Re-poll the provider for a queued job
///
/// ## Usage (JWT auth)
/// - `GET /v1/usage/today` - Today's counters and plan limits
///
/// ## Admin (API key auth)
/// - `PUT /v1/admin/profiles/:user_id` - Upsert a subscription profile
///
/// ## Webhooks (Signature verification)
/// - `POST /webhooks/provider` - Provider status-change pushes
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    // Build CORS layer
    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    // Submissions reserve quota and call the provider, so they carry a
    // tighter concurrency limit than reads.
    let generate_routes = Router::new()
        .route("/video", post(generate::generate_video))
        .route("/audio", post(generate::generate_audio))
        .layer(ConcurrencyLimitLayer::new(GENERATE_MAX_CONCURRENT_REQUESTS));

    let api_routes = Router::new()
        // Generation (with its own concurrency limit)
        .nest("/generate", generate_routes)
        // Jobs
        .route("/jobs", get(jobs::list_jobs))
        .route("/jobs/:id", get(jobs::get_job))
        .route("/jobs/:id/refresh", post(jobs::refresh_job))
        // Usage
        .route("/usage/today", get(usage::today_usage))
        // Admin (billing system writes profiles)
        .route("/admin/profiles/:user_id", put(profiles::upsert_profile))
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        // Health (public, no rate limit)
        .route("/health", get(health::health))
        // API v1 routes (rate limited)
        .nest("/v1", api_routes)
        // Webhooks (no rate limit - controlled by the provider)
        .route("/webhooks/provider", post(webhooks::provider_webhook))
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
