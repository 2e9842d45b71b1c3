//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /links/{hash}`       - Short link redirect (public)
//! - `GET /stats`              - Grouped click statistics (public)
//! - `GET /health`             - Health check: DB, event bus, click publisher (public)
//! - `GET /admin/stats`        - Grouped click statistics (admin token required)
//! - `GET /admin/stats/links`  - Per-link click summary (admin token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Authentication** - Bearer admin token on `/admin/*`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let admin_router = api::routes::admin_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let router = Router::new()
        .merge(api::routes::public_routes())
        .route("/health", get(health_handler))
        .nest("/admin", admin_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
