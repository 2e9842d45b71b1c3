//! API route configuration.

use crate::api::handlers::{link_stats_handler, redirect_handler, stats_handler};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Routes open to any caller.
///
/// # Endpoints
///
/// - `GET /links/{hash}` - Redirect to the target URL and record a visit
/// - `GET /stats`        - Clicks per day or month over a date range
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/links/{hash}", get(redirect_handler))
        .route("/stats", get(stats_handler))
}

/// Routes nested under `/admin`, meant to sit behind
/// [`crate::api::middleware::auth::layer`].
///
/// # Endpoints
///
/// - `GET /stats`       - Same as the public grouped statistics
/// - `GET /stats/links` - Per-link click summary
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats_handler))
        .route("/stats/links", get(link_stats_handler))
}
