//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short hash to its target URL.
///
/// # Endpoint
///
/// `GET /links/{hash}`
///
/// # Click Tracking
///
/// After the hash resolves, a visited-event is handed to the click publisher
/// without waiting. A full queue or an overloaded bus drops the click; the
/// redirect is returned either way.
///
/// # Errors
///
/// Returns 404 Not Found if the hash doesn't exist or the link was deleted.
/// Returns 403 Forbidden if the link is blocked; no click is recorded.
pub async fn redirect_handler(
    Path(hash): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let link = state.link_service.resolve(&hash).await?;

    // Failures are logged and counted by the publisher.
    let _ = state.click_publisher.record_visit(link.id);

    debug!(hash = %hash, link_id = link.id, "Redirecting");

    Ok(Redirect::temporary(&link.url))
}
