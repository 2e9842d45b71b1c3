//! Handlers for grouped click statistics.

use axum::{
    Json,
    extract::{Query, State},
};

use crate::api::dto::stats::{RangeQuery, StatsQuery};
use crate::domain::entities::{LinkStatsRow, StatsRow};
use crate::error::AppError;
use crate::state::AppState;

/// Clicks summed per day or month.
///
/// # Endpoints
///
/// - `GET /stats?by=day|month&from=YYYY-MM-DD&to=YYYY-MM-DD`
/// - `GET /admin/stats` (same parameters, admin token required)
///
/// # Response
///
/// ```json
/// [
///   { "period": "2024-01-01", "sum": 3 },
///   { "period": "2024-01-02", "sum": 2 }
/// ]
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if a parameter is missing or malformed, or if
/// `from` is after `to`.
/// Returns 500 Internal Server Error if the query fails.
pub async fn stats_handler(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Vec<StatsRow>>, AppError> {
    let (group_by, from, to) = query.parse()?;

    let rows = state.stats_service.get_stats(group_by, from, to).await?;

    Ok(Json(rows))
}

/// Per-link click summary over a date range.
///
/// # Endpoint
///
/// `GET /admin/stats/links?from=YYYY-MM-DD&to=YYYY-MM-DD`
///
/// # Response
///
/// ```json
/// [
///   {
///     "link_id": 1,
///     "url": "https://example.com",
///     "total_clicks": 5,
///     "last_click_date": "2024-01-02",
///     "blocked_count": 0
///   }
/// ]
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for a missing, malformed or inverted range.
/// Returns 500 Internal Server Error if the query fails.
pub async fn link_stats_handler(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<LinkStatsRow>>, AppError> {
    let (from, to) = query.parse()?;

    let rows = state.stats_service.get_all_links_stats(from, to).await?;

    Ok(Json(rows))
}
