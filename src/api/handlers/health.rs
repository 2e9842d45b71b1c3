//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, ClickPipelineStats, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: `SELECT 1` round-trip
/// 2. **Event bus**: open, with the stat consumer subscribed
/// 3. **Click publisher**: local queue still accepting visits
///
/// Drop counters are reported alongside so click loss under load is visible.
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_check = check_database(&state).await;
    let bus_check = check_event_bus(&state);
    let publisher_check = check_click_publisher(&state);

    let all_healthy = db_check.is_ok() && bus_check.is_ok() && publisher_check.is_ok();

    let publisher = &state.click_publisher;
    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database: db_check,
            event_bus: bus_check,
            click_publisher: publisher_check,
        },
        clicks: ClickPipelineStats {
            published: publisher.published(),
            dropped: publisher.dropped(),
            bus_dropped: state.event_bus.dropped(),
            subscribers: state.event_bus.subscriber_count(),
            queue_available: publisher.available(),
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match sqlx::query("SELECT 1").execute(state.db.as_ref()).await {
        Ok(_) => CheckStatus::ok("Connected"),
        Err(e) => CheckStatus::error(format!("Database error: {e}")),
    }
}

fn check_event_bus(state: &AppState) -> CheckStatus {
    let bus = &state.event_bus;
    if bus.is_closed() {
        return CheckStatus::error("Event bus is closed");
    }

    match bus.subscriber_count() {
        0 => CheckStatus::error("No stat consumer subscribed"),
        n => CheckStatus::ok(format!("Capacity: {}, subscribers: {n}", bus.capacity())),
    }
}

fn check_click_publisher(state: &AppState) -> CheckStatus {
    let publisher = &state.click_publisher;
    if publisher.is_stopped() {
        CheckStatus::error("Click publisher has stopped")
    } else {
        CheckStatus::ok(format!(
            "Workers: {}, queue: {}/{}",
            publisher.workers(),
            publisher.available(),
            publisher.queue_capacity()
        ))
    }
}
