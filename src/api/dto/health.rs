//! DTOs for health check endpoint.

use serde::Serialize;

/// Health check response with component status.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
    pub clicks: ClickPipelineStats,
}

/// Health status for each system component.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub database: CheckStatus,
    pub event_bus: CheckStatus,
    pub click_publisher: CheckStatus,
}

/// Individual component health status.
#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Click pipeline counters since process start.
#[derive(Debug, Serialize)]
pub struct ClickPipelineStats {
    pub published: u64,
    /// Lost before or while publishing (local queue full, bus overload).
    pub dropped: u64,
    /// Per-subscriber deliveries refused by the bus.
    pub bus_dropped: u64,
    pub subscribers: usize,
    pub queue_available: usize,
}
