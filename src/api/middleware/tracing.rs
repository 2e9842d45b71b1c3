//! HTTP request/response tracing middleware.

use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

/// Request tracing layer used by [`crate::routes::app_router`].
///
/// Each request gets an `INFO` span carrying method, URI and version. The
/// response line (status, latency in ms) is logged at `INFO`; 5xx responses
/// are additionally logged at `WARN`. Request start is only visible at
/// `DEBUG`, since redirects are the hot path.
///
/// # Example Logs
///
/// ```text
/// INFO request{method=GET uri=/links/abc123 version=HTTP/1.1}: finished processing request latency=2 ms status=307
/// WARN request{method=GET uri=/stats?by=day&from=2024-01-01&to=2024-01-31 version=HTTP/1.1}: response failed classification=Status code: 500 Internal Server Error latency=4 ms
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(
            DefaultOnFailure::new()
                .level(Level::WARN)
                .latency_unit(LatencyUnit::Millis),
        )
}
