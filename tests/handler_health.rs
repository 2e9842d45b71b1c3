mod common;

use sqlx::PgPool;

#[sqlx::test]
async fn test_health_endpoint_success(pool: PgPool) {
    let (state, _sub) = common::create_test_state(pool);
    let server = common::test_server(state);

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["event_bus"]["status"], "ok");
    assert_eq!(json["checks"]["click_publisher"]["status"], "ok");
    assert_eq!(json["clicks"]["dropped"], 0);
    assert_eq!(json["clicks"]["subscribers"], 1);
}

#[sqlx::test]
async fn test_health_degraded_without_consumer(pool: PgPool) {
    let (state, sub) = common::create_test_state(pool);
    drop(sub);
    let server = common::test_server(state);

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["event_bus"]["status"], "error");
}

#[sqlx::test]
async fn test_health_degraded_when_bus_closed(pool: PgPool) {
    let (state, _sub) = common::create_test_state(pool);
    state.event_bus.close();
    let server = common::test_server(state);

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);
}

#[sqlx::test]
async fn test_health_endpoint_structure(pool: PgPool) {
    let (state, _sub) = common::create_test_state(pool);
    let server = common::test_server(state);

    let json = server.get("/health").await.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json["checks"].get("database").is_some());
    assert!(json["clicks"].get("published").is_some());
    assert!(json["clicks"].get("bus_dropped").is_some());
    assert!(json["clicks"].get("queue_available").is_some());
}
