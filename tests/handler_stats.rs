mod common;

use axum_test::TestServer;
use common::date;
use sqlx::PgPool;

async fn seeded_server(pool: PgPool) -> TestServer {
    let a = common::create_test_link(&pool, "a", "https://example.com/a").await;
    let b = common::create_test_link(&pool, "b", "https://example.com/b").await;
    common::insert_daily_clicks(&pool, a, date(2024, 1, 1), 3).await;
    common::insert_daily_clicks(&pool, a, date(2024, 1, 2), 2).await;
    common::insert_daily_clicks(&pool, b, date(2023, 12, 31), 1).await;

    let (state, _sub) = common::create_test_state(pool);
    common::test_server(state)
}

#[sqlx::test]
async fn test_stats_by_day(pool: PgPool) {
    let server = seeded_server(pool).await;

    let response = server
        .get("/stats")
        .add_query_param("by", "day")
        .add_query_param("from", "2024-01-01")
        .add_query_param("to", "2024-01-02")
        .await;

    response.assert_status_ok();
    response.assert_json(&serde_json::json!([
        { "period": "2024-01-01", "sum": 3 },
        { "period": "2024-01-02", "sum": 2 }
    ]));
}

#[sqlx::test]
async fn test_stats_by_month(pool: PgPool) {
    let server = seeded_server(pool).await;

    let response = server
        .get("/stats")
        .add_query_param("by", "month")
        .add_query_param("from", "2024-01-01")
        .add_query_param("to", "2024-01-31")
        .await;

    response.assert_status_ok();
    response.assert_json(&serde_json::json!([{ "period": "2024-01", "sum": 5 }]));
}

#[sqlx::test]
async fn test_stats_empty_range(pool: PgPool) {
    let server = seeded_server(pool).await;

    let response = server
        .get("/stats?by=day&from=2025-01-01&to=2025-01-31")
        .await;

    response.assert_status_ok();
    response.assert_json(&serde_json::json!([]));
}

#[sqlx::test]
async fn test_stats_bad_parameters(pool: PgPool) {
    let server = seeded_server(pool).await;

    let cases = [
        "/stats?from=2024-01-01&to=2024-01-02",
        "/stats?by=day&to=2024-01-02",
        "/stats?by=day&from=2024-01-01",
        "/stats?by=week&from=2024-01-01&to=2024-01-02",
        "/stats?by=day&from=2024-1-1x&to=2024-01-02",
        "/stats?by=day&from=2024-02-01&to=2024-01-01",
    ];

    for uri in cases {
        let response = server.get(uri).await;
        response.assert_status_bad_request();
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["error"]["code"], "validation_error", "{uri}");
    }
}

#[sqlx::test]
async fn test_admin_routes_require_token(pool: PgPool) {
    let server = seeded_server(pool).await;

    let response = server
        .get("/admin/stats/links?from=2024-01-01&to=2024-01-31")
        .await;
    response.assert_status_unauthorized();
    assert_eq!(response.header("www-authenticate"), "Bearer");

    let response = server
        .get("/admin/stats?by=day&from=2024-01-01&to=2024-01-31")
        .authorization_bearer("wrong-token")
        .await;
    response.assert_status_unauthorized();
}

#[sqlx::test]
async fn test_admin_link_stats(pool: PgPool) {
    let server = seeded_server(pool).await;

    let response = server
        .get("/admin/stats/links")
        .add_query_param("from", "2024-01-01")
        .add_query_param("to", "2024-01-31")
        .authorization_bearer(common::ADMIN_TOKEN)
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    let rows = json.as_array().unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["url"], "https://example.com/a");
    assert_eq!(rows[0]["total_clicks"], 5);
    assert_eq!(rows[0]["last_click_date"], "2024-01-02");
    assert_eq!(rows[0]["blocked_count"], 0);
    assert_eq!(rows[1]["url"], "https://example.com/b");
    assert_eq!(rows[1]["total_clicks"], 0);
    assert!(rows[1]["last_click_date"].is_null());
}

#[sqlx::test]
async fn test_admin_grouped_stats(pool: PgPool) {
    let server = seeded_server(pool).await;

    let response = server
        .get("/admin/stats?by=month&from=2023-12-01&to=2024-01-31")
        .authorization_bearer(common::ADMIN_TOKEN)
        .await;

    response.assert_status_ok();
    response.assert_json(&serde_json::json!([
        { "period": "2023-12", "sum": 1 },
        { "period": "2024-01", "sum": 5 }
    ]));
}

#[sqlx::test]
async fn test_admin_link_stats_bad_range(pool: PgPool) {
    let server = seeded_server(pool).await;

    let response = server
        .get("/admin/stats/links?from=2024-02-01&to=2024-01-01")
        .authorization_bearer(common::ADMIN_TOKEN)
        .await;

    response.assert_status_bad_request();
}
