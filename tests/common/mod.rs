#![allow(dead_code)]

use axum::ServiceExt;
use axum::extract::Request;
use axum_test::TestServer;
use chrono::NaiveDate;
use shortener::domain::click_publisher::ClickPublisher;
use shortener::domain::event::Event;
use shortener::domain::event_bus::{EventBus, Subscription};
use shortener::routes::app_router;
use shortener::state::AppState;
use sqlx::PgPool;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub const ADMIN_TOKEN: &str = "test-admin-token";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub async fn create_test_link(pool: &PgPool, hash: &str, url: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO links (hash, url) VALUES ($1, $2) RETURNING id")
        .bind(hash)
        .bind(url)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_blocked_link(pool: &PgPool, hash: &str, url: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO links (hash, url, is_blocked) VALUES ($1, $2, TRUE) RETURNING id",
    )
    .bind(hash)
    .bind(url)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_deleted_link(pool: &PgPool, hash: &str, url: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO links (hash, url, deleted_at) VALUES ($1, $2, NOW()) RETURNING id",
    )
    .bind(hash)
    .bind(url)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Seeds a daily counter directly, bypassing the pipeline.
pub async fn insert_daily_clicks(pool: &PgPool, link_id: i64, date: NaiveDate, clicks: i64) {
    sqlx::query("INSERT INTO daily_clicks (link_id, date, clicks) VALUES ($1, $2, $3)")
        .bind(link_id)
        .bind(date)
        .bind(clicks)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn daily_clicks(pool: &PgPool, link_id: i64, date: NaiveDate) -> Option<i64> {
    sqlx::query_scalar("SELECT clicks FROM daily_clicks WHERE link_id = $1 AND date = $2")
        .bind(link_id)
        .bind(date)
        .fetch_optional(pool)
        .await
        .unwrap()
}

/// State backed by a fresh bus with one subscription standing in for the
/// stat consumer.
pub fn create_test_state(pool: PgPool) -> (AppState, Subscription<Event>) {
    create_test_state_with_bus(pool, Arc::new(EventBus::new()))
}

pub fn create_test_state_with_bus(
    pool: PgPool,
    bus: Arc<EventBus<Event>>,
) -> (AppState, Subscription<Event>) {
    let subscription = bus.subscribe();
    let (publisher, _handles) = ClickPublisher::spawn(bus.clone(), 2, 64, CancellationToken::new());

    let state = AppState::new(Arc::new(pool), bus, publisher, ADMIN_TOKEN);

    (state, subscription)
}

/// Full router, path normalization included, served in memory.
pub fn test_server(state: AppState) -> TestServer {
    let app = ServiceExt::<Request>::into_make_service(app_router(state));
    TestServer::new(app).unwrap()
}
