mod common;

use common::date;
use shortener::application::services::StatsService;
use shortener::error::AppError;
use shortener::infrastructure::persistence::PgStatsRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn service(pool: PgPool) -> StatsService<PgStatsRepository> {
    StatsService::new(Arc::new(PgStatsRepository::new(Arc::new(pool))))
}

#[sqlx::test]
async fn test_record_click_then_count(pool: PgPool) {
    let link_id = common::create_test_link(&pool, "rec", "https://example.com/rec").await;
    let service = service(pool);

    assert_eq!(service.record_click(link_id, date(2024, 1, 15)).await.unwrap(), 1);
    assert_eq!(service.record_click(link_id, date(2024, 1, 15)).await.unwrap(), 2);
    assert_eq!(service.record_click(link_id, date(2024, 2, 1)).await.unwrap(), 1);

    let january = service
        .count_link_clicks(link_id, date(2024, 1, 1), date(2024, 1, 31))
        .await
        .unwrap();
    assert_eq!(january, 2);

    let both = service
        .count_link_clicks(link_id, date(2024, 1, 1), date(2024, 2, 29))
        .await
        .unwrap();
    assert_eq!(both, 3);
}

#[sqlx::test]
async fn test_record_click_unknown_link(pool: PgPool) {
    let service = service(pool);

    let result = service.record_click(9999, date(2024, 1, 15)).await;

    assert!(matches!(result, Err(AppError::Validation { .. })));
}

#[sqlx::test]
async fn test_count_link_clicks_inverted_range(pool: PgPool) {
    let link_id = common::create_test_link(&pool, "inv", "https://example.com/inv").await;
    let service = service(pool);

    let result = service
        .count_link_clicks(link_id, date(2024, 2, 1), date(2024, 1, 1))
        .await;

    assert!(matches!(result, Err(AppError::Validation { .. })));
}
