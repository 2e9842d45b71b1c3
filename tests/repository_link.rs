mod common;

use shortener::domain::repositories::LinkRepository;
use shortener::infrastructure::persistence::PgLinkRepository;
use sqlx::PgPool;
use std::sync::Arc;

#[sqlx::test]
async fn test_find_by_hash(pool: PgPool) {
    let id = common::create_test_link(&pool, "abc123", "https://example.com").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo.find_by_hash("abc123").await.unwrap().unwrap();

    assert_eq!(link.id, id);
    assert_eq!(link.hash, "abc123");
    assert_eq!(link.url, "https://example.com");
    assert!(!link.is_blocked);
    assert!(!link.is_deleted());
}

#[sqlx::test]
async fn test_find_by_hash_not_found(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let result = repo.find_by_hash("notfound").await.unwrap();

    assert!(result.is_none());
}

#[sqlx::test]
async fn test_find_by_hash_excludes_deleted(pool: PgPool) {
    common::create_deleted_link(&pool, "gone", "https://example.com").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    assert!(repo.find_by_hash("gone").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_find_by_hash_returns_blocked_flag(pool: PgPool) {
    common::create_blocked_link(&pool, "blocked", "https://example.com").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo.find_by_hash("blocked").await.unwrap().unwrap();

    assert!(link.is_blocked);
}
