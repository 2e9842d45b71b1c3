//! Shared state injected into every handler.

use sqlx::PgPool;
use std::sync::Arc;

use crate::api::middleware::auth::hash_token;
use crate::application::services::{LinkService, StatsService};
use crate::domain::click_publisher::ClickPublisher;
use crate::domain::event::Event;
use crate::domain::event_bus::EventBus;
use crate::infrastructure::persistence::{PgLinkRepository, PgStatsRepository};

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<PgLinkRepository>>,
    pub stats_service: Arc<StatsService<PgStatsRepository>>,
    pub event_bus: Arc<EventBus<Event>>,
    pub click_publisher: ClickPublisher,
    /// SHA-256 of the configured admin token.
    pub admin_token_hash: [u8; 32],
    pub db: Arc<PgPool>,
}

impl AppState {
    /// Wires the PostgreSQL repositories and services around an already
    /// running bus and publisher.
    pub fn new(
        db: Arc<PgPool>,
        event_bus: Arc<EventBus<Event>>,
        click_publisher: ClickPublisher,
        admin_token: &str,
    ) -> Self {
        let link_repository = Arc::new(PgLinkRepository::new(db.clone()));
        let stats_repository = Arc::new(PgStatsRepository::new(db.clone()));

        Self {
            link_service: Arc::new(LinkService::new(link_repository)),
            stats_service: Arc::new(StatsService::new(stats_repository)),
            event_bus,
            click_publisher,
            admin_token_hash: hash_token(admin_token),
            db,
        }
    }
}
