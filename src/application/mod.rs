//! Application layer services.
//!
//! Services consume repository traits and give HTTP handlers and the admin
//! CLI a validated API.
//!
//! - [`services::link_service::LinkService`] - Short hash resolution
//! - [`services::stats_service::StatsService`] - Click statistics queries

pub mod services;
