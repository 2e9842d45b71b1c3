//! Domain layer: entities, events, repository contracts and the click
//! accounting pipeline.
//!
//! # Click Processing Flow
//!
//! 1. The redirect handler resolves a hash and answers with a redirect
//! 2. [`click_publisher::ClickPublisher::record_visit`] queues the link id locally
//! 3. A publisher worker puts an [`event::Event::LinkVisited`] on the [`event_bus::EventBus`]
//! 4. [`stat_consumer::run_stat_consumer`] increments the daily counter via
//!    [`repositories::StatsRepository::add_click`]

pub mod click_publisher;
pub mod entities;
pub mod event;
pub mod event_bus;
pub mod repositories;
pub mod stat_consumer;
