//! Data Transfer Objects for API requests and responses.
//!
//! Response rows for the statistics endpoints are the domain projections
//! ([`crate::domain::entities::StatsRow`], [`crate::domain::entities::LinkStatsRow`])
//! serialized directly.

pub mod health;
pub mod stats;
