//! Core domain entities.
//!
//! - [`Link`] - A shortened URL, read by the click pipeline
//! - [`DailyClickAggregate`] - Durable per-(link, day) click counter
//! - [`StatsRow`] / [`LinkStatsRow`] - Query-time projections over the counters

pub mod daily_click;
pub mod link;

pub use daily_click::{DailyClickAggregate, GroupBy, LinkStatsRow, StatsRow};
pub use link::Link;
