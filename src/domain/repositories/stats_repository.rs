//! Repository trait for daily click counters and statistics.

use crate::domain::entities::{DailyClickAggregate, GroupBy, LinkStatsRow, StatsRow};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Repository interface for the click aggregate store.
///
/// The write side is a single increment operation; the read side sums the
/// daily counters over an inclusive date range.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgStatsRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_stats.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Adds one click to the `(link_id, date)` counter, creating it if absent.
    ///
    /// Must be atomic with respect to concurrent callers for the same key:
    /// after `N` successful calls the counter equals `N` and exactly one row
    /// exists.
    ///
    /// Returns the counter value after the increment.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the link does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    async fn add_click(&self, link_id: i64, date: NaiveDate) -> Result<i64, AppError>;

    /// Reads a single daily counter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_daily(
        &self,
        link_id: i64,
        date: NaiveDate,
    ) -> Result<Option<DailyClickAggregate>, AppError>;

    /// Sums clicks per day or per month within `[from, to]`, ascending by period.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn get_stats(
        &self,
        group_by: GroupBy,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<StatsRow>, AppError>;

    /// Per-link totals within `[from, to]`, ordered by total clicks descending.
    ///
    /// Covers every live link that has at least one counter row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn get_all_links_stats(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<LinkStatsRow>, AppError>;

    /// Sums clicks for one link within `[from, to]`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_link_clicks(
        &self,
        link_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<i64, AppError>;
}
