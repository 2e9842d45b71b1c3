//! Click statistics service.

use std::sync::Arc;

use crate::domain::entities::{GroupBy, LinkStatsRow, StatsRow};
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;
use chrono::NaiveDate;
use serde_json::json;

/// Read-side queries over the daily click counters.
///
/// Query failures are returned to the caller as errors, never flattened into
/// an empty result, so "no data" and "query failed" stay distinguishable.
pub struct StatsService<R: StatsRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: StatsRepository + ?Sized> StatsService<R> {
    /// Creates a new statistics service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Records one click for `link_id` on `date`.
    ///
    /// # Note
    ///
    /// Live clicks reach the store through the stat consumer; this path
    /// backs `admin clicks record`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the link does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn record_click(&self, link_id: i64, date: NaiveDate) -> Result<i64, AppError> {
        self.repository.add_click(link_id, date).await
    }

    /// Clicks summed per day or month within `[from, to]`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `from` is after `to`.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_stats(
        &self,
        group_by: GroupBy,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<StatsRow>, AppError> {
        validate_range(from, to)?;
        self.repository.get_stats(group_by, from, to).await
    }

    /// Per-link click summary within `[from, to]`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `from` is after `to`.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_all_links_stats(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<LinkStatsRow>, AppError> {
        validate_range(from, to)?;
        self.repository.get_all_links_stats(from, to).await
    }

    /// Total clicks of one link within `[from, to]`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `from` is after `to`.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn count_link_clicks(
        &self,
        link_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<i64, AppError> {
        validate_range(from, to)?;
        self.repository.count_link_clicks(link_id, from, to).await
    }
}

fn validate_range(from: NaiveDate, to: NaiveDate) -> Result<(), AppError> {
    if from > to {
        return Err(AppError::bad_request(
            "'from' must not be after 'to'",
            json!({ "from": from, "to": to }),
        ));
    }
    Ok(())
}
