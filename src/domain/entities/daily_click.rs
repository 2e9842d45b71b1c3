//! Per-day click counters and the projections derived from them.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Durable click counter for one link on one calendar day.
///
/// At most one row exists per `(link_id, date)`; the row is created by the
/// first click of the day and incremented by every later one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyClickAggregate {
    pub link_id: i64,
    pub date: NaiveDate,
    pub clicks: i64,
}

/// Time bucket used when summing daily counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Day,
    Month,
}

impl GroupBy {
    /// `to_char` pattern producing the period key.
    pub fn date_format(self) -> &'static str {
        match self {
            GroupBy::Day => "YYYY-MM-DD",
            GroupBy::Month => "YYYY-MM",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GroupBy::Day => "day",
            GroupBy::Month => "month",
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(GroupBy::Day),
            "month" => Ok(GroupBy::Month),
            other => Err(format!("unsupported grouping '{other}', expected 'day' or 'month'")),
        }
    }
}

/// Summed clicks for one period (`YYYY-MM-DD` or `YYYY-MM`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsRow {
    pub period: String,
    pub sum: i64,
}

/// Per-link click summary over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkStatsRow {
    pub link_id: i64,
    pub url: String,
    pub total_clicks: i64,
    pub last_click_date: Option<NaiveDate>,
    /// Clicks in range attributed to a link that is currently blocked.
    pub blocked_count: i64,
}
