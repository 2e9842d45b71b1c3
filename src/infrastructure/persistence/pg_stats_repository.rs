//! PostgreSQL implementation of statistics repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{DailyClickAggregate, GroupBy, LinkStatsRow, StatsRow};
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

/// PostgreSQL repository for the daily click counters.
///
/// One row per `(link_id, date)`; the primary key on that pair is what makes
/// the increment race-safe.
pub struct PgStatsRepository {
    pool: Arc<PgPool>,
}

impl PgStatsRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct DailyRow {
    link_id: i64,
    date: NaiveDate,
    clicks: i64,
}

#[derive(FromRow)]
struct PeriodRow {
    period: String,
    sum: i64,
}

#[derive(FromRow)]
struct LinkSummaryRow {
    link_id: i64,
    url: String,
    total_clicks: i64,
    last_click_date: Option<NaiveDate>,
    blocked_count: i64,
}

#[async_trait]
impl StatsRepository for PgStatsRepository {
    async fn add_click(&self, link_id: i64, date: NaiveDate) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;

        // Insert-or-increment in one statement; concurrent callers on the
        // same key serialize on the row lock.
        let clicks = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO daily_clicks (link_id, date, clicks)
            VALUES ($1, $2, 1)
            ON CONFLICT (link_id, date)
            DO UPDATE SET clicks = daily_clicks.clicks + 1, updated_at = NOW()
            RETURNING clicks
            "#,
        )
        .bind(link_id)
        .bind(date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(clicks)
    }

    async fn find_daily(
        &self,
        link_id: i64,
        date: NaiveDate,
    ) -> Result<Option<DailyClickAggregate>, AppError> {
        let row = sqlx::query_as::<_, DailyRow>(
            r#"
            SELECT link_id, date, clicks
            FROM daily_clicks
            WHERE link_id = $1 AND date = $2
            "#,
        )
        .bind(link_id)
        .bind(date)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(|r| DailyClickAggregate {
            link_id: r.link_id,
            date: r.date,
            clicks: r.clicks,
        }))
    }

    async fn get_stats(
        &self,
        group_by: GroupBy,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<StatsRow>, AppError> {
        let rows = sqlx::query_as::<_, PeriodRow>(
            r#"
            SELECT to_char(date, $3) AS period, SUM(clicks)::BIGINT AS sum
            FROM daily_clicks
            WHERE date BETWEEN $1 AND $2
            GROUP BY period
            ORDER BY period
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(group_by.date_format())
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| StatsRow {
                period: r.period,
                sum: r.sum,
            })
            .collect())
    }

    async fn get_all_links_stats(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<LinkStatsRow>, AppError> {
        let rows = sqlx::query_as::<_, LinkSummaryRow>(
            r#"
            SELECT
                l.id AS link_id,
                l.url,
                COALESCE(SUM(d.clicks), 0)::BIGINT AS total_clicks,
                MAX(d.date) AS last_click_date,
                CASE WHEN l.is_blocked THEN COALESCE(SUM(d.clicks), 0) ELSE 0 END::BIGINT
                    AS blocked_count
            FROM links l
            LEFT JOIN daily_clicks d
                ON d.link_id = l.id AND d.date BETWEEN $1 AND $2
            WHERE l.deleted_at IS NULL
              AND EXISTS (SELECT 1 FROM daily_clicks x WHERE x.link_id = l.id)
            GROUP BY l.id, l.url, l.is_blocked
            ORDER BY total_clicks DESC, l.id ASC
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| LinkStatsRow {
                link_id: r.link_id,
                url: r.url,
                total_clicks: r.total_clicks,
                last_click_date: r.last_click_date,
                blocked_count: r.blocked_count,
            })
            .collect())
    }

    async fn count_link_clicks(
        &self,
        link_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(clicks), 0)::BIGINT
            FROM daily_clicks
            WHERE link_id = $1 AND date BETWEEN $2 AND $3
            "#,
        )
        .bind(link_id)
        .bind(from)
        .bind(to)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(total)
    }
}
