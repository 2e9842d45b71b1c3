//! CLI administration tool for the shortener.
//!
//! Reads click statistics and checks the database without going through the
//! HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Clicks per day (or month) over a range
//! cargo run --bin admin -- stats daily --by day --from 2024-01-01 --to 2024-01-31
//!
//! # Per-link summary over a range
//! cargo run --bin admin -- stats links --from 2024-01-01 --to 2024-01-31
//!
//! # Clicks of a single link over a range
//! cargo run --bin admin -- stats link --id 7 --from 2024-01-01 --to 2024-01-31
//!
//! # Record a click by hand (defaults to today, UTC)
//! cargo run --bin admin -- clicks record --id 7 --date 2024-01-15
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use shortener::application::services::StatsService;
use shortener::domain::entities::GroupBy;
use shortener::infrastructure::persistence::PgStatsRepository;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for the shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Show click statistics
    Stats {
        #[command(subcommand)]
        action: StatsAction,
    },

    /// Manual click bookkeeping
    Clicks {
        #[command(subcommand)]
        action: ClicksAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum StatsAction {
    /// Clicks summed per day or month
    Daily {
        /// Grouping: day or month
        #[arg(short, long, default_value = "day")]
        by: GroupBy,

        /// First day of the range (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,

        /// Last day of the range, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,
    },

    /// Per-link click summary
    Links {
        #[arg(long)]
        from: NaiveDate,

        #[arg(long)]
        to: NaiveDate,
    },

    /// Total clicks of one link
    Link {
        /// Link ID
        #[arg(long)]
        id: i64,

        #[arg(long)]
        from: NaiveDate,

        #[arg(long)]
        to: NaiveDate,
    },
}

#[derive(Subcommand)]
enum ClicksAction {
    /// Add one click to a link's daily counter
    Record {
        /// Link ID
        #[arg(long)]
        id: i64,

        /// Day to count the click on (YYYY-MM-DD, default: today in UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Stats { action } => handle_stats_action(action, &pool).await?,
        Commands::Clicks { action } => handle_clicks_action(action, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn stats_service(pool: &PgPool) -> StatsService<PgStatsRepository> {
    StatsService::new(Arc::new(PgStatsRepository::new(Arc::new(pool.clone()))))
}

async fn handle_stats_action(action: StatsAction, pool: &PgPool) -> Result<()> {
    let service = stats_service(pool);

    match action {
        StatsAction::Daily { by, from, to } => show_daily(&service, by, from, to).await,
        StatsAction::Links { from, to } => show_links(&service, from, to).await,
        StatsAction::Link { id, from, to } => show_link(&service, id, from, to).await,
    }
}

async fn handle_clicks_action(action: ClicksAction, pool: &PgPool) -> Result<()> {
    let service = stats_service(pool);

    match action {
        ClicksAction::Record { id, date } => {
            let date = date.unwrap_or_else(|| Utc::now().date_naive());

            let clicks = service
                .record_click(id, date)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to record click: {}", e))?;

            println!(
                "{} link {} on {} now has {} click(s)",
                "✅".green(),
                id.to_string().bright_white(),
                date.to_string().cyan(),
                clicks.to_string().bright_green().bold()
            );
        }
    }

    Ok(())
}

/// Prints the grouped series with a bar per period.
///
/// # Output Format
///
/// ```text
/// 📊 Clicks by day (2024-01-01 .. 2024-01-02)
///
///   2024-01-01      3  ███
///   2024-01-02      2  ██
///
///   Total: 5
/// ```
async fn show_daily(
    service: &StatsService<PgStatsRepository>,
    by: GroupBy,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<()> {
    println!(
        "{}",
        format!("📊 Clicks by {by} ({from} .. {to})").bright_blue().bold()
    );
    println!();

    let rows = service
        .get_stats(by, from, to)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load statistics: {}", e))?;

    if rows.is_empty() {
        println!("{}", "  No clicks in this range".yellow());
        return Ok(());
    }

    let max = rows.iter().map(|r| r.sum).max().unwrap_or(1).max(1);
    for row in &rows {
        let width = ((row.sum * 40) / max).max(1) as usize;
        println!(
            "  {:<12} {:>6}  {}",
            row.period.cyan(),
            row.sum.to_string().bright_white(),
            "█".repeat(width).green()
        );
    }

    let total: i64 = rows.iter().map(|r| r.sum).sum();
    println!();
    println!("  Total: {}", total.to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Prints the per-link summary table.
async fn show_links(
    service: &StatsService<PgStatsRepository>,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<()> {
    println!(
        "{}",
        format!("🔗 Link clicks ({from} .. {to})").bright_blue().bold()
    );
    println!();

    let rows = service
        .get_all_links_stats(from, to)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load link statistics: {}", e))?;

    if rows.is_empty() {
        println!("{}", "  No links with recorded clicks".yellow());
        return Ok(());
    }

    println!(
        "  {:<6} {:<40} {:>8} {:<12} {:>8}",
        "ID".bright_white().bold(),
        "URL".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Last click".bright_white().bold(),
        "Blocked".bright_white().bold()
    );
    println!("  {}", "─".repeat(80).bright_black());

    for row in &rows {
        let last = row
            .last_click_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let blocked = if row.blocked_count > 0 {
            row.blocked_count.to_string().red()
        } else {
            row.blocked_count.to_string().bright_black()
        };

        println!(
            "  {:<6} {:<40} {:>8} {:<12} {:>8}",
            row.link_id.to_string().bright_black(),
            truncate(&row.url, 40).cyan(),
            row.total_clicks.to_string().bright_green(),
            last,
            blocked
        );
    }

    println!();
    println!("  Links: {}", rows.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn show_link(
    service: &StatsService<PgStatsRepository>,
    id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<()> {
    let total = service
        .count_link_clicks(id, from, to)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count clicks: {}", e))?;

    println!(
        "{}",
        format!("🔗 Link {id} ({from} .. {to})").bright_blue().bold()
    );
    println!("  Clicks: {}", total.to_string().bright_green().bold());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
                .fetch_one(pool)
                .await?;
            let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM daily_clicks")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL:   {}", version.bright_white());
            println!("  Links:        {}", links.to_string().bright_green());
            println!("  Daily rows:   {}", rows.to_string().bright_green());
            println!();
        }
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max - 1).collect();
        format!("{cut}…")
    }
}
