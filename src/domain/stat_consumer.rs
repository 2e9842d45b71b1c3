//! Background consumer turning visited-events into daily click increments.

use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::event::Event;
use crate::domain::event_bus::Subscription;
use crate::domain::repositories::StatsRepository;

const COUNTER_RECORDED: &str = "clicks_recorded_total";
const COUNTER_FAILED: &str = "clicks_failed_total";
const COUNTER_SKIPPED: &str = "click_events_skipped_total";

/// What the consumer did before it stopped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConsumerReport {
    pub recorded: u64,
    pub failed: u64,
    pub skipped: u64,
}

/// Spawns the stat consumer on the runtime.
///
/// There is exactly one consumer per process; it is started once when the
/// server is assembled.
pub fn spawn_stat_consumer<R>(
    subscription: Subscription<Event>,
    repository: Arc<R>,
    token: CancellationToken,
) -> JoinHandle<ConsumerReport>
where
    R: StatsRepository + ?Sized + 'static,
{
    tokio::spawn(run_stat_consumer(subscription, repository, token))
}

/// Receives events one at a time and applies each increment before taking
/// the next one.
///
/// Stops when `token` is cancelled, after applying the events already queued
/// on the subscription, or when the bus closes. A failed increment is logged
/// and the event is lost.
pub async fn run_stat_consumer<R>(
    mut subscription: Subscription<Event>,
    repository: Arc<R>,
    token: CancellationToken,
) -> ConsumerReport
where
    R: StatsRepository + ?Sized,
{
    let mut report = ConsumerReport::default();
    info!("Stat consumer started");

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                let mut drained = 0u64;
                while let Some(event) = subscription.try_recv() {
                    handle_event(repository.as_ref(), event, &mut report).await;
                    drained += 1;
                }
                info!(drained, "Stat consumer cancelled");
                break;
            }
            event = subscription.recv() => match event {
                Some(event) => handle_event(repository.as_ref(), event, &mut report).await,
                None => {
                    info!("Event bus closed, stat consumer stopping");
                    break;
                }
            },
        }
    }

    info!(
        recorded = report.recorded,
        failed = report.failed,
        skipped = report.skipped,
        "Stat consumer stopped"
    );
    report
}

async fn handle_event<R>(repository: &R, event: Event, report: &mut ConsumerReport)
where
    R: StatsRepository + ?Sized,
{
    let kind = event.kind();
    let link_id = match event {
        Event::LinkVisited { link_id } if link_id > 0 => link_id,
        Event::LinkVisited { link_id } => {
            warn!(kind, link_id, "Malformed event skipped");
            metrics::counter!(COUNTER_SKIPPED).increment(1);
            report.skipped += 1;
            return;
        }
    };

    let today = Utc::now().date_naive();
    match repository.add_click(link_id, today).await {
        Ok(clicks) => {
            debug!(link_id, %today, clicks, "Click recorded");
            metrics::counter!(COUNTER_RECORDED).increment(1);
            report.recorded += 1;
        }
        Err(e) => {
            warn!(link_id, %today, error = %e, "Failed to record click");
            metrics::counter!(COUNTER_FAILED).increment(1);
            report.failed += 1;
        }
    }
}
