//! Redirect-path hand-off of visited-events to the event bus.
//!
//! The redirect handler calls [`ClickPublisher::record_visit`], which only
//! pushes the link id into a small local queue and returns. A fixed pool of
//! workers drains that queue and publishes [`Event::LinkVisited`] to the bus.
//!
//! Publishing never waits: [`EventBus::publish`] uses `try_send` on every
//! subscriber queue, so a saturated bus rejects the event at once instead of
//! holding a worker. There is no separate timeout to enforce. Every failure is
//! logged, counted and otherwise ignored: analytics never affect the redirect.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tokio::sync::{Mutex, mpsc, mpsc::error::TrySendError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::event::Event;
use crate::domain::event_bus::{BusError, EventBus};

const COUNTER_PUBLISHED: &str = "clicks_published_total";
const COUNTER_DROPPED: &str = "clicks_dropped_total";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PublishError {
    #[error("local click queue is full")]
    LocalQueueFull,
    #[error("click publisher has stopped")]
    Stopped,
    #[error(transparent)]
    Bus(#[from] BusError),
}

impl PublishError {
    fn reason(&self) -> &'static str {
        match self {
            PublishError::LocalQueueFull => "local_queue_full",
            PublishError::Stopped => "stopped",
            PublishError::Bus(BusError::Overloaded { .. }) => "overloaded",
            PublishError::Bus(BusError::Closed) => "closed",
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    published: AtomicU64,
    dropped: AtomicU64,
}

/// Cheap-to-clone handle used by request handlers.
#[derive(Clone)]
pub struct ClickPublisher {
    tx: mpsc::Sender<i64>,
    counters: Arc<Counters>,
    workers: usize,
}

impl ClickPublisher {
    /// Starts `workers` publisher tasks draining a local queue of
    /// `queue_capacity` link ids.
    ///
    /// Workers stop when `token` is cancelled, after publishing whatever is
    /// still in the local queue. The returned handles complete at that point.
    pub fn spawn(
        bus: Arc<EventBus<Event>>,
        workers: usize,
        queue_capacity: usize,
        token: CancellationToken,
    ) -> (Self, Vec<JoinHandle<()>>) {
        let workers = workers.max(1);
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let rx = Arc::new(Mutex::new(rx));
        let counters = Arc::new(Counters::default());

        let handles = (0..workers)
            .map(|worker| {
                tokio::spawn(run_worker(
                    worker,
                    rx.clone(),
                    bus.clone(),
                    counters.clone(),
                    token.clone(),
                ))
            })
            .collect();

        info!(workers, queue_capacity, "Click publisher started");

        (
            Self {
                tx,
                counters,
                workers,
            },
            handles,
        )
    }

    /// Queues a visited-event for `link_id` without waiting.
    ///
    /// The caller may ignore the result; failures are already logged and
    /// counted here.
    pub fn record_visit(&self, link_id: i64) -> Result<(), PublishError> {
        let err = match self.tx.try_send(link_id) {
            Ok(()) => return Ok(()),
            Err(TrySendError::Full(_)) => PublishError::LocalQueueFull,
            Err(TrySendError::Closed(_)) => PublishError::Stopped,
        };

        record_drop(&self.counters, link_id, &err);
        Err(err)
    }

    /// Visited-events accepted by the bus.
    pub fn published(&self) -> u64 {
        self.counters.published.load(Ordering::Relaxed)
    }

    /// Visited-events lost on the publishing side (local queue full or bus
    /// overloaded).
    pub fn dropped(&self) -> u64 {
        self.counters.dropped.load(Ordering::Relaxed)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Free slots in the local queue.
    pub fn available(&self) -> usize {
        self.tx.capacity()
    }

    pub fn queue_capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    pub fn is_stopped(&self) -> bool {
        self.tx.is_closed()
    }

    /// Publisher without workers; the caller owns the local queue.
    #[cfg(test)]
    pub(crate) fn detached(queue_capacity: usize) -> (Self, mpsc::Receiver<i64>) {
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        (
            Self {
                tx,
                counters: Arc::new(Counters::default()),
                workers: 0,
            },
            rx,
        )
    }
}

fn record_drop(counters: &Counters, link_id: i64, err: &PublishError) {
    counters.dropped.fetch_add(1, Ordering::Relaxed);
    metrics::counter!(COUNTER_DROPPED, "reason" => err.reason()).increment(1);
    warn!(link_id, reason = err.reason(), error = %err, "Click dropped");
}

async fn run_worker(
    worker: usize,
    rx: Arc<Mutex<mpsc::Receiver<i64>>>,
    bus: Arc<EventBus<Event>>,
    counters: Arc<Counters>,
    token: CancellationToken,
) {
    loop {
        // The guard lives only for this block; publishing happens unlocked.
        let next = {
            let mut rx = rx.lock().await;
            tokio::select! {
                biased;
                _ = token.cancelled() => None,
                link_id = rx.recv() => link_id,
            }
        };

        let Some(link_id) = next else { break };
        publish_visit(&bus, &counters, link_id);
    }

    // Hand whatever is still queued to the bus before exiting.
    loop {
        let next = rx.lock().await.try_recv().ok();
        let Some(link_id) = next else { break };
        publish_visit(&bus, &counters, link_id);
    }

    debug!(worker, "Click publisher worker stopped");
}

fn publish_visit(bus: &EventBus<Event>, counters: &Counters, link_id: i64) {
    match bus.publish(Event::link_visited(link_id)) {
        Ok(subscribers) => {
            counters.published.fetch_add(1, Ordering::Relaxed);
            metrics::counter!(COUNTER_PUBLISHED).increment(1);
            debug!(link_id, subscribers, "Visited-event published");
        }
        Err(err) => record_drop(counters, link_id, &PublishError::from(err)),
    }
}
