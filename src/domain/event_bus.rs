//! Bounded in-process publish/subscribe broker.
//!
//! Every subscriber owns its own bounded queue, kept in a registry guarded by
//! a mutex. `publish` copies the event into each registered queue with a
//! non-blocking `try_send`, so every subscriber sees every event published
//! after it subscribed, in publish order.
//!
//! Delivery is at-most-once and best-effort: a subscriber whose queue is full
//! misses the event (drop-on-saturation), and nothing survives a restart.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Queue slots per subscriber. Fixed at build time.
pub const EVENT_BUS_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("event bus overloaded: event dropped for {dropped} of {subscribers} subscriber(s)")]
    Overloaded { dropped: usize, subscribers: usize },
    #[error("event bus is closed")]
    Closed,
}

/// Publish/subscribe broker with an explicit subscriber registry.
///
/// Constructed explicitly and shared through `Arc`, so each test can build an
/// isolated bus.
pub struct EventBus<E> {
    subscribers: Mutex<Vec<mpsc::Sender<E>>>,
    capacity: usize,
    closed: AtomicBool,
    dropped: AtomicU64,
}

impl<E: Clone + Send + 'static> EventBus<E> {
    /// Creates a bus with [`EVENT_BUS_CAPACITY`] slots per subscriber.
    pub fn new() -> Self {
        Self::with_capacity(EVENT_BUS_CAPACITY)
    }

    /// Creates a bus with a custom per-subscriber capacity (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            capacity: capacity.max(1),
            closed: AtomicBool::new(false),
            dropped: AtomicU64::new(0),
        }
    }

    /// Offers `event` to every live subscriber without waiting.
    ///
    /// Returns the number of subscribers that accepted the event; `Ok(0)` when
    /// nobody is subscribed.
    ///
    /// # Errors
    ///
    /// - [`BusError::Overloaded`] if at least one subscriber queue was full.
    ///   Subscribers with free capacity still received the event.
    /// - [`BusError::Closed`] after [`EventBus::close`].
    pub fn publish(&self, event: E) -> Result<usize, BusError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(BusError::Closed);
        }

        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| !tx.is_closed());

        let total = subscribers.len();
        let mut delivered = 0;
        let mut dropped = 0;

        for tx in subscribers.iter() {
            match tx.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => dropped += 1,
                // Receiver went away after the retain above; pruned next call.
                Err(TrySendError::Closed(_)) => {}
            }
        }
        drop(subscribers);

        if dropped > 0 {
            self.dropped.fetch_add(dropped as u64, Ordering::Relaxed);
            return Err(BusError::Overloaded {
                dropped,
                subscribers: total,
            });
        }

        Ok(delivered)
    }

    /// Registers a new subscriber queue.
    ///
    /// The subscription yields every event published after this call. A
    /// subscription taken from a closed bus ends immediately.
    pub fn subscribe(&self) -> Subscription<E> {
        let (tx, rx) = mpsc::channel(self.capacity);
        // `close` flips the flag under the same lock, so a sender is never
        // registered after the registry was cleared.
        let mut subscribers = self.subscribers.lock();
        if !self.closed.load(Ordering::Acquire) {
            subscribers.push(tx);
        }
        Subscription { rx }
    }

    /// Stops accepting events and releases every subscriber queue.
    ///
    /// Subscribers still receive what was already queued, then see the end of
    /// the stream.
    pub fn close(&self) {
        let mut subscribers = self.subscribers.lock();
        self.closed.store(true, Ordering::Release);
        subscribers.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| !tx.is_closed());
        subscribers.len()
    }

    /// Per-subscriber queue capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total per-subscriber deliveries lost to full queues since start.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<E: Clone + Send + 'static> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Receive side of one subscriber queue.
pub struct Subscription<E> {
    rx: mpsc::Receiver<E>,
}

impl<E> Subscription<E> {
    /// Waits for the next event. `None` once the bus is closed and the queue
    /// is drained.
    pub async fn recv(&mut self) -> Option<E> {
        self.rx.recv().await
    }

    /// Takes the next queued event without waiting.
    pub fn try_recv(&mut self) -> Option<E> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::<u32>::new();
        assert_eq!(bus.publish(1), Ok(0));
        assert_eq!(bus.dropped(), 0);
    }

    #[tokio::test]
    async fn test_every_subscriber_receives_every_event() {
        let bus = EventBus::<u32>::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();
        let mut third = bus.subscribe();

        for n in 0..10 {
            assert_eq!(bus.publish(n), Ok(3));
        }

        for sub in [&mut first, &mut second, &mut third] {
            let mut seen = Vec::new();
            while let Some(n) = sub.try_recv() {
                seen.push(n);
            }
            assert_eq!(seen, (0..10).collect::<Vec<_>>());
        }
    }

    #[tokio::test]
    async fn test_concurrent_subscribers_do_not_steal_events() {
        let bus = std::sync::Arc::new(EventBus::<u32>::new());
        let mut handles = Vec::new();

        for _ in 0..4 {
            let mut sub = bus.subscribe();
            handles.push(tokio::spawn(async move {
                let mut count = 0;
                while sub.recv().await.is_some() {
                    count += 1;
                }
                count
            }));
        }

        for n in 0..50 {
            bus.publish(n).unwrap();
        }
        bus.close();

        for handle in handles {
            assert_eq!(handle.await.unwrap(), 50);
        }
    }

    #[tokio::test]
    async fn test_subscriber_only_sees_events_after_subscribe() {
        let bus = EventBus::<u32>::new();
        let mut early = bus.subscribe();
        bus.publish(1).unwrap();

        let mut late = bus.subscribe();
        bus.publish(2).unwrap();

        assert_eq!(early.try_recv(), Some(1));
        assert_eq!(early.try_recv(), Some(2));
        assert_eq!(late.try_recv(), Some(2));
        assert_eq!(late.try_recv(), None);
    }

    #[tokio::test]
    async fn test_full_queue_returns_overloaded_without_blocking() {
        let bus = EventBus::<u32>::with_capacity(2);
        let _sub = bus.subscribe();

        assert_eq!(bus.publish(1), Ok(1));
        assert_eq!(bus.publish(2), Ok(1));

        let result = tokio::time::timeout(Duration::from_millis(50), async { bus.publish(3) })
            .await
            .expect("publish must not wait for capacity");

        assert_eq!(
            result,
            Err(BusError::Overloaded {
                dropped: 1,
                subscribers: 1
            })
        );
        assert_eq!(bus.dropped(), 1);
    }

    #[tokio::test]
    async fn test_slow_subscriber_does_not_starve_others() {
        let bus = EventBus::<u32>::with_capacity(1);
        let _slow = bus.subscribe();
        let mut fast = bus.subscribe();

        bus.publish(1).unwrap();
        assert_eq!(fast.try_recv(), Some(1));

        let result = bus.publish(2);
        assert!(matches!(result, Err(BusError::Overloaded { dropped: 1, .. })));
        assert_eq!(fast.try_recv(), Some(2));
    }

    #[test]
    fn test_dropped_subscription_is_pruned() {
        let bus = EventBus::<u32>::new();
        let sub = bus.subscribe();
        let _other = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(sub);
        assert_eq!(bus.publish(1), Ok(1));
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_close_drains_then_ends_stream() {
        let bus = EventBus::<u32>::new();
        let mut sub = bus.subscribe();
        bus.publish(7).unwrap();

        bus.close();

        assert!(bus.is_closed());
        assert_eq!(bus.publish(8), Err(BusError::Closed));
        assert_eq!(sub.recv().await, Some(7));
        assert_eq!(sub.recv().await, None);
    }

    #[tokio::test]
    async fn test_subscribe_after_close_ends_immediately() {
        let bus = EventBus::<u32>::new();
        bus.close();

        let mut sub = bus.subscribe();
        assert_eq!(sub.recv().await, None);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_subscribe_racing_close_always_ends() {
        for _ in 0..200 {
            let bus = std::sync::Arc::new(EventBus::<u32>::new());
            let subscriber = {
                let bus = bus.clone();
                std::thread::spawn(move || (0..8).map(|_| bus.subscribe()).collect::<Vec<_>>())
            };
            bus.close();

            let subs = subscriber.join().unwrap();
            assert_eq!(bus.subscriber_count(), 0);
            for mut sub in subs {
                let end = tokio::time::timeout(Duration::from_millis(100), sub.recv())
                    .await
                    .expect("subscription outlived close");
                assert_eq!(end, None);
            }
        }
    }

    #[test]
    fn test_capacity_is_at_least_one() {
        assert_eq!(EventBus::<u32>::with_capacity(0).capacity(), 1);
        assert_eq!(EventBus::<u32>::new().capacity(), EVENT_BUS_CAPACITY);
    }
}
