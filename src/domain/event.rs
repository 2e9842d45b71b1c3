//! Events carried on the in-process [`EventBus`](crate::domain::event_bus::EventBus).

/// An in-memory fact published by request handlers.
///
/// Events are never persisted; they live on the bus until a subscriber
/// consumes them, or are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A short link was resolved and the caller redirected.
    LinkVisited { link_id: i64 },
}

impl Event {
    pub fn link_visited(link_id: i64) -> Self {
        Event::LinkVisited { link_id }
    }

    /// Stable name of the event kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::LinkVisited { .. } => "LinkVisited",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_visited_kind() {
        let event = Event::link_visited(42);
        assert_eq!(event.kind(), "LinkVisited");
        assert_eq!(event, Event::LinkVisited { link_id: 42 });
    }
}
