//! Domain event system: decoupled observation of session progress.
//!
//! Sessions publish events as turns are processed. Observers (logging
//! sinks, dashboards, tests) subscribe without coupling to the loop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// A user utterance arrived
    TurnReceived {
        session_id: String,
        turn: u32,
        confidence: f32,
        timestamp: DateTime<Utc>,
    },

    /// The evaluator classified an input
    VerdictIssued {
        session_id: String,
        turn: u32,
        verdict: String,
        timestamp: DateTime<Utc>,
    },

    /// A tool request went through the gateway
    ToolDispatched {
        session_id: String,
        tool: String,
        success: bool,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// The planner moved the session to another phase
    PhaseChanged {
        session_id: String,
        from: String,
        to: String,
        timestamp: DateTime<Utc>,
    },

    /// The session reached a terminal outcome
    SessionConcluded {
        session_id: String,
        outcome: String,
        turns: u32,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent {
    pub fn session_id(&self) -> &str {
        match self {
            DomainEvent::TurnReceived { session_id, .. }
            | DomainEvent::VerdictIssued { session_id, .. }
            | DomainEvent::ToolDispatched { session_id, .. }
            | DomainEvent::PhaseChanged { session_id, .. }
            | DomainEvent::SessionConcluded { session_id, .. } => session_id,
        }
    }

    /// Short snake_case name, for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainEvent::TurnReceived { .. } => "turn_received",
            DomainEvent::VerdictIssued { .. } => "verdict_issued",
            DomainEvent::ToolDispatched { .. } => "tool_dispatched",
            DomainEvent::PhaseChanged { .. } => "phase_changed",
            DomainEvent::SessionConcluded { .. } => "session_concluded",
        }
    }
}

/// Fan-out of domain events to any number of observers.
///
/// Publishing never blocks and never fails; events published while nobody
/// listens are dropped. Observers interested in one conversation use
/// [`EventBus::subscribe_session`].
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// `capacity` is how many events a slow observer may fall behind
    /// before it starts losing the oldest ones.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, event: DomainEvent) {
        let _ = self.sender.send(Arc::new(event));
    }

    /// Every event, from every session sharing this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }

    /// Events of a single session, in publish order.
    pub fn subscribe_session(&self, session_id: impl Into<String>) -> SessionEvents {
        SessionEvents {
            session_id: session_id.into(),
            receiver: self.sender.subscribe(),
            missed: 0,
        }
    }

    /// Live observers, including session subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

/// A subscription filtered to one session.
///
/// Unlike a raw receiver it survives falling behind: lost events are
/// counted in [`SessionEvents::missed`] and delivery resumes with the
/// oldest event still buffered.
pub struct SessionEvents {
    session_id: String,
    receiver: broadcast::Receiver<Arc<DomainEvent>>,
    missed: u64,
}

impl SessionEvents {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Events dropped so far because this observer lagged.
    pub fn missed(&self) -> u64 {
        self.missed
    }

    /// The next event for this session, or `None` once the bus is gone.
    pub async fn next(&mut self) -> Option<Arc<DomainEvent>> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.session_id() == self.session_id => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(n)) => self.missed += n,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concluded(session_id: &str) -> DomainEvent {
        DomainEvent::SessionConcluded {
            session_id: session_id.into(),
            outcome: "declined".into(),
            turns: 1,
            timestamp: Utc::now(),
        }
    }

    fn dispatched(session_id: &str) -> DomainEvent {
        DomainEvent::ToolDispatched {
            session_id: session_id.into(),
            tool: "retrieve".into(),
            success: true,
            duration_ms: 42,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn session_subscription_skips_other_sessions() {
        let bus = EventBus::new(16);
        let mut events = bus.subscribe_session("s1");

        bus.publish(dispatched("s2"));
        bus.publish(dispatched("s1"));
        bus.publish(concluded("s1"));

        let first = events.next().await.unwrap();
        assert_eq!(first.kind(), "tool_dispatched");
        assert_eq!(first.session_id(), "s1");
        assert_eq!(events.next().await.unwrap().kind(), "session_concluded");
    }

    #[tokio::test]
    async fn lagging_subscription_counts_missed_events() {
        let bus = EventBus::new(2);
        let mut events = bus.subscribe_session("s1");
        for _ in 0..5 {
            bus.publish(dispatched("s1"));
        }

        assert!(events.next().await.is_some());
        assert_eq!(events.missed(), 3);
    }

    #[tokio::test]
    async fn subscription_ends_with_the_bus() {
        let bus = EventBus::new(4);
        let mut events = bus.subscribe_session("s1");
        assert_eq!(bus.subscriber_count(), 1);
        drop(bus);
        assert!(events.next().await.is_none());
    }

    #[test]
    fn publishing_without_subscribers_is_a_no_op() {
        let bus = EventBus::default();
        assert_eq!(bus.subscriber_count(), 0);
        bus.publish(concluded("s1"));
    }
}
