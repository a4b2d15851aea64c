//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use combat_core::{CombatEvent, EntityEvent, EntityId, NotificationSink};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tokio::sync::broadcast;

use super::types::{DisplayEvent, LifecycleEvent};

/// Default per-topic channel capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 128;

/// Topics for event routing
#[derive(
    Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, strum::EnumIter, strum::Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum Topic {
    /// Damage, armor break, heal and repair notifications
    Combat,
    /// Death, removal and save-on-death outcomes
    Lifecycle,
    /// Display refresh requests
    Display,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Combat(EntityEvent),
    Lifecycle(LifecycleEvent),
    Display(DisplayEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Combat(_) => Topic::Combat,
            Event::Lifecycle(_) => Topic::Lifecycle,
            Event::Display(_) => Topic::Display,
        }
    }

    pub fn entity(&self) -> EntityId {
        match self {
            Event::Combat(event) => event.entity,
            Event::Lifecycle(event) => event.entity(),
            Event::Display(event) => event.entity(),
        }
    }
}

impl From<EntityEvent> for Event {
    fn from(event: EntityEvent) -> Self {
        match event.event {
            CombatEvent::Died { destroy } => Event::Lifecycle(LifecycleEvent::Died {
                entity: event.entity,
                destroy,
            }),
            CombatEvent::DisplayRefresh(view) => Event::Display(DisplayEvent { view }),
            _ => Event::Combat(event),
        }
    }
}

/// Topic-based event bus
///
/// Consumers subscribe to the topics they care about. Publishing is
/// best-effort: a topic with no subscribers silently drops the event, and a
/// lagging subscriber loses the oldest events rather than blocking the
/// publisher.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<Event>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let channels = Topic::iter()
            .map(|topic| (topic, broadcast::channel(capacity).0))
            .collect();

        Self {
            channels: Arc::new(channels),
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        // Every topic gets a channel in `with_capacity`.
        &self.channels[&topic]
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            tracing::trace!("No subscribers for topic {}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("topics", &self.channels.len())
            .finish()
    }
}

impl NotificationSink for EventBus {
    fn notify(&self, event: EntityEvent) {
        self.publish(Event::from(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::EntityView;

    #[test]
    fn routes_controller_events_by_kind() {
        let hit = EntityEvent::new(
            EntityId(1),
            CombatEvent::Damaged {
                amount: 3,
                health_before: 10,
                health_after: 7,
            },
        );
        assert_eq!(Event::from(hit).topic(), Topic::Combat);

        let died = EntityEvent::new(EntityId(1), CombatEvent::Died { destroy: true });
        assert_eq!(
            Event::from(died),
            Event::Lifecycle(LifecycleEvent::Died {
                entity: EntityId(1),
                destroy: true
            })
        );

        let view = EntityView::new(EntityId(1), 7, 10, 0, 5, true);
        let refresh = EntityEvent::new(EntityId(1), CombatEvent::DisplayRefresh(view));
        assert_eq!(Event::from(refresh).topic(), Topic::Display);
    }

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut lifecycle = bus.subscribe(Topic::Lifecycle);
        let mut combat = bus.subscribe(Topic::Combat);

        bus.notify(EntityEvent::new(
            EntityId(2),
            CombatEvent::Healed { amount: 1 },
        ));
        bus.publish(Event::Lifecycle(LifecycleEvent::RemovalRequested {
            entity: EntityId(2),
        }));

        assert_eq!(combat.recv().await.unwrap().entity(), EntityId(2));
        assert_eq!(
            lifecycle.recv().await.unwrap(),
            Event::Lifecycle(LifecycleEvent::RemovalRequested {
                entity: EntityId(2)
            })
        );
        assert!(combat.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(Event::Lifecycle(LifecycleEvent::Saved {
            entity: EntityId(9),
        }));
    }
}
