//! Topic-based event bus for combat notifications.
//!
//! Controllers publish through the bus as their [`combat_core::NotificationSink`];
//! audio, animation and display consumers subscribe only to the topics they
//! need.

mod bus;
mod types;

pub use bus::{DEFAULT_EVENT_CAPACITY, Event, EventBus, Topic};
pub use types::{DisplayEvent, LifecycleEvent};
