//! Event payloads for each topic.

use combat_core::{EntityId, EntityView};
use serde::{Deserialize, Serialize};

/// Events about an entity entering or leaving the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    /// The entity died. `destroy` tells whether removal follows.
    Died { entity: EntityId, destroy: bool },

    /// The entity was dropped from the arena registry.
    RemovalRequested { entity: EntityId },

    /// The entity was written to the save repository on death.
    Saved { entity: EntityId },

    /// Saving on death failed; the death itself still completed.
    SaveFailed { entity: EntityId, reason: String },
}

impl LifecycleEvent {
    pub fn entity(&self) -> EntityId {
        match self {
            LifecycleEvent::Died { entity, .. }
            | LifecycleEvent::RemovalRequested { entity }
            | LifecycleEvent::Saved { entity }
            | LifecycleEvent::SaveFailed { entity, .. } => *entity,
        }
    }
}

/// Redraw request for presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayEvent {
    pub view: EntityView,
}

impl DisplayEvent {
    pub fn entity(&self) -> EntityId {
        self.view.entity
    }
}
