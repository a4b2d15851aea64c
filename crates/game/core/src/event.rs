//! Notifications emitted by the combat controller.
//!
//! Events are fire-and-forget: the controller hands them to a
//! [`crate::ports::NotificationSink`] and never looks at the outcome. Audio,
//! animation and display layers subscribe to these instead of being called
//! directly.

use crate::state::{EntityId, EntityView};

/// A single combat notification.
#[derive(Clone, Debug, PartialEq, Eq, strum::IntoStaticStr, strum::EnumDiscriminants)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
#[strum_discriminants(name(CombatEventKind), derive(Hash))]
pub enum CombatEvent {
    /// Health was reduced by a hit (amount may be 0 for fully soaked hits).
    Damaged {
        amount: u32,
        health_before: u32,
        health_after: u32,
    },

    /// A hit exceeded the remaining armor and emptied it.
    ArmorBroken { overflow: u32 },

    /// Health was restored.
    Healed { amount: u32 },

    /// Armor was restored.
    ArmorRepaired { amount: u32 },

    /// The entity died. `destroy` tells whether removal was requested.
    Died { destroy: bool },

    /// Presentation should redraw from this view.
    DisplayRefresh(EntityView),
}

impl CombatEvent {
    /// Snake-case name of the variant, for logs and metrics.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    pub fn kind(&self) -> CombatEventKind {
        self.into()
    }
}

/// A combat notification tagged with the entity it concerns.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityEvent {
    pub entity: EntityId,
    pub event: CombatEvent,
}

impl EntityEvent {
    pub const fn new(entity: EntityId, event: CombatEvent) -> Self {
        Self { entity, event }
    }

    pub fn kind(&self) -> CombatEventKind {
        self.event.kind()
    }
}
