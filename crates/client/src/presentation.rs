//! One-line descriptions of bus events.

use combat_core::CombatEvent;
use combat_runtime::{Event, LifecycleEvent};

pub fn describe(event: &Event) -> String {
    match event {
        Event::Combat(event) => {
            let entity = event.entity;
            match &event.event {
                CombatEvent::Damaged {
                    amount,
                    health_before,
                    health_after,
                } => format!("{entity} takes {amount} damage ({health_before} -> {health_after})"),
                CombatEvent::ArmorBroken { overflow } => {
                    format!("{entity} armor broken, {overflow} damage overflows")
                }
                CombatEvent::Healed { amount } => format!("{entity} heals {amount}"),
                CombatEvent::ArmorRepaired { amount } => {
                    format!("{entity} repairs {amount} armor")
                }
                other => format!("{entity} {}", other.name()),
            }
        }
        Event::Lifecycle(event) => match event {
            LifecycleEvent::Died { entity, destroy } if *destroy => {
                format!("{entity} dies and is destroyed")
            }
            LifecycleEvent::Died { entity, .. } => format!("{entity} dies"),
            LifecycleEvent::RemovalRequested { entity } => format!("{entity} removed from arena"),
            LifecycleEvent::Saved { entity } => format!("{entity} saved"),
            LifecycleEvent::SaveFailed { entity, reason } => {
                format!("{entity} could not be saved: {reason}")
            }
        },
        Event::Display(event) => {
            let view = event.view;
            format!(
                "{} [{}] hp {}/{} armor {}/{}",
                view.entity,
                view.threshold(),
                view.health,
                view.max_health,
                view.armor,
                view.max_armor
            )
        }
    }
}
