//! Authoritative entity state representation.
//!
//! This module owns the data describing one living entity (health, armor,
//! alive flag, policy) plus the read-only views handed to presentation
//! layers. Runtime layers clone or query this state but mutate it exclusively
//! through [`crate::controller::CombatController`].
mod entity;
mod view;

pub use entity::{EntityId, EntityState};
pub use view::{EntityView, HealthThreshold, LifeState};
