//! Deterministic combat rules for living entities.
//!
//! `combat-core` defines how a damageable, healable entity absorbs damage
//! through an armor buffer, dies, and honours immediate or delayed kill
//! requests. It exposes pure APIs that can be driven headlessly by tests or
//! embedded by the async runtime. All state mutation flows through
//! [`controller::CombatController`]; timers, persistence, object removal and
//! presentation are reached only through the traits in [`ports`].
pub mod combat;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod ports;
pub mod state;
pub mod testing;

pub use config::EntityConfig;
pub use controller::{CombatController, ControllerBuilder};
pub use error::{CombatError, EntityError, ErrorSeverity, PersistenceError, ScheduleError};
pub use event::{CombatEvent, CombatEventKind, EntityEvent};
pub use ports::{
    Collaborators, DueKill, LifecycleCollaborator, NotificationSink, NullLifecycle,
    NullPersistence, NullSink, PendingKill, PersistenceCollaborator, RejectingScheduler,
    ScheduleHandle, Scheduler,
};
pub use state::{EntityId, EntityState, EntityView, HealthThreshold, LifeState};
