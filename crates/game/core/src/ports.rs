//! Collaborator interfaces the controller depends on.
//!
//! The controller is single-threaded logic that never suspends and never
//! performs I/O. Everything else (timers, persistence, object removal,
//! presentation) sits behind these traits and is injected at construction.
//!
//! | Trait | Called when |
//! |-------|-------------|
//! | [`NotificationSink`] | after every observable state change |
//! | [`Scheduler`] | `kill_after_delay` |
//! | [`PersistenceCollaborator`] | death, when `save_on_death` is set |
//! | [`LifecycleCollaborator`] | death, when removal is requested |
//!
//! None of these may report failure back into a state transition: sinks and
//! lifecycle calls return nothing, persistence and scheduling errors are
//! logged by the controller and dropped.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{PersistenceError, ScheduleError};
use crate::event::EntityEvent;
use crate::state::{EntityId, EntityState};

/// Receives fire-and-forget combat notifications.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, event: EntityEvent);
}

/// Persists an entity when it dies.
pub trait PersistenceCollaborator: Send + Sync {
    fn save(&self, state: &EntityState) -> Result<(), PersistenceError>;
}

/// Removes the owning object from the world.
pub trait LifecycleCollaborator: Send + Sync {
    fn request_removal(&self, entity: EntityId);
}

/// Identifies one scheduled delayed kill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleHandle(pub u64);

impl fmt::Display for ScheduleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// The deferred request: a `kill` with or without forced removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingKill {
    pub force_destroy: bool,
}

/// A delayed kill that has come due and must be handed back to its
/// controller through [`crate::CombatController::fire_pending_kill`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DueKill {
    pub entity: EntityId,
    pub handle: ScheduleHandle,
    pub kill: PendingKill,
}

/// Runs a deferred kill once, after at least `delay` has elapsed.
///
/// Implementations must deliver the resulting [`DueKill`] on the same logical
/// turn sequence as every other operation on that entity (one operation
/// completes before the next begins). The controller never blocks on the
/// timer.
pub trait Scheduler: Send + Sync {
    fn schedule(
        &self,
        entity: EntityId,
        delay: Duration,
        kill: PendingKill,
    ) -> Result<ScheduleHandle, ScheduleError>;

    /// Cancels a scheduled kill. Returns `true` if it had not fired yet.
    ///
    /// Schedulers without cancellation keep the default.
    fn cancel(&self, _handle: ScheduleHandle) -> bool {
        false
    }
}

/// Sink that drops every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _event: EntityEvent) {}
}

/// Persistence that accepts and discards every save.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPersistence;

impl PersistenceCollaborator for NullPersistence {
    fn save(&self, _state: &EntityState) -> Result<(), PersistenceError> {
        Ok(())
    }
}

/// Lifecycle that ignores removal requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLifecycle;

impl LifecycleCollaborator for NullLifecycle {
    fn request_removal(&self, _entity: EntityId) {}
}

/// Scheduler for entities that are never killed on a timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectingScheduler;

impl Scheduler for RejectingScheduler {
    fn schedule(
        &self,
        entity: EntityId,
        _delay: Duration,
        _kill: PendingKill,
    ) -> Result<ScheduleHandle, ScheduleError> {
        Err(ScheduleError::Rejected {
            entity,
            reason: "no scheduler configured".into(),
        })
    }
}

/// Bundle of injected collaborators.
///
/// Missing collaborators default to the null implementations above.
#[derive(Clone)]
pub struct Collaborators {
    pub sink: Arc<dyn NotificationSink>,
    pub scheduler: Arc<dyn Scheduler>,
    pub persistence: Arc<dyn PersistenceCollaborator>,
    pub lifecycle: Arc<dyn LifecycleCollaborator>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            sink: Arc::new(NullSink),
            scheduler: Arc::new(RejectingScheduler),
            persistence: Arc::new(NullPersistence),
            lifecycle: Arc::new(NullLifecycle),
        }
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
