//! In-memory collaborators for headless testing.
//!
//! Everything here records what the controller asked for so tests can assert
//! on it. [`ManualScheduler`] runs on a virtual clock advanced explicitly by
//! the test, which keeps delayed-kill tests deterministic.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::controller::CombatController;
use crate::error::{PersistenceError, ScheduleError};
use crate::event::{CombatEventKind, EntityEvent};
use crate::ports::{
    DueKill, LifecycleCollaborator, NotificationSink, PendingKill, PersistenceCollaborator,
    ScheduleHandle, Scheduler,
};
use crate::state::{EntityId, EntityState};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sink that keeps every notification in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<EntityEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EntityEvent> {
        lock(&self.events).clone()
    }

    pub fn kinds(&self) -> Vec<CombatEventKind> {
        lock(&self.events)
            .iter()
            .map(EntityEvent::kind)
            .collect()
    }

    pub fn count(&self, kind: CombatEventKind) -> usize {
        lock(&self.events)
            .iter()
            .filter(|e| e.kind() == kind)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.events).is_empty()
    }

    pub fn clear(&self) {
        lock(&self.events).clear();
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, event: EntityEvent) {
        lock(&self.events).push(event);
    }
}

/// Persistence that keeps a copy of every saved entity.
#[derive(Debug, Default)]
pub struct RecordingPersistence {
    saved: Mutex<Vec<EntityState>>,
}

impl RecordingPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self) -> Vec<EntityState> {
        lock(&self.saved).clone()
    }
}

impl PersistenceCollaborator for RecordingPersistence {
    fn save(&self, state: &EntityState) -> Result<(), PersistenceError> {
        lock(&self.saved).push(state.clone());
        Ok(())
    }
}

/// Persistence whose every save fails.
#[derive(Debug, Default)]
pub struct FailingPersistence;

impl PersistenceCollaborator for FailingPersistence {
    fn save(&self, state: &EntityState) -> Result<(), PersistenceError> {
        Err(PersistenceError::SaveFailed {
            entity: state.id(),
            reason: "simulated failure".into(),
        })
    }
}

/// Lifecycle that records removal requests.
#[derive(Debug, Default)]
pub struct RecordingLifecycle {
    removed: Mutex<Vec<EntityId>>,
}

impl RecordingLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn removed(&self) -> Vec<EntityId> {
        lock(&self.removed).clone()
    }
}

impl LifecycleCollaborator for RecordingLifecycle {
    fn request_removal(&self, entity: EntityId) {
        lock(&self.removed).push(entity);
    }
}

#[derive(Debug)]
struct Scheduled {
    due_at: Duration,
    due: DueKill,
}

#[derive(Debug, Default)]
struct VirtualClock {
    now: Duration,
    next_handle: u64,
    queue: Vec<Scheduled>,
    shut_down: bool,
}

/// Scheduler driven by a virtual clock.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    clock: Mutex<VirtualClock>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        lock(&self.clock).now
    }

    /// Number of kills scheduled and not yet returned by [`Self::advance`].
    pub fn outstanding(&self) -> usize {
        lock(&self.clock).queue.len()
    }

    /// Refuse every later `schedule` call.
    pub fn shut_down(&self) {
        lock(&self.clock).shut_down = true;
    }

    /// Move the clock forward and return the kills that came due, earliest first.
    pub fn advance(&self, by: Duration) -> Vec<DueKill> {
        let mut clock = lock(&self.clock);
        clock.now += by;
        let now = clock.now;

        let (mut due, waiting): (Vec<_>, Vec<_>) =
            clock.queue.drain(..).partition(|s| s.due_at <= now);
        clock.queue = waiting;

        due.sort_by_key(|s| (s.due_at, s.due.handle));
        due.into_iter().map(|s| s.due).collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(
        &self,
        entity: EntityId,
        delay: Duration,
        kill: PendingKill,
    ) -> Result<ScheduleHandle, ScheduleError> {
        let mut clock = lock(&self.clock);
        if clock.shut_down {
            return Err(ScheduleError::ShutDown);
        }
        let handle = ScheduleHandle(clock.next_handle);
        clock.next_handle += 1;
        let due_at = clock.now + delay;
        clock.queue.push(Scheduled {
            due_at,
            due: DueKill {
                entity,
                handle,
                kill,
            },
        });
        Ok(handle)
    }

    fn cancel(&self, handle: ScheduleHandle) -> bool {
        let mut clock = lock(&self.clock);
        let before = clock.queue.len();
        clock.queue.retain(|s| s.due.handle != handle);
        clock.queue.len() != before
    }
}

/// A controller wired to recording collaborators.
///
/// The initial display refresh emitted on construction is cleared so tests
/// start from an empty event log.
pub struct CombatHarness {
    pub controller: CombatController,
    pub sink: Arc<RecordingSink>,
    pub scheduler: Arc<ManualScheduler>,
    pub persistence: Arc<RecordingPersistence>,
    pub lifecycle: Arc<RecordingLifecycle>,
}

impl CombatHarness {
    pub fn new(state: EntityState) -> Self {
        Self::build(state, None)
    }

    /// Same as [`Self::new`] but every save fails.
    pub fn with_failing_persistence(state: EntityState) -> Self {
        Self::build(state, Some(Arc::new(FailingPersistence)))
    }

    fn build(state: EntityState, persistence: Option<Arc<dyn PersistenceCollaborator>>) -> Self {
        let sink = Arc::new(RecordingSink::new());
        let scheduler = Arc::new(ManualScheduler::new());
        let recording = Arc::new(RecordingPersistence::new());
        let lifecycle = Arc::new(RecordingLifecycle::new());

        let persistence: Arc<dyn PersistenceCollaborator> =
            persistence.unwrap_or_else(|| recording.clone() as Arc<dyn PersistenceCollaborator>);

        let controller = CombatController::builder(state)
            .sink(sink.clone())
            .scheduler(scheduler.clone())
            .persistence(persistence)
            .lifecycle(lifecycle.clone())
            .build();
        sink.clear();

        Self {
            controller,
            sink,
            scheduler,
            persistence: recording,
            lifecycle,
        }
    }

    /// Advance the virtual clock and deliver every kill that came due.
    pub fn advance(&mut self, by: Duration) -> usize {
        let due = self.scheduler.advance(by);
        let fired = due.len();
        for kill in due {
            self.controller.fire_pending_kill(kill);
        }
        fired
    }
}
