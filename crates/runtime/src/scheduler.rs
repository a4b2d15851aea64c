//! Tokio-backed delayed-kill scheduler.
//!
//! Each scheduled kill is a spawned task that sleeps for the delay and then
//! sends [`Command::FirePendingKill`] to the owning entity's worker. The
//! scheduler holds only a weak sender, so pending timers never keep a worker
//! alive after its handles are gone.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use combat_core::{DueKill, EntityId, PendingKill, ScheduleError, ScheduleHandle, Scheduler};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, trace};

use crate::workers::Command;

type Timers = Arc<Mutex<HashMap<ScheduleHandle, AbortHandle>>>;

/// Scheduler for one entity worker.
pub struct TokioScheduler {
    command_tx: mpsc::WeakSender<Command>,
    next_handle: AtomicU64,
    timers: Timers,
}

impl TokioScheduler {
    pub(crate) fn new(command_tx: mpsc::WeakSender<Command>) -> Self {
        Self {
            command_tx,
            next_handle: AtomicU64::new(0),
            timers: Arc::default(),
        }
    }

    /// Timers that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        self.timers.lock().map(|timers| timers.len()).unwrap_or(0)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(
        &self,
        entity: EntityId,
        delay: Duration,
        kill: PendingKill,
    ) -> Result<ScheduleHandle, ScheduleError> {
        let runtime = Handle::try_current().map_err(|_| ScheduleError::ShutDown)?;
        let Some(command_tx) = self.command_tx.upgrade() else {
            return Err(ScheduleError::ShutDown);
        };
        let mut timers = self.timers.lock().map_err(|_| ScheduleError::Rejected {
            entity,
            reason: "timer table lock poisoned".into(),
        })?;
        // The strong sender is only needed to prove the worker is alive.
        drop(command_tx);

        let handle = ScheduleHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        let due = DueKill {
            entity,
            handle,
            kill,
        };
        let weak_tx = self.command_tx.clone();
        let table = Arc::clone(&self.timers);

        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            let still_pending = table
                .lock()
                .map(|mut timers| timers.remove(&handle).is_some())
                .unwrap_or(false);
            if !still_pending {
                return;
            }
            let Some(command_tx) = weak_tx.upgrade() else {
                trace!(%entity, %handle, "delayed kill dropped: worker gone");
                return;
            };
            if command_tx.send(Command::FirePendingKill(due)).await.is_err() {
                trace!(%entity, %handle, "delayed kill dropped: worker stopped");
            }
        });

        timers.insert(handle, task.abort_handle());
        debug!(%entity, %handle, ?delay, "timer armed");
        Ok(handle)
    }

    fn cancel(&self, handle: ScheduleHandle) -> bool {
        let Ok(mut timers) = self.timers.lock() else {
            return false;
        };
        match timers.remove(&handle) {
            Some(task) => {
                task.abort();
                debug!(%handle, "timer cancelled");
                true
            }
            None => false,
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        if let Ok(mut timers) = self.timers.lock() {
            for (_, task) in timers.drain() {
                task.abort();
            }
        }
    }
}
