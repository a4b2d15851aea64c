//! Save worker for entities persisted on death.
//!
//! Controllers hand their final state to [`crate::RepositoryPersistence`],
//! which only enqueues it. This worker drains the queue in order, runs each
//! repository write on the blocking pool so entity workers never wait on
//! disk, and reports every outcome on the lifecycle topic.

use std::sync::Arc;

use combat_core::EntityState;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::events::{Event, EventBus, LifecycleEvent};
use crate::repository::EntityRepository;

/// Commands that can be sent to the save worker
pub enum SaveCommand {
    Save(EntityState),
    /// Stop after every save queued before this command.
    Shutdown,
}

/// Background worker that owns repository writes.
pub struct PersistenceWorker {
    repository: Arc<dyn EntityRepository>,
    event_bus: EventBus,
    command_rx: mpsc::UnboundedReceiver<SaveCommand>,
}

impl PersistenceWorker {
    pub fn new(
        repository: Arc<dyn EntityRepository>,
        event_bus: EventBus,
        command_rx: mpsc::UnboundedReceiver<SaveCommand>,
    ) -> Self {
        Self {
            repository,
            event_bus,
            command_rx,
        }
    }

    /// Main worker loop. Ends on [`SaveCommand::Shutdown`] or when every
    /// sender is gone.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                SaveCommand::Save(state) => self.save(state).await,
                SaveCommand::Shutdown => break,
            }
        }
        debug!("save worker stopped");
    }

    async fn save(&self, state: EntityState) {
        let entity = state.id();
        let repository = Arc::clone(&self.repository);
        let outcome = tokio::task::spawn_blocking(move || repository.save(&state)).await;

        let event = match outcome {
            Ok(Ok(())) => {
                info!(%entity, "entity saved on death");
                LifecycleEvent::Saved { entity }
            }
            Ok(Err(err)) => {
                warn!(%entity, "save on death failed: {err}");
                LifecycleEvent::SaveFailed {
                    entity,
                    reason: err.to_string(),
                }
            }
            Err(join) => {
                warn!(%entity, "save task aborted: {join}");
                LifecycleEvent::SaveFailed {
                    entity,
                    reason: join.to_string(),
                }
            }
        };
        self.event_bus.publish(Event::Lifecycle(event));
    }
}
