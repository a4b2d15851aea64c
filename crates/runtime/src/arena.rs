//! Registry of live entities and composition root for their workers.
//!
//! [`Arena`] spawns one [`EntityWorker`] per entity, wires its controller to
//! the shared [`EventBus`], a per-entity [`TokioScheduler`] and the configured
//! persistence, and removes entities from the registry when their death asks
//! for it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use combat_core::{
    CombatController, EntityId, EntityState, LifecycleCollaborator, NullPersistence,
    PersistenceCollaborator,
};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::api::{EntityHandle, Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::events::{Event, EventBus, LifecycleEvent, Topic};
use crate::repository::{EntityRepository, FileEntityRepository, RepositoryPersistence};
use crate::scheduler::TokioScheduler;
use crate::workers::EntityWorker;

struct ArenaInner {
    config: RuntimeConfig,
    event_bus: EventBus,
    persistence: Arc<dyn PersistenceCollaborator>,
    saver: Option<RepositoryPersistence>,
    save_worker: Mutex<Option<JoinHandle<()>>>,
    entities: Mutex<HashMap<EntityId, EntityHandle>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

/// Registry of spawned entities keyed by [`EntityId`].
///
/// Cloning is cheap; all clones share the same registry.
#[derive(Clone)]
pub struct Arena {
    inner: Arc<ArenaInner>,
}

impl Arena {
    pub fn builder() -> ArenaBuilder {
        ArenaBuilder::new()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.inner.event_bus
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.inner.event_bus.subscribe(topic)
    }

    /// Spawn a worker for `state` and register it.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(&self, state: EntityState) -> Result<EntityHandle> {
        let id = state.id();
        let mut entities = self.lock_entities();
        if entities.contains_key(&id) {
            return Err(RuntimeError::DuplicateEntity(id));
        }

        let (command_tx, command_rx) = mpsc::channel(self.inner.config.command_buffer_size);
        let scheduler = TokioScheduler::new(command_tx.downgrade());
        let removal = ArenaRemoval {
            arena: Arc::downgrade(&self.inner),
        };

        let controller = CombatController::builder(state)
            .sink(Arc::new(self.inner.event_bus.clone()))
            .scheduler(Arc::new(scheduler))
            .persistence(Arc::clone(&self.inner.persistence))
            .lifecycle(Arc::new(removal))
            .build();

        let worker = EntityWorker::new(controller, command_rx);
        let join = tokio::spawn(worker.run());
        self.lock_workers().push(join);

        let handle = EntityHandle::new(id, command_tx, self.inner.event_bus.clone());
        entities.insert(id, handle.clone());
        info!(entity = %id, "entity spawned");
        Ok(handle)
    }

    pub fn get(&self, id: EntityId) -> Option<EntityHandle> {
        self.lock_entities().get(&id).cloned()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.lock_entities().contains_key(&id)
    }

    /// Ids of registered entities, ascending.
    pub fn ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self.lock_entities().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.lock_entities().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stop every worker and wait for them to finish.
    ///
    /// Saves queued by entities that died before shutdown are written first.
    pub async fn shutdown(self) -> Result<()> {
        let handles: Vec<_> = self.lock_entities().drain().map(|(_, h)| h).collect();
        for handle in handles {
            // A closed channel means the worker already stopped on its own.
            let _ = handle.shutdown().await;
        }

        let workers: Vec<_> = self.lock_workers().drain(..).collect();
        for worker in workers {
            worker.await.map_err(RuntimeError::WorkerJoin)?;
        }

        if let Some(saver) = &self.inner.saver {
            saver.shutdown();
        }
        let save_worker = self
            .inner
            .save_worker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(save_worker) = save_worker {
            save_worker.await.map_err(RuntimeError::WorkerJoin)?;
        }
        info!("arena shut down");
        Ok(())
    }

    fn lock_entities(&self) -> std::sync::MutexGuard<'_, HashMap<EntityId, EntityHandle>> {
        self.inner.lock_entities()
    }

    fn lock_workers(&self) -> std::sync::MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.inner
            .workers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ArenaInner {
    fn lock_entities(&self) -> std::sync::MutexGuard<'_, HashMap<EntityId, EntityHandle>> {
        self.entities
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("entities", &self.ids())
            .field("config", &self.inner.config)
            .finish()
    }
}

/// Lifecycle collaborator handed to each controller.
///
/// Holds the arena weakly: controllers live inside workers, and workers must
/// not keep the registry (and therefore their own command senders) alive.
struct ArenaRemoval {
    arena: Weak<ArenaInner>,
}

impl LifecycleCollaborator for ArenaRemoval {
    fn request_removal(&self, entity: EntityId) {
        let Some(arena) = self.arena.upgrade() else {
            warn!(%entity, "removal requested after arena shut down");
            return;
        };
        let removed = arena.lock_entities().remove(&entity);
        if removed.is_none() {
            warn!(%entity, "removal requested for unregistered entity");
            return;
        }
        info!(%entity, "entity removed from arena");
        arena
            .event_bus
            .publish(Event::Lifecycle(LifecycleEvent::RemovalRequested { entity }));
    }
}

/// Builder for [`Arena`].
pub struct ArenaBuilder {
    config: RuntimeConfig,
    event_bus: Option<EventBus>,
    repository: Option<Arc<dyn EntityRepository>>,
}

impl ArenaBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            event_bus: None,
            repository: None,
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Share an existing bus instead of creating one from the config.
    pub fn event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Save dying entities here. Takes precedence over
    /// [`RuntimeConfig::enable_persistence`].
    pub fn repository(mut self, repository: Arc<dyn EntityRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Must be called from within a Tokio runtime when persistence is on.
    pub fn build(self) -> Result<Arena> {
        let event_bus = self
            .event_bus
            .unwrap_or_else(|| EventBus::with_capacity(self.config.event_buffer_size));

        let repository = match self.repository {
            Some(repository) => Some(repository),
            None if self.config.enable_persistence => {
                let repository = FileEntityRepository::new(&self.config.save_data_dir)?;
                Some(Arc::new(repository) as Arc<dyn EntityRepository>)
            }
            None => None,
        };
        let (saver, save_worker) = match repository {
            Some(repository) => {
                let (saver, join) = RepositoryPersistence::spawn(repository, event_bus.clone());
                (Some(saver), Some(join))
            }
            None => (None, None),
        };
        let persistence: Arc<dyn PersistenceCollaborator> = match &saver {
            Some(saver) => Arc::new(saver.clone()),
            None => Arc::new(NullPersistence),
        };

        Ok(Arena {
            inner: Arc::new(ArenaInner {
                config: self.config,
                event_bus,
                persistence,
                saver,
                save_worker: Mutex::new(save_worker),
                entities: Mutex::new(HashMap::new()),
                workers: Mutex::new(Vec::new()),
            }),
        })
    }
}
