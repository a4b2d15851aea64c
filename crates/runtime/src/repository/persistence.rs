//! Bridges a repository to the controller's persistence collaborator.

use std::sync::Arc;

use combat_core::{EntityState, PersistenceCollaborator, PersistenceError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::traits::EntityRepository;
use crate::events::EventBus;
use crate::workers::{PersistenceWorker, SaveCommand};

/// Queues dying entities for the save worker.
///
/// `save` returns as soon as the state is queued. The write itself and its
/// `Saved`/`SaveFailed` announcement on the lifecycle topic happen on the
/// save worker, in the order deaths were queued.
#[derive(Clone)]
pub struct RepositoryPersistence {
    repository: Arc<dyn EntityRepository>,
    command_tx: mpsc::UnboundedSender<SaveCommand>,
}

impl RepositoryPersistence {
    /// Start the save worker for `repository`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(
        repository: Arc<dyn EntityRepository>,
        event_bus: EventBus,
    ) -> (Self, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let worker = PersistenceWorker::new(Arc::clone(&repository), event_bus, command_rx);
        let join = tokio::spawn(worker.run());
        (
            Self {
                repository,
                command_tx,
            },
            join,
        )
    }

    pub fn repository(&self) -> &Arc<dyn EntityRepository> {
        &self.repository
    }

    /// Ask the save worker to stop once the saves already queued are done.
    pub fn shutdown(&self) {
        // Already stopped if the send fails.
        let _ = self.command_tx.send(SaveCommand::Shutdown);
    }
}

impl PersistenceCollaborator for RepositoryPersistence {
    fn save(&self, state: &EntityState) -> Result<(), PersistenceError> {
        self.command_tx
            .send(SaveCommand::Save(state.clone()))
            .map_err(|_| PersistenceError::Unavailable("save worker stopped".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Event, LifecycleEvent, Topic};
    use crate::repository::{InMemoryEntityRepository, RepositoryError};
    use combat_core::EntityId;

    struct BrokenRepository;

    impl EntityRepository for BrokenRepository {
        fn save(&self, _state: &EntityState) -> crate::repository::Result<()> {
            Err(RepositoryError::LockPoisoned)
        }

        fn load(&self, _id: EntityId) -> crate::repository::Result<Option<EntityState>> {
            Ok(None)
        }

        fn exists(&self, _id: EntityId) -> bool {
            false
        }

        fn delete(&self, _id: EntityId) -> crate::repository::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn success_is_announced() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe(Topic::Lifecycle);
        let repo = Arc::new(InMemoryEntityRepository::new());
        let (persistence, _worker) = RepositoryPersistence::spawn(repo.clone(), bus);

        persistence.save(&EntityState::default()).unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            Event::Lifecycle(LifecycleEvent::Saved {
                entity: EntityId(0)
            })
        );
        assert!(repo.exists(EntityId(0)));
    }

    #[tokio::test]
    async fn failure_is_announced_not_returned() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe(Topic::Lifecycle);
        let (persistence, _worker) = RepositoryPersistence::spawn(Arc::new(BrokenRepository), bus);

        assert!(persistence.save(&EntityState::default()).is_ok());
        assert!(matches!(
            rx.recv().await.unwrap(),
            Event::Lifecycle(LifecycleEvent::SaveFailed { .. })
        ));
    }

    #[tokio::test]
    async fn shutdown_drains_queued_saves() {
        let repo = Arc::new(InMemoryEntityRepository::new());
        let (persistence, worker) = RepositoryPersistence::spawn(repo.clone(), EventBus::new());

        for id in 0..3 {
            let state = EntityState::at_max(EntityId(id), 10, 10, Default::default()).unwrap();
            persistence.save(&state).unwrap();
        }
        persistence.shutdown();
        worker.await.unwrap();

        assert_eq!(
            repo.list_ids().unwrap(),
            vec![EntityId(0), EntityId(1), EntityId(2)]
        );
        assert!(matches!(
            persistence.save(&EntityState::default()),
            Err(PersistenceError::Unavailable(_))
        ));
    }
}
