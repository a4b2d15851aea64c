//! In-memory EntityRepository implementation for tests and local runs.

use std::collections::BTreeMap;
use std::sync::RwLock;

use combat_core::{EntityId, EntityState};

use super::error::{RepositoryError, Result};
use super::traits::EntityRepository;

#[derive(Debug, Default)]
pub struct InMemoryEntityRepository {
    entities: RwLock<BTreeMap<EntityId, EntityState>>,
}

impl InMemoryEntityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EntityRepository for InMemoryEntityRepository {
    fn save(&self, state: &EntityState) -> Result<()> {
        let mut entities = self
            .entities
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        entities.insert(state.id(), state.clone());
        Ok(())
    }

    fn load(&self, id: EntityId) -> Result<Option<EntityState>> {
        let entities = self
            .entities
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(entities.get(&id).cloned())
    }

    fn exists(&self, id: EntityId) -> bool {
        self.entities
            .read()
            .map(|e| e.contains_key(&id))
            .unwrap_or(false)
    }

    fn delete(&self, id: EntityId) -> Result<()> {
        let mut entities = self
            .entities
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        entities.remove(&id);
        Ok(())
    }

    fn list_ids(&self) -> Result<Vec<EntityId>> {
        let entities = self
            .entities
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(entities.keys().copied().collect())
    }
}
