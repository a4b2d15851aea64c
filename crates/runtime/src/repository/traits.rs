//! Repository contract for saving and loading entities.

use combat_core::{EntityId, EntityState};

use super::error::Result;

/// Repository for entity persistence
///
/// Entities are written when they die (if their policy asks for it) and can
/// be read back by id.
pub trait EntityRepository: Send + Sync {
    /// Save an entity, replacing any earlier save with the same id
    fn save(&self, state: &EntityState) -> Result<()>;

    fn load(&self, id: EntityId) -> Result<Option<EntityState>>;

    fn exists(&self, id: EntityId) -> bool;

    fn delete(&self, id: EntityId) -> Result<()>;

    /// List all saved entity ids, ascending
    fn list_ids(&self) -> Result<Vec<EntityId>> {
        Ok(vec![])
    }
}
