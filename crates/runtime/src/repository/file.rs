//! File-based EntityRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use combat_core::{EntityId, EntityState};

use super::error::{RepositoryError, Result};
use super::traits::EntityRepository;

/// Stores each entity as `entity_{id}.json` under a base directory.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-save never leaves a truncated record behind.
#[derive(Debug, Clone)]
pub struct FileEntityRepository {
    base_dir: PathBuf,
}

impl FileEntityRepository {
    /// Create the repository, creating `base_dir` if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn entity_path(&self, id: EntityId) -> PathBuf {
        self.base_dir.join(format!("entity_{}.json", id.0))
    }
}

impl EntityRepository for FileEntityRepository {
    fn save(&self, state: &EntityState) -> Result<()> {
        let path = self.entity_path(state.id());
        let temp_path = path.with_extension("json.tmp");

        let bytes =
            serde_json::to_vec_pretty(state).map_err(|e| RepositoryError::Json(e.to_string()))?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!("Saved entity {} to {}", state.id(), path.display());
        Ok(())
    }

    fn load(&self, id: EntityId) -> Result<Option<EntityState>> {
        let path = self.entity_path(id);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let state = serde_json::from_slice(&bytes).map_err(|e| RepositoryError::Json(e.to_string()))?;

        tracing::debug!("Loaded entity {} from {}", id, path.display());
        Ok(Some(state))
    }

    fn exists(&self, id: EntityId) -> bool {
        self.entity_path(id).exists()
    }

    fn delete(&self, id: EntityId) -> Result<()> {
        let path = self.entity_path(id);
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!("Deleted entity {}", id);
        }
        Ok(())
    }

    fn list_ids(&self) -> Result<Vec<EntityId>> {
        let mut ids = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(raw) = filename
                    .strip_prefix("entity_")
                    .and_then(|s| s.strip_suffix(".json"))
                && let Ok(id) = raw.parse::<u32>()
            {
                ids.push(EntityId(id));
            }
        }

        ids.sort_unstable();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::EntityConfig;
    use combat_core::testing::CombatHarness;

    #[test]
    fn save_load_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileEntityRepository::new(dir.path().join("saves")).unwrap();

        let state = EntityState::new(EntityId(12), 4, 20, 0, 20, EntityConfig::default()).unwrap();
        repo.save(&state).unwrap();
        repo.save(&EntityState::default()).unwrap();

        assert!(repo.exists(EntityId(12)));
        assert_eq!(repo.load(EntityId(12)).unwrap(), Some(state));
        assert_eq!(repo.list_ids().unwrap(), vec![EntityId(0), EntityId(12)]);
        assert!(!dir.path().join("saves/entity_12.json.tmp").exists());

        repo.delete(EntityId(12)).unwrap();
        assert_eq!(repo.load(EntityId(12)).unwrap(), None);
    }

    #[test]
    fn corrupted_file_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileEntityRepository::new(dir.path()).unwrap();
        fs::write(dir.path().join("entity_3.json"), b"{ not json").unwrap();

        assert!(matches!(
            repo.load(EntityId(3)),
            Err(RepositoryError::Json(_))
        ));
    }

    #[test]
    fn record_breaking_entity_invariants_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileEntityRepository::new(dir.path()).unwrap();
        fs::write(
            dir.path().join("entity_1.json"),
            br#"{
                "id": 1,
                "health": 50,
                "max_health": 20,
                "armor": 90,
                "max_armor": 0,
                "alive": true,
                "config": {
                    "armor_damage_reduction": 0,
                    "invincible": false,
                    "destroy_on_death": false,
                    "save_on_death": true
                }
            }"#,
        )
        .unwrap();

        let err = repo.load(EntityId(1)).unwrap_err();
        assert!(matches!(err, RepositoryError::Json(_)));
        // The nested policy is checked while the record is still being read.
        assert!(err.to_string().contains("armor damage reduction must be at least 1"));
    }

    #[test]
    fn health_above_maximum_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileEntityRepository::new(dir.path()).unwrap();
        fs::write(
            dir.path().join("entity_2.json"),
            br#"{"id":2,"health":50,"max_health":20,"armor":5,"max_armor":20,"alive":true,
                "config":{}}"#,
        )
        .unwrap();

        let err = repo.load(EntityId(2)).unwrap_err();
        assert!(err.to_string().contains("health 50 exceeds maximum 20"));
    }

    #[test]
    fn killed_entity_reloads_as_dead() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileEntityRepository::new(dir.path()).unwrap();

        let mut h = CombatHarness::new(EntityState::default());
        h.controller.kill();
        repo.save(h.controller.state()).unwrap();

        let loaded = repo.load(EntityId::default()).unwrap().unwrap();
        assert!(!loaded.is_alive());
        assert_eq!(loaded.health(), 20);
        assert_eq!(&loaded, h.controller.state());
    }
}
