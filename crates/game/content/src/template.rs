//! Entity templates: the on-disk description of a spawnable entity.

use combat_core::{EntityConfig, EntityError, EntityId, EntityState};
use serde::{Deserialize, Serialize};

/// A named blueprint for an [`EntityState`].
///
/// `health` and `armor` are optional and default to their maxima. Policy
/// fields default to the values of [`EntityConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTemplate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<u32>,
    pub max_health: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor: Option<u32>,
    pub max_armor: u32,
    #[serde(default = "default_reduction")]
    pub armor_damage_reduction: u32,
    #[serde(default)]
    pub invincible: bool,
    #[serde(default)]
    pub destroy_on_death: bool,
    #[serde(default = "default_save_on_death")]
    pub save_on_death: bool,
}

fn default_reduction() -> u32 {
    EntityConfig::DEFAULT_ARMOR_DAMAGE_REDUCTION
}

fn default_save_on_death() -> bool {
    EntityConfig::default().save_on_death
}

impl EntityTemplate {
    /// Template with the given maxima and every other field defaulted.
    pub fn new(name: impl Into<String>, max_health: u32, max_armor: u32) -> Self {
        let config = EntityConfig::default();
        Self {
            name: name.into(),
            health: None,
            max_health,
            armor: None,
            max_armor,
            armor_damage_reduction: config.armor_damage_reduction,
            invincible: config.invincible,
            destroy_on_death: config.destroy_on_death,
            save_on_death: config.save_on_death,
        }
    }

    pub fn config(&self) -> EntityConfig {
        EntityConfig::default()
            .with_armor_damage_reduction(self.armor_damage_reduction)
            .with_invincible(self.invincible)
            .with_destroy_on_death(self.destroy_on_death)
            .with_save_on_death(self.save_on_death)
    }

    pub fn starting_health(&self) -> u32 {
        self.health.unwrap_or(self.max_health)
    }

    pub fn starting_armor(&self) -> u32 {
        self.armor.unwrap_or(self.max_armor)
    }

    /// Builds a validated entity carrying `id`.
    pub fn build(&self, id: EntityId) -> Result<EntityState, EntityError> {
        EntityState::new(
            id,
            self.starting_health(),
            self.max_health,
            self.starting_armor(),
            self.max_armor,
            self.config(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_values_start_full() {
        let state = EntityTemplate::new("grunt", 20, 20).build(EntityId(3)).unwrap();
        assert_eq!(state.health(), 20);
        assert_eq!(state.armor(), 20);
        assert_eq!(state.config(), &EntityConfig::default());
    }

    #[test]
    fn invalid_templates_surface_entity_errors() {
        let mut template = EntityTemplate::new("broken", 10, 5);
        template.health = Some(11);
        assert_eq!(
            template.build(EntityId(1)),
            Err(EntityError::HealthAboveMax {
                health: 11,
                max_health: 10
            })
        );

        let mut template = EntityTemplate::new("broken", 10, 5);
        template.armor_damage_reduction = 0;
        assert_eq!(
            template.build(EntityId(1)),
            Err(EntityError::ZeroArmorDamageReduction)
        );
    }
}
