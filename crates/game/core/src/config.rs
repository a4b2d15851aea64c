//! Per-entity combat policy.

use crate::error::EntityError;

/// Combat policy attached to every living entity.
///
/// By default armor halves the damage it absorbs and deaths are saved.
/// Corpses stay in the world unless removal is requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawEntityConfig"))]
pub struct EntityConfig {
    /// Divisor applied to damage soaked by armor. Must be at least 1.
    pub armor_damage_reduction: u32,
    /// When set, `take_damage` is a complete no-op.
    pub invincible: bool,
    /// Request removal of the owning object when the entity dies.
    pub destroy_on_death: bool,
    /// Hand the entity to the persistence collaborator when it dies.
    pub save_on_death: bool,
}

impl EntityConfig {
    pub const DEFAULT_ARMOR_DAMAGE_REDUCTION: u32 = 2;

    /// Rejects configurations the damage formula cannot evaluate.
    pub fn validate(&self) -> Result<(), EntityError> {
        if self.armor_damage_reduction == 0 {
            return Err(EntityError::ZeroArmorDamageReduction);
        }
        Ok(())
    }

    #[must_use]
    pub const fn with_armor_damage_reduction(mut self, divisor: u32) -> Self {
        self.armor_damage_reduction = divisor;
        self
    }

    #[must_use]
    pub const fn with_invincible(mut self, invincible: bool) -> Self {
        self.invincible = invincible;
        self
    }

    #[must_use]
    pub const fn with_destroy_on_death(mut self, destroy: bool) -> Self {
        self.destroy_on_death = destroy;
        self
    }

    #[must_use]
    pub const fn with_save_on_death(mut self, save: bool) -> Self {
        self.save_on_death = save;
        self
    }
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            armor_damage_reduction: Self::DEFAULT_ARMOR_DAMAGE_REDUCTION,
            invincible: false,
            destroy_on_death: false,
            save_on_death: true,
        }
    }
}

/// Unchecked wire form of [`EntityConfig`]; missing fields take the defaults.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(default)]
struct RawEntityConfig {
    armor_damage_reduction: u32,
    invincible: bool,
    destroy_on_death: bool,
    save_on_death: bool,
}

#[cfg(feature = "serde")]
impl Default for RawEntityConfig {
    fn default() -> Self {
        let config = EntityConfig::default();
        Self {
            armor_damage_reduction: config.armor_damage_reduction,
            invincible: config.invincible,
            destroy_on_death: config.destroy_on_death,
            save_on_death: config.save_on_death,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<RawEntityConfig> for EntityConfig {
    type Error = EntityError;

    fn try_from(raw: RawEntityConfig) -> Result<Self, Self::Error> {
        let config = Self {
            armor_damage_reduction: raw.armor_damage_reduction,
            invincible: raw.invincible,
            destroy_on_death: raw.destroy_on_death,
            save_on_death: raw.save_on_death,
        };
        config.validate()?;
        Ok(config)
    }
}
