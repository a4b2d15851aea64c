use std::fmt;

use crate::config::EntityConfig;
use crate::error::EntityError;

use super::view::EntityView;

/// Unique identifier for any living entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Health, armor and policy of one living entity.
///
/// # Invariants
///
/// - `0 <= health <= max_health` and `max_health > 0`
/// - `0 <= armor <= max_armor` and `max_armor > 0`
/// - `config.armor_damage_reduction >= 1`
/// - `alive` only ever goes from `true` to `false`
///
/// Fields are private so the invariants can only be broken by this crate.
/// Deserialized records go through the same checks as [`EntityState::new`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawEntityState"))]
pub struct EntityState {
    id: EntityId,
    health: u32,
    max_health: u32,
    armor: u32,
    max_armor: u32,
    alive: bool,
    config: EntityConfig,
}

impl EntityState {
    /// Builds a living entity, rejecting data that violates the invariants.
    pub fn new(
        id: EntityId,
        health: u32,
        max_health: u32,
        armor: u32,
        max_armor: u32,
        config: EntityConfig,
    ) -> Result<Self, EntityError> {
        Self::checked(id, health, max_health, armor, max_armor, true, config)
    }

    /// Shared validation. Dead records may carry any health up to the maximum.
    fn checked(
        id: EntityId,
        health: u32,
        max_health: u32,
        armor: u32,
        max_armor: u32,
        alive: bool,
        config: EntityConfig,
    ) -> Result<Self, EntityError> {
        if max_health == 0 {
            return Err(EntityError::ZeroMaxHealth);
        }
        if max_armor == 0 {
            return Err(EntityError::ZeroMaxArmor);
        }
        if alive && health == 0 {
            return Err(EntityError::ZeroStartingHealth);
        }
        if health > max_health {
            return Err(EntityError::HealthAboveMax { health, max_health });
        }
        if armor > max_armor {
            return Err(EntityError::ArmorAboveMax { armor, max_armor });
        }
        config.validate()?;

        Ok(Self {
            id,
            health,
            max_health,
            armor,
            max_armor,
            alive,
            config,
        })
    }

    /// Builds an entity spawned at full health and full armor.
    pub fn at_max(
        id: EntityId,
        max_health: u32,
        max_armor: u32,
        config: EntityConfig,
    ) -> Result<Self, EntityError> {
        Self::new(id, max_health, max_health, max_armor, max_armor, config)
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn armor(&self) -> u32 {
        self.armor
    }

    pub fn max_armor(&self) -> u32 {
        self.max_armor
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn config(&self) -> &EntityConfig {
        &self.config
    }

    /// Read-only view for display collaborators.
    pub fn view(&self) -> EntityView {
        EntityView::new(
            self.id,
            self.health,
            self.max_health,
            self.armor,
            self.max_armor,
            self.alive,
        )
    }

    pub(crate) fn set_health(&mut self, health: u32) {
        self.health = health.min(self.max_health);
    }

    pub(crate) fn set_armor(&mut self, armor: u32) {
        self.armor = armor.min(self.max_armor);
    }

    pub(crate) fn mark_dead(&mut self) {
        self.alive = false;
    }

    pub(crate) fn config_mut(&mut self) -> &mut EntityConfig {
        &mut self.config
    }
}

/// Unchecked wire form of [`EntityState`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawEntityState {
    id: EntityId,
    health: u32,
    max_health: u32,
    armor: u32,
    max_armor: u32,
    alive: bool,
    config: EntityConfig,
}

#[cfg(feature = "serde")]
impl TryFrom<RawEntityState> for EntityState {
    type Error = EntityError;

    fn try_from(raw: RawEntityState) -> Result<Self, Self::Error> {
        Self::checked(
            raw.id,
            raw.health,
            raw.max_health,
            raw.armor,
            raw.max_armor,
            raw.alive,
            raw.config,
        )
    }
}

impl Default for EntityState {
    /// Stock living entity: 20 health, 20 armor, default policy.
    fn default() -> Self {
        Self {
            id: EntityId::default(),
            health: 20,
            max_health: 20,
            armor: 20,
            max_armor: 20,
            alive: true,
            config: EntityConfig::default(),
        }
    }
}
