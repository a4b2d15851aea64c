use super::entity::EntityId;

/// Snapshot handed to display collaborators on every refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityView {
    pub entity: EntityId,
    pub health: u32,
    pub max_health: u32,
    pub armor: u32,
    pub max_armor: u32,
    pub alive: bool,
}

impl EntityView {
    pub const fn new(
        entity: EntityId,
        health: u32,
        max_health: u32,
        armor: u32,
        max_armor: u32,
        alive: bool,
    ) -> Self {
        Self {
            entity,
            health,
            max_health,
            armor,
            max_armor,
            alive,
        }
    }

    /// Health band used by health bars and reaction logic.
    pub fn threshold(&self) -> HealthThreshold {
        if !self.alive {
            return HealthThreshold::Dead;
        }
        HealthThreshold::from_health(self.health, self.max_health)
    }
}

/// Health threshold levels for triggering effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum HealthThreshold {
    /// 100% HP
    Full,
    /// 75-99% HP
    Healthy,
    /// 25-74% HP
    Wounded,
    /// 1-24% HP
    Critical,
    /// 0% HP (dead)
    Dead,
}

impl HealthThreshold {
    /// Calculate health threshold from current and max health.
    pub fn from_health(current: u32, max: u32) -> Self {
        if current == 0 {
            Self::Dead
        } else if max == 0 {
            Self::Full
        } else {
            let percent = (u64::from(current) * 100) / u64::from(max);
            match percent {
                100.. => Self::Full,
                75..=99 => Self::Healthy,
                25..=74 => Self::Wounded,
                _ => Self::Critical,
            }
        }
    }
}

/// Coarse lifecycle of an entity as seen by the kill state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum LifeState {
    Alive,
    /// Alive, with at least one delayed kill still outstanding.
    PendingDelayedKill,
    /// Terminal.
    Dead,
}
