//! Common error infrastructure for combat-core.
//!
//! Construction-time validation failures and collaborator failures are
//! modelled as separate `thiserror` enums. Everything that can be reported by
//! the core implements [`CombatError`], which classifies the failure so
//! callers can decide between retrying, rejecting input or investigating.
//!
//! # Design Principles
//!
//! - **Fail fast on bad data**: invalid maxima or divisors are rejected when an
//!   entity is built, never silently clamped
//! - **Collaborators never abort transitions**: persistence and scheduling
//!   errors are logged by the controller and swallowed
//! - **Expected outcomes are not errors**: healing a full entity is reported
//!   through a `bool`, not through this module

use crate::state::EntityId;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the collaborator may succeed on a later attempt.
    ///
    /// Examples: save directory temporarily unavailable, scheduler shutting down
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: zero maximum health, armor divisor of zero
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all combat-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str;
}

/// Rejected entity data (construction-time validation).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EntityError {
    #[error("maximum health must be greater than zero")]
    ZeroMaxHealth,

    #[error("maximum armor must be greater than zero")]
    ZeroMaxArmor,

    #[error("armor damage reduction must be at least 1")]
    ZeroArmorDamageReduction,

    #[error("starting health must be greater than zero")]
    ZeroStartingHealth,

    #[error("health {health} exceeds maximum {max_health}")]
    HealthAboveMax { health: u32, max_health: u32 },

    #[error("armor {armor} exceeds maximum {max_armor}")]
    ArmorAboveMax { armor: u32, max_armor: u32 },
}

impl CombatError for EntityError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroMaxHealth => "ENTITY_ZERO_MAX_HEALTH",
            Self::ZeroMaxArmor => "ENTITY_ZERO_MAX_ARMOR",
            Self::ZeroArmorDamageReduction => "ENTITY_ZERO_ARMOR_REDUCTION",
            Self::ZeroStartingHealth => "ENTITY_ZERO_STARTING_HEALTH",
            Self::HealthAboveMax { .. } => "ENTITY_HEALTH_ABOVE_MAX",
            Self::ArmorAboveMax { .. } => "ENTITY_ARMOR_ABOVE_MAX",
        }
    }
}

/// Failure reported by a [`crate::ports::PersistenceCollaborator`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to save entity {entity}: {reason}")]
    SaveFailed { entity: EntityId, reason: String },

    #[error("persistence backend unavailable: {0}")]
    Unavailable(String),
}

impl CombatError for PersistenceError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SaveFailed { .. } => "PERSISTENCE_SAVE_FAILED",
            Self::Unavailable(_) => "PERSISTENCE_UNAVAILABLE",
        }
    }
}

/// Failure reported by a [`crate::ports::Scheduler`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("scheduler is shut down")]
    ShutDown,

    #[error("scheduler rejected delayed kill for entity {entity}: {reason}")]
    Rejected { entity: EntityId, reason: String },
}

impl CombatError for ScheduleError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ShutDown => ErrorSeverity::Internal,
            Self::Rejected { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ShutDown => "SCHEDULE_SHUT_DOWN",
            Self::Rejected { .. } => "SCHEDULE_REJECTED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_errors_are_validation_errors() {
        let err = EntityError::HealthAboveMax {
            health: 30,
            max_health: 20,
        };
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert_eq!(err.error_code(), "ENTITY_HEALTH_ABOVE_MAX");
        assert_eq!(err.to_string(), "health 30 exceeds maximum 20");
    }

    #[test]
    fn persistence_errors_are_recoverable() {
        let err = PersistenceError::Unavailable("disk full".into());
        assert!(err.severity().is_recoverable());
    }
}
