//! Combat arithmetic.
//!
//! This module provides pure functions for the numeric side of combat.
//! All functions are deterministic and side-effect free; the controller
//! applies their results to [`crate::state::EntityState`] and emits events.
//!
//! # Core Functions
//!
//! - `mitigate`: armor-filtered damage (soft while armor holds, hard once it breaks)
//! - `apply_damage`: health reduction (clamped to 0)
//! - `restore`: capped refill used by heal and armor repair

pub mod damage;
pub mod restore;

pub use damage::{Mitigation, apply_damage, mitigate};
pub use restore::restore;
