//! Worker tasks that back the runtime orchestration.
//!
//! Each spawned entity gets one worker that owns its controller. A single
//! save worker performs repository writes for the whole arena.

mod entity;
mod persistence;

pub use entity::{Command, EntityWorker};
pub use persistence::{PersistenceWorker, SaveCommand};
