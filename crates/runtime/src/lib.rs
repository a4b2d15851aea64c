//! Async runtime for combat entities.
//!
//! This crate wires the pure [`combat_core::CombatController`] into Tokio:
//! each entity is owned by a worker task, delayed kills run on Tokio timers,
//! notifications fan out over a topic-based event bus, and entities that ask
//! for it are saved on death.
//!
//! Modules are organized by responsibility:
//! - [`arena`] hosts the entity registry and its builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`scheduler`] implements delayed kills on Tokio timers
//! - [`repository`] persists entities saved on death
//! - `workers` keeps the per-entity task internal to the crate
pub mod api;
pub mod arena;
pub mod config;
pub mod events;
pub mod repository;
pub mod scheduler;

mod workers;

pub use api::{EntityHandle, Result, RuntimeError};
pub use arena::{Arena, ArenaBuilder};
pub use config::RuntimeConfig;
pub use events::{DisplayEvent, Event, EventBus, LifecycleEvent, Topic};
pub use repository::{
    EntityRepository, FileEntityRepository, InMemoryEntityRepository, RepositoryError,
    RepositoryPersistence,
};
pub use scheduler::TokioScheduler;
