//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination and repositories so clients can
//! bubble them up with consistent context.

use combat_core::EntityId;
use thiserror::Error;
use tokio::sync::oneshot;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("entity {0} is already registered in the arena")]
    DuplicateEntity(EntityId),

    #[error("entity worker command channel closed")]
    CommandChannelClosed,

    #[error("entity worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("entity worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
