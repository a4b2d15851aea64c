//! Repository layer for entities saved on death.
//!
//! Static templates are handled by `combat-content`, not repositories.

mod error;
mod file;
mod memory;
mod persistence;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileEntityRepository;
pub use memory::InMemoryEntityRepository;
pub use persistence::RepositoryPersistence;
pub use traits::EntityRepository;
