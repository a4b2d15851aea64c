//! Data-driven entity templates.
//!
//! Templates describe the starting values and death policy of spawnable
//! entities. They are read from TOML or RON files (or the built-in catalog)
//! and turned into validated [`combat_core::EntityState`] values. Content
//! never appears in runtime state; only the entities built from it do.

pub mod catalog;
pub mod template;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::TemplateCatalog;
pub use template::EntityTemplate;

#[cfg(feature = "loaders")]
pub use loaders::{LoadResult, TemplateLoader};
