//! Entity template loader.
//!
//! TOML files hold an array of `[[entity]]` tables. RON files hold a plain
//! list of templates:
//!
//! ```ron
//! [
//!     (name: "grunt", max_health: 20, max_armor: 20),
//!     (name: "crate", max_health: 5, max_armor: 1, armor: Some(0), destroy_on_death: true),
//! ]
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::catalog::TemplateCatalog;
use crate::loaders::{LoadResult, read_file};
use crate::template::EntityTemplate;

const BUILTIN_TEMPLATES: &str = include_str!("../../data/entities.toml");

#[derive(Debug, Deserialize)]
struct TemplateFile {
    #[serde(default, rename = "entity")]
    entities: Vec<EntityTemplate>,
}

/// Loader for entity templates from TOML or RON files.
pub struct TemplateLoader;

impl TemplateLoader {
    /// Load a catalog, picking the format from the file extension.
    pub fn load(path: &Path) -> LoadResult<TemplateCatalog> {
        let content = read_file(path)?;
        let templates = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::parse_toml(&content)?,
            Some("ron") => Self::parse_ron(&content)?,
            other => anyhow::bail!(
                "Unsupported template format {:?} for {}",
                other.unwrap_or(""),
                path.display()
            ),
        };
        debug!(path = %path.display(), count = templates.len(), "loaded entity templates");
        TemplateCatalog::from_templates(templates)
    }

    /// The catalog compiled into the crate.
    pub fn builtin() -> LoadResult<TemplateCatalog> {
        TemplateCatalog::from_templates(Self::parse_toml(BUILTIN_TEMPLATES)?)
    }

    pub fn parse_toml(content: &str) -> LoadResult<Vec<EntityTemplate>> {
        let file: TemplateFile = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse entity templates TOML: {}", e))?;
        Ok(file.entities)
    }

    pub fn parse_ron(content: &str) -> LoadResult<Vec<EntityTemplate>> {
        ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse entity templates RON: {}", e))
    }
}
