//! Name-indexed collection of entity templates.

use std::collections::BTreeMap;

use anyhow::{Context, bail};
use combat_core::{EntityId, EntityState};

use crate::template::EntityTemplate;

/// Templates keyed by name.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: BTreeMap<String, EntityTemplate>,
}

impl TemplateCatalog {
    /// Builds a catalog, rejecting duplicate or empty names.
    pub fn from_templates(
        templates: impl IntoIterator<Item = EntityTemplate>,
    ) -> anyhow::Result<Self> {
        let mut catalog = Self::default();
        for template in templates {
            catalog.insert(template)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, template: EntityTemplate) -> anyhow::Result<()> {
        if template.name.trim().is_empty() {
            bail!("entity template name must not be empty");
        }
        if self.templates.contains_key(&template.name) {
            bail!("duplicate entity template '{}'", template.name);
        }
        self.templates.insert(template.name.clone(), template);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&EntityTemplate> {
        self.templates.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Builds a validated entity from the named template.
    ///
    /// Validation failures keep the [`combat_core::EntityError`] as the
    /// error source so callers can downcast it.
    pub fn spawn(&self, name: &str, id: EntityId) -> anyhow::Result<EntityState> {
        let Some(template) = self.get(name) else {
            bail!("unknown entity template '{name}'");
        };
        template
            .build(id)
            .with_context(|| format!("invalid entity template '{name}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::EntityError;

    #[test]
    fn duplicates_are_rejected() {
        let result = TemplateCatalog::from_templates([
            EntityTemplate::new("grunt", 20, 20),
            EntityTemplate::new("grunt", 10, 10),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn spawn_builds_named_template() {
        let catalog =
            TemplateCatalog::from_templates([EntityTemplate::new("brute", 40, 30)]).unwrap();
        let state = catalog.spawn("brute", EntityId(2)).unwrap();
        assert_eq!(state.id(), EntityId(2));
        assert_eq!(state.max_health(), 40);
        assert!(catalog.spawn("ghost", EntityId(3)).is_err());
    }

    #[test]
    fn spawn_keeps_validation_error() {
        let mut template = EntityTemplate::new("hollow", 10, 10);
        template.armor = Some(12);
        let catalog = TemplateCatalog::from_templates([template]).unwrap();

        let err = catalog.spawn("hollow", EntityId(1)).unwrap_err();
        assert_eq!(
            err.downcast_ref::<EntityError>(),
            Some(&EntityError::ArmorAboveMax {
                armor: 12,
                max_armor: 10
            })
        );
    }
}
