//! The scripted fight between two template entities.

use std::collections::HashSet;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use combat_content::TemplateCatalog;
use combat_core::EntityId;
use combat_runtime::{Arena, Event, LifecycleEvent, Topic};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

/// Extra time allowed past the delayed kill before giving up.
const GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct SkirmishOptions {
    /// Template fought down with damage.
    pub first: String,
    /// Template killed on a timer.
    pub second: String,
    pub kill_delay: Duration,
    /// Force removal when the delayed kill fires.
    pub force_destroy: bool,
}

impl Default for SkirmishOptions {
    fn default() -> Self {
        Self {
            first: "grunt".into(),
            second: "brute".into(),
            kill_delay: Duration::from_secs(2),
            force_destroy: true,
        }
    }
}

/// Spawns both entities, runs the script and waits until both are dead.
///
/// The first entity is beaten through its armor, patched up, and finished
/// off. The second gets a delayed kill, then is hit and healed while the
/// timer runs.
pub async fn run_skirmish(
    arena: &Arena,
    catalog: &TemplateCatalog,
    options: &SkirmishOptions,
) -> Result<()> {
    let mut lifecycle = arena.subscribe(Topic::Lifecycle);

    let first = arena.spawn(catalog.spawn(&options.first, EntityId(1))?)?;
    let second = arena.spawn(catalog.spawn(&options.second, EntityId(2))?)?;
    info!(first = %first.id(), second = %second.id(), "skirmish started");

    let scheduled = second
        .kill_after_delay(options.force_destroy, options.kill_delay)
        .await?;
    if scheduled.is_none() {
        bail!("delayed kill for {} was not scheduled", second.id());
    }

    first.take_damage(12).await?;
    first.take_damage(15).await?;
    second.take_damage(3).await?;
    first.heal(5).await?;
    first.repair_armor(10).await?;
    second.heal_full().await?;
    first.take_damage(40).await?;
    if first.snapshot().await?.is_alive() {
        first.kill().await?;
    }

    let mut pending: HashSet<EntityId> = [first.id(), second.id()].into();
    tokio::time::timeout(options.kill_delay + GRACE, async {
        while !pending.is_empty() {
            match lifecycle.recv().await {
                Ok(Event::Lifecycle(LifecycleEvent::Died { entity, .. })) => {
                    pending.remove(&entity);
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "lifecycle subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
    .await
    .context("timed out waiting for both entities to die")?;

    if !pending.is_empty() {
        bail!("event bus closed before every entity died");
    }
    info!("skirmish finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_content::TemplateLoader;

    #[tokio::test(start_paused = true)]
    async fn builtin_skirmish_ends_with_both_dead() {
        let catalog = TemplateLoader::builtin().unwrap();
        let arena = Arena::builder().build().unwrap();

        run_skirmish(&arena, &catalog, &SkirmishOptions::default())
            .await
            .unwrap();

        let first = arena.get(EntityId(1)).unwrap();
        assert!(!first.snapshot().await.unwrap().is_alive());
        // Forced delayed kill removes the second entity.
        assert!(!arena.contains(EntityId(2)));
    }

    #[tokio::test]
    async fn unknown_template_fails() {
        let catalog = TemplateLoader::builtin().unwrap();
        let arena = Arena::builder().build().unwrap();
        let options = SkirmishOptions {
            first: "dragon".into(),
            ..SkirmishOptions::default()
        };

        assert!(run_skirmish(&arena, &catalog, &options).await.is_err());
    }
}
