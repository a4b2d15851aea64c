//! End-to-end behavior of entities spawned in an arena.

use std::sync::Arc;
use std::time::Duration;

use combat_content::TemplateLoader;
use combat_core::{EntityConfig, EntityId, EntityState, LifeState};
use combat_runtime::{
    Arena, EntityRepository, Event, FileEntityRepository, InMemoryEntityRepository,
    LifecycleEvent, RuntimeConfig, RuntimeError, Topic,
};
use tokio::sync::broadcast;
use tokio::time::Instant;

fn grunt(id: u32) -> EntityState {
    EntityState::at_max(EntityId(id), 20, 20, EntityConfig::default()).unwrap()
}

async fn next_lifecycle(rx: &mut broadcast::Receiver<Event>) -> LifecycleEvent {
    match rx.recv().await.unwrap() {
        Event::Lifecycle(event) => event,
        other => panic!("unexpected event on lifecycle topic: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn delayed_kill_fires_after_its_delay() {
    let arena = Arena::builder().build().unwrap();
    let mut lifecycle = arena.subscribe(Topic::Lifecycle);
    let handle = arena.spawn(grunt(1)).unwrap();

    let started = Instant::now();
    assert!(handle.kill_after(Duration::from_secs(2)).await.unwrap().is_some());
    assert_eq!(handle.life_state().await.unwrap(), LifeState::PendingDelayedKill);

    tokio::time::sleep(Duration::from_millis(1_999)).await;
    handle.take_damage(4).await.unwrap();
    let state = handle.snapshot().await.unwrap();
    assert!(state.is_alive());
    assert_eq!(state.armor(), 16);

    assert_eq!(
        next_lifecycle(&mut lifecycle).await,
        LifecycleEvent::Died {
            entity: EntityId(1),
            destroy: false
        }
    );
    assert!(started.elapsed() >= Duration::from_secs(2));
    assert!(!handle.snapshot().await.unwrap().is_alive());
    assert!(arena.contains(EntityId(1)));
}

#[tokio::test(start_paused = true)]
async fn forced_delayed_kill_removes_the_entity() {
    let arena = Arena::builder().build().unwrap();
    let mut lifecycle = arena.subscribe(Topic::Lifecycle);
    let handle = arena.spawn(grunt(2)).unwrap();

    handle
        .kill_after_delay(true, Duration::from_millis(500))
        .await
        .unwrap();

    assert_eq!(
        next_lifecycle(&mut lifecycle).await,
        LifecycleEvent::Died {
            entity: EntityId(2),
            destroy: true
        }
    );
    assert_eq!(
        next_lifecycle(&mut lifecycle).await,
        LifecycleEvent::RemovalRequested {
            entity: EntityId(2)
        }
    );
    assert!(!arena.contains(EntityId(2)));
    assert!(matches!(
        handle.snapshot().await,
        Err(RuntimeError::CommandChannelClosed)
    ));
}

#[tokio::test(start_paused = true)]
async fn cancelled_kill_never_fires() {
    let arena = Arena::builder().build().unwrap();
    let handle = arena.spawn(grunt(3)).unwrap();

    handle.kill_after(Duration::from_secs(1)).await.unwrap();
    assert_eq!(handle.cancel_pending_kills().await.unwrap(), 1);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(handle.life_state().await.unwrap(), LifeState::Alive);
}

#[tokio::test]
async fn lethal_damage_saves_to_the_repository() {
    let repository = Arc::new(InMemoryEntityRepository::new());
    let arena = Arena::builder()
        .repository(repository.clone())
        .build()
        .unwrap();
    let mut lifecycle = arena.subscribe(Topic::Lifecycle);
    let handle = arena.spawn(grunt(4)).unwrap();

    handle.take_damage(1_000).await.unwrap();

    // The death is announced by the entity worker; the write lands afterwards.
    assert!(matches!(
        next_lifecycle(&mut lifecycle).await,
        LifecycleEvent::Died { .. }
    ));
    assert_eq!(
        next_lifecycle(&mut lifecycle).await,
        LifecycleEvent::Saved {
            entity: EntityId(4)
        }
    );
    let saved = repository.load(EntityId(4)).unwrap().unwrap();
    assert!(!saved.is_alive());
    assert_eq!(saved.health(), 0);
}

#[tokio::test]
async fn persistence_from_config_writes_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = RuntimeConfig {
        enable_persistence: true,
        save_data_dir: dir.path().join("saves"),
        ..RuntimeConfig::default()
    };
    let arena = Arena::builder().config(config).build().unwrap();
    let handle = arena.spawn(grunt(5)).unwrap();

    handle.kill().await.unwrap();
    arena.shutdown().await.unwrap();

    let repository = FileEntityRepository::new(dir.path().join("saves")).unwrap();
    assert_eq!(repository.list_ids().unwrap(), vec![EntityId(5)]);
}

#[tokio::test]
async fn template_policy_flows_through_the_arena() {
    let catalog = TemplateLoader::builtin().unwrap();
    let arena = Arena::builder().build().unwrap();
    let mut lifecycle = arena.subscribe(Topic::Lifecycle);

    let dummy = arena.spawn(catalog.spawn("training_dummy", EntityId(6)).unwrap()).unwrap();
    dummy.take_damage(1_000).await.unwrap();
    assert!(dummy.snapshot().await.unwrap().is_alive());

    let crate_ = arena.spawn(catalog.spawn("crate", EntityId(7)).unwrap()).unwrap();
    crate_.take_damage(10).await.unwrap();
    assert_eq!(
        next_lifecycle(&mut lifecycle).await,
        LifecycleEvent::Died {
            entity: EntityId(7),
            destroy: true
        }
    );
    assert!(!arena.contains(EntityId(7)));
    assert!(arena.contains(EntityId(6)));
}

#[tokio::test]
async fn concurrent_callers_are_serialized() {
    let arena = Arena::builder().build().unwrap();
    let handle = arena.spawn(grunt(8)).unwrap();

    let mut tasks = Vec::new();
    for _ in 0..10 {
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move { handle.take_damage(1).await }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let state = handle.snapshot().await.unwrap();
    assert_eq!(state.armor(), 10);
    assert_eq!(state.health(), 20);
}

#[tokio::test]
async fn spawn_publishes_initial_refresh_and_rejects_duplicates() {
    let arena = Arena::builder().build().unwrap();
    let mut display = arena.subscribe(Topic::Display);

    arena.spawn(grunt(9)).unwrap();
    match display.recv().await.unwrap() {
        Event::Display(event) => {
            assert_eq!(event.entity(), EntityId(9));
            assert_eq!(event.view.health, 20);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    assert!(matches!(
        arena.spawn(grunt(9)),
        Err(RuntimeError::DuplicateEntity(EntityId(9)))
    ));
}

#[tokio::test]
async fn shutdown_stops_every_worker() {
    let arena = Arena::builder().build().unwrap();
    let first = arena.spawn(grunt(10)).unwrap();
    let second = arena.spawn(grunt(11)).unwrap();
    second.kill_with(true).await.unwrap();

    arena.clone().shutdown().await.unwrap();

    assert!(arena.is_empty());
    assert!(first.heal(1).await.is_err());
}

#[tokio::test]
async fn refresh_display_republishes_current_view() {
    let arena = Arena::builder().build().unwrap();
    let handle = arena.spawn(grunt(12)).unwrap();
    handle.take_damage(4).await.unwrap();

    let mut display = arena.subscribe(Topic::Display);
    handle.refresh_display().await.unwrap();

    match display.recv().await.unwrap() {
        Event::Display(event) => {
            assert_eq!(event.entity(), EntityId(12));
            assert_eq!(event.view.armor, 16);
            assert_eq!(event.view.health, 18);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}
