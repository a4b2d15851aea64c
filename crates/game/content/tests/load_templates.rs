use std::fs;

use combat_content::TemplateLoader;
use combat_core::{EntityError, EntityId};

#[test]
fn loads_toml_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("arena.toml");
    fs::write(
        &path,
        r#"
        [[entity]]
        name = "sentry"
        max_health = 30
        max_armor = 12
        armor_damage_reduction = 4
        "#,
    )
    .unwrap();

    let catalog = TemplateLoader::load(&path).unwrap();
    let state = catalog.spawn("sentry", EntityId(5)).unwrap();
    assert_eq!(state.health(), 30);
    assert_eq!(state.armor(), 12);
    assert_eq!(state.config().armor_damage_reduction, 4);
}

#[test]
fn loads_ron_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("arena.ron");
    fs::write(
        &path,
        r#"[(name: "dummy", max_health: 8, max_armor: 2, invincible: true)]"#,
    )
    .unwrap();

    let catalog = TemplateLoader::load(&path).unwrap();
    assert!(catalog.get("dummy").unwrap().invincible);
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("arena.json");
    fs::write(&path, "[]").unwrap();
    assert!(TemplateLoader::load(&path).is_err());
}

#[test]
fn invalid_values_load_but_fail_to_spawn() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(
        &path,
        r#"
        [[entity]]
        name = "paper"
        max_health = 0
        max_armor = 1
        "#,
    )
    .unwrap();

    let catalog = TemplateLoader::load(&path).unwrap();
    let err = catalog.spawn("paper", EntityId(1)).unwrap_err();
    assert_eq!(
        err.downcast_ref::<EntityError>(),
        Some(&EntityError::ZeroMaxHealth)
    );
}
