//! Tests for config loading, shape construction, the scene model and batch ingestion.

use starwatch_core::enums::EntityKind;
use starwatch_core::protocol::{decode_batch, Snapshot};
use starwatch_core::types::{EntityKey, Position, Velocity};
use starwatch_tracking::{Entity, EntityStore};
use starwatch_view::RenderTarget;

use crate::config::{ClientConfig, ConfigError};
use crate::ingest::apply_batch;
use crate::scene::{LayerId, Scene};
use crate::shapes::{ShapeRegistry, ShapeSpec};

fn snapshot(kind: EntityKind, id: u64, pos: (f64, f64), vel: (f64, f64)) -> Snapshot {
    Snapshot {
        kind,
        id,
        position: Position::new(pos.0, pos.1),
        velocity: Velocity::new(vel.0, vel.1),
        radius: None,
    }
}

// ---- Config ----

#[test]
fn test_config_defaults() {
    let config = ClientConfig::default();
    assert_eq!(config.zoom_step, 1.1);
    assert_eq!(config.entity_ttl_secs, None);
    assert_eq!(config.entity_ttl_us(), None);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_from_toml() {
    let config = ClientConfig::from_toml("entity_ttl_secs = 2.5").unwrap();
    assert_eq!(config.zoom_step, 1.1);
    assert_eq!(config.entity_ttl_us(), Some(2_500_000));

    let config = ClientConfig::from_toml("zoom_step = 1.25\n").unwrap();
    assert_eq!(config.zoom_step, 1.25);
}

#[test]
fn test_config_rejects_bad_values() {
    assert!(matches!(
        ClientConfig::from_toml("zoom_step = 0.9"),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        ClientConfig::from_toml("entity_ttl_secs = -1.0"),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        ClientConfig::from_toml("zoom_step = \"fast\""),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_config_missing_file() {
    assert!(matches!(
        ClientConfig::load("/nonexistent/starwatch.toml"),
        Err(ConfigError::Io(_))
    ));
}

// ---- Shapes ----

#[test]
fn test_default_shapes() {
    let registry = ShapeRegistry::default();
    let ship = Entity::new(&snapshot(EntityKind::Ship, 1, (0.0, 0.0), (0.0, 0.0)), 0);
    let rock = Entity::new(&snapshot(EntityKind::Asteroid, 1, (0.0, 0.0), (0.0, 0.0)), 0);
    let odd = Entity::new(&snapshot(EntityKind::Unknown, 1, (0.0, 0.0), (0.0, 0.0)), 0);

    let ship_shape = registry.spawn(&ship).unwrap();
    assert_eq!(ship_shape.layer, LayerId::Ships);
    assert_eq!(ship_shape.fill, "red");
    assert_eq!(ship_shape.radius, 10.0);

    assert_eq!(registry.spawn(&rock).unwrap().layer, LayerId::Asteroids);
    assert!(registry.spawn(&odd).is_none());
}

#[test]
fn test_registry_is_extensible() {
    let mut registry = ShapeRegistry::default();
    registry.register(EntityKind::Unknown, |e| ShapeSpec {
        layer: LayerId::Ships,
        radius: e.radius() / 2.0,
        fill: "grey".to_string(),
        stroke: "white".to_string(),
    });
    assert!(registry.is_registered(EntityKind::Unknown));

    let odd = Entity::new(&snapshot(EntityKind::Unknown, 4, (0.0, 0.0), (0.0, 0.0)), 0);
    let shape = registry.spawn(&odd).unwrap();
    assert_eq!(shape.fill, "grey");
    assert_eq!(shape.radius, 5.0);

    assert!(!ShapeRegistry::empty().is_registered(EntityKind::Ship));
}

// ---- Scene ----

#[test]
fn test_scene_spawns_once_and_positions_every_tick() {
    let mut store = EntityStore::new();
    store.ingest(&snapshot(EntityKind::Ship, 1, (0.0, 0.0), (10.0, 0.0)), 0);
    store.ingest(&snapshot(EntityKind::Asteroid, 2, (5.0, 5.0), (0.0, 0.0)), 0);
    store.ingest(&snapshot(EntityKind::Unknown, 3, (0.0, 0.0), (0.0, 0.0)), 0);

    let mut scene = Scene::default();
    assert_eq!(scene.update(&store, 500_000), 2);

    let ship_key = EntityKey::new(EntityKind::Ship, 1);
    let ship = scene.drawable(&ship_key).unwrap();
    assert!((ship.position.x - 5.0).abs() < 1e-9);
    assert_eq!(ship.rotation, 0.0);

    assert_eq!(scene.update(&store, 1_000_000), 2);
    assert!((scene.drawable(&ship_key).unwrap().position.x - 10.0).abs() < 1e-9);

    let ships = scene.layer(LayerId::Ships).unwrap();
    assert_eq!(ships.len(), 1);
    assert!(ships.contains(&ship_key));
    assert_eq!(scene.drawables().count(), 2);
    assert!(scene
        .drawable(&EntityKey::new(EntityKind::Unknown, 3))
        .is_none());
}

#[test]
fn test_scene_draws_kind_registered_later() {
    let mut store = EntityStore::new();
    store.ingest(&snapshot(EntityKind::Unknown, 7, (3.0, 4.0), (0.0, 0.0)), 0);

    let mut scene = Scene::default();
    assert_eq!(scene.update(&store, 0), 0);

    scene
        .registry_mut()
        .register(EntityKind::Unknown, |e| ShapeSpec {
            layer: LayerId::Asteroids,
            radius: e.radius(),
            fill: "grey".to_string(),
            stroke: "black".to_string(),
        });
    assert_eq!(scene.update(&store, 0), 1);

    let key = EntityKey::new(EntityKind::Unknown, 7);
    assert_eq!(scene.drawable(&key).unwrap().position, Position::new(3.0, 4.0));
    assert!(scene.layer(LayerId::Asteroids).unwrap().contains(&key));
}

#[test]
fn test_scene_remove() {
    let mut store = EntityStore::new();
    store.ingest(&snapshot(EntityKind::Asteroid, 9, (0.0, 0.0), (0.0, 0.0)), 0);
    let mut scene = Scene::default();
    scene.update(&store, 0);

    let key = EntityKey::new(EntityKind::Asteroid, 9);
    assert!(scene.remove(&key).is_some());
    assert!(scene.layer(LayerId::Asteroids).unwrap().is_empty());
    assert!(scene.remove(&key).is_none());
}

#[test]
fn test_screen_position_uses_layer_transform() {
    let mut store = EntityStore::new();
    store.ingest(&snapshot(EntityKind::Ship, 1, (3.0, 4.0), (0.0, 0.0)), 0);
    let mut scene = Scene::default();
    scene.update(&store, 0);

    let key = EntityKey::new(EntityKind::Ship, 1);
    assert_eq!(scene.screen_position(&key), Some(glam::DVec2::new(3.0, 4.0)));
}

#[test]
fn test_layer_render_target() {
    let mut scene = Scene::default();
    let target = starwatch_view::TargetSet::target_mut(&mut scene, &LayerId::Ships).unwrap();
    target.move_by(glam::DVec2::new(2.0, 0.0));
    target.set_scale(glam::DVec2::splat(3.0));

    let layer = scene.layer(LayerId::Ships).unwrap();
    assert_eq!(layer.translation(), glam::DVec2::new(2.0, 0.0));
    assert_eq!(layer.to_screen(Position::new(1.0, 1.0)), glam::DVec2::new(5.0, 3.0));
}

// ---- Ingest ----

#[test]
fn test_apply_batch_report() {
    let mut store = EntityStore::new();
    let first = decode_batch(
        r#"{"ts": 1000, "items": [
            {"type": "ship", "id": 1, "pos": [0, 0, 0, 0]},
            {"type": "ship", "id": 2, "pos": [0, 0]}
        ]}"#,
    )
    .unwrap();
    let report = apply_batch(&mut store, first);
    assert_eq!(report.server_us, 1000);
    assert_eq!(report.created, 1);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].index, 1);

    let second = decode_batch(
        r#"{"ts": 1000, "items": [{"type": "ship", "id": 1, "pos": [1, 1, 0, 0]}]}"#,
    )
    .unwrap();
    let report = apply_batch(&mut store, second);
    assert_eq!(report.stale, 1);
    assert_eq!(report.accepted(), 1);

    let third = decode_batch(
        r#"{"ts": 2000, "items": [{"type": "ship", "id": 1, "pos": [1, 1, 0, 0]}]}"#,
    )
    .unwrap();
    assert_eq!(apply_batch(&mut store, third).updated, 1);
    assert_eq!(store.len(), 1);
}
