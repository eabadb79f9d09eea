//! Configuration files on disk

use std::path::PathBuf;
use std::rc::Rc;

use approx::assert_relative_eq;
use sat_engine::prelude::*;

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("sat_engine_{}_{name}", std::process::id()))
}

#[test]
fn toml_round_trip() {
    let path = scratch_path("round_trip.toml");
    let mut config = CollisionConfig::default();
    config.mask_filter = MaskFilter::Intersecting;
    config.polygon_axes = PolygonAxes::Both;
    config.broad_phase.kind = BroadPhaseKind::Quadtree;
    config.broad_phase.quadtree.query_radius = 48.0;

    config.save_to_file(&path).unwrap();
    let loaded = CollisionConfig::load_from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.mask_filter, MaskFilter::Intersecting);
    assert_eq!(loaded.polygon_axes, PolygonAxes::Both);
    assert_eq!(loaded.broad_phase.kind, BroadPhaseKind::Quadtree);
    assert_eq!(loaded.broad_phase.quadtree, config.broad_phase.quadtree);
    loaded.validate().unwrap();
}

#[test]
fn ron_round_trip() {
    let path = scratch_path("round_trip.ron");
    let mut config = CollisionConfig::default();
    config.collide_self = true;
    config.broad_phase.grid.cell_size = 12.5;

    config.save_to_file(&path).unwrap();
    let loaded = CollisionConfig::load_from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert!(loaded.collide_self);
    assert_relative_eq!(loaded.broad_phase.grid.cell_size, 12.5);
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let path = scratch_path("does_not_exist.toml");
    let config = CollisionConfig::load_or_default(&path).unwrap();
    assert_eq!(config.mask_filter, MaskFilter::Literal);
    assert_eq!(config.broad_phase.kind, BroadPhaseKind::Grid);
}

#[test]
fn unknown_extension_is_rejected() {
    let path = scratch_path("config.yaml");
    let err = CollisionConfig::default().save_to_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
}

#[test]
fn configured_index_drives_colliders() {
    let path = scratch_path("quadtree.toml");
    std::fs::write(
        &path,
        "mask_filter = \"Intersecting\"\n\n[broad_phase]\nkind = \"Quadtree\"\n\n[broad_phase.quadtree]\nquery_radius = 16.0\n",
    )
    .unwrap();
    let config = CollisionConfig::load_from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let index = config.broad_phase.build();
    let collider = ConvexColliderComponent::with_config(Entity::new(1), Rc::clone(&index), &config);
    assert_eq!(collider.collision_mask().unwrap(), CollisionMask::ALL);
    assert_eq!(collider.narrow_phase().polygon_axes(), PolygonAxes::HostOnly);

    index.borrow_mut().update_object(Entity::new(2), Vec2::new(20.0, 0.0));
    assert!(index.borrow().query_pcl(Vec2::zeros()).is_empty());
    assert_eq!(index.borrow().query_pcl(Vec2::new(10.0, 0.0)), vec![Entity::new(2)]);
}
