//! Scene Tests
//!
//! Tests for:
//! - entity and light collections (insert, lookup, idempotent removal)
//! - backgrounds
//! - shader programs and parameter sets
//! - presets

use std::sync::Arc;

use glam::{Quat, Vec3, Vec4};

use halcyon::app::presets;
use halcyon::scene::{
    Background, CubemapData, Entity, Geometry, Light, LightKind, Material, ParamValue, SceneState,
    ShaderParameterSet, ShaderProgram, Transform, color_from_hex,
};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn red_box() -> Entity {
    Entity::new(Geometry::plane(1.0, 1.0), Material::color(Vec3::X)).with_name("box")
}

// ============================================================================
// Entities & Lights
// ============================================================================

#[test]
fn add_and_lookup_entities() {
    let mut scene = SceneState::new();
    let a = scene.add_entity(red_box());
    let b = scene.add_entity(red_box().with_name("other"));

    assert_eq!(scene.entity_count(), 2);
    assert_eq!(scene.entity(a).unwrap().name, "box");
    assert_eq!(scene.find_entity("other"), Some(b));
    assert_eq!(scene.find_entity("missing"), None);
}

#[test]
fn entity_removal_is_idempotent() {
    let mut scene = SceneState::new();
    let key = scene.add_entity(red_box());

    assert!(scene.remove_entity(key).is_some());
    assert!(scene.remove_entity(key).is_none());
    assert!(!scene.contains_entity(key));
    assert_eq!(scene.entity_count(), 0);
}

#[test]
fn light_removal_is_idempotent() {
    let mut scene = SceneState::new();
    let key = scene.add_light(Light::new_ambient(Vec3::ONE, 0.5));

    assert_eq!(scene.light_count(), 1);
    assert!(scene.remove_light(key).is_some());
    assert!(scene.remove_light(key).is_none());
}

#[test]
fn clear_empties_scene() {
    let mut scene = SceneState::new();
    scene.add_entity(red_box());
    scene.add_light(Light::new_ambient(Vec3::ONE, 1.0));
    scene.clear();

    assert_eq!(scene.entity_count(), 0);
    assert_eq!(scene.light_count(), 0);
}

// ============================================================================
// Background
// ============================================================================

#[test]
fn background_defaults_to_opaque_color() {
    let scene = SceneState::new();
    assert!(matches!(scene.background(), Background::Color(_)));
    assert!(approx(scene.background().clear_color().w, 1.0));
}

#[test]
fn cubemap_background_clears_with_average_color() {
    let face = vec![255, 0, 0, 255];
    let cubemap = CubemapData {
        face_size: 1,
        faces: std::array::from_fn(|_| face.clone()),
    };

    let mut scene = SceneState::new();
    scene.set_background(Background::Cubemap(Arc::new(cubemap)));

    let clear = scene.background().clear_color();
    assert!(approx(clear.x, 1.0) && approx(clear.y, 0.0));
}

// ============================================================================
// Shader Programs & Parameters
// ============================================================================

#[test]
fn program_hash_depends_on_source_and_uniforms() {
    let a = ShaderProgram::new("a", "fn fs_main() {}", ["time"]);
    let renamed = ShaderProgram::new("renamed", "fn fs_main() {}", ["time"]);
    let other_uniform = ShaderProgram::new("a", "fn fs_main() {}", ["color"]);
    let other_source = ShaderProgram::new("a", "fn fs_main() { }", ["time"]);

    assert_eq!(a.hash(), renamed.hash());
    assert_ne!(a.hash(), other_uniform.hash());
    assert_ne!(a.hash(), other_source.hash());
    assert_eq!(a.uniforms(), &["time"]);
}

#[test]
fn parameter_set_typed_accessors() {
    let mut params = ShaderParameterSet::new().with("time", 1.5_f32);
    params.set("tint", ParamValue::Color(Vec3::new(0.1, 0.2, 0.3)));

    assert_eq!(params.scalar("time"), Some(1.5));
    assert_eq!(params.color("tint"), Some(Vec3::new(0.1, 0.2, 0.3)));
    assert_eq!(params.scalar("tint"), None);
    assert_eq!(params.len(), 2);

    let previous = params.set("time", 2.0_f32);
    assert_eq!(previous, Some(ParamValue::Scalar(1.5)));
    assert_eq!(params.remove("time"), Some(ParamValue::Scalar(2.0)));
    assert_eq!(params.len(), 1);
}

#[test]
fn param_values_widen_to_vec4() {
    assert_eq!(ParamValue::Scalar(2.0).to_vec4(), Vec4::new(2.0, 0.0, 0.0, 0.0));
    assert_eq!(ParamValue::Color(Vec3::ONE).to_vec4(), Vec4::ONE);
    assert_eq!(ParamValue::Vec3(Vec3::ONE).to_vec4(), Vec4::new(1.0, 1.0, 1.0, 0.0));
}

#[test]
fn hex_colors_are_linearized() {
    assert_eq!(color_from_hex(0xffffff), Vec3::ONE);
    assert_eq!(color_from_hex(0x000000), Vec3::ZERO);

    let grey = color_from_hex(0x404040);
    assert!(grey.x > 0.0 && grey.x < 64.0 / 255.0, "expected linear value, got {}", grey.x);
}

// ============================================================================
// Transforms & Lights
// ============================================================================

#[test]
fn transform_matrix_applies_scale_rotation_translation() {
    let transform = Transform::from_position(Vec3::new(0.0, -40.0, 0.0))
        .with_rotation_euler(-std::f32::consts::FRAC_PI_2, 0.0, 0.0)
        .with_scale(Vec3::splat(2.0));

    // A point on the plane's local +Y edge ends up along -Z after lying flat.
    let p = transform.matrix().transform_point3(Vec3::Y);
    assert!((p - Vec3::new(0.0, -40.0, -2.0)).length() < 1e-4, "got {p}");
    assert_eq!(Transform::default().matrix_as_mat4(), glam::Mat4::IDENTITY);
    assert!(transform.rotation.angle_between(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2)) < 1e-4);
}

#[test]
fn directional_light_points_at_target() {
    let light = Light::new_directional(Vec3::ONE, 1.0, Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO);
    match light.kind {
        LightKind::Directional(sun) => assert_eq!(sun.direction(), Vec3::NEG_Y),
        other => panic!("expected directional light, got {other:?}"),
    }
}

// ============================================================================
// Presets
// ============================================================================

#[test]
fn basic_lighting_rig() {
    let mut scene = SceneState::new();
    let (sun, ambient) = presets::basic_lighting(&mut scene);

    let sun = scene.light(sun).unwrap();
    assert!(sun.casts_shadow());
    match &sun.kind {
        LightKind::Directional(light) => {
            assert_eq!(light.position, Vec3::splat(100.0));
            let shadow = light.shadow.as_ref().unwrap();
            assert_eq!(shadow.map_size, 2048);
            assert!(approx(shadow.bias, -0.01));
            assert!(approx(shadow.bounds.far, 500.0));
        }
        other => panic!("expected directional light, got {other:?}"),
    }

    let ambient = scene.light(ambient).unwrap();
    assert!(matches!(ambient.kind, LightKind::Ambient));
    assert_eq!(ambient.color, color_from_hex(0x404040));
}

#[test]
fn default_camera_looks_at_origin() {
    let camera = presets::default_camera(16.0 / 9.0);
    assert_eq!(camera.position, Vec3::new(0.0, 0.0, 150.0));
    assert_eq!(camera.target, Vec3::ZERO);
    assert!(approx(camera.fov, 60.0_f32.to_radians()));
    assert!(approx(camera.near, 1.0));
    assert!(approx(camera.far, 1000.0));
}

#[test]
fn ground_plane_receives_but_does_not_cast() {
    let ground = presets::ground_plane(200.0, 0x808080);
    assert!(ground.receive_shadow);
    assert!(!ground.cast_shadow);
    assert_eq!(ground.geometry.extent().x, 200.0);
}
