//! Ready-made scene pieces shared by the demos.

use glam::{Vec3, Vec4};
use halcyon_scene::{
    Background, Camera, Entity, Geometry, Light, LightKey, Material, SceneState, ShadowBounds,
    ShadowConfig, Transform, color_from_hex,
};

/// Shadow-casting key light at (100, 100, 100) aimed at the origin, plus a
/// dim ambient fill.
pub fn basic_lighting(scene: &mut SceneState) -> (LightKey, LightKey) {
    let sun = Light::new_directional(color_from_hex(0xffffff), 3.0, Vec3::splat(100.0), Vec3::ZERO)
        .with_shadow(ShadowConfig {
            bias: -0.01,
            map_size: 2048,
            bounds: ShadowBounds {
                near: 1.0,
                far: 500.0,
                left: 200.0,
                right: -200.0,
                top: 200.0,
                bottom: -200.0,
            },
        });
    let ambient = Light::new_ambient(color_from_hex(0x404040), 1.0);

    (scene.add_light(sun), scene.add_light(ambient))
}

/// 60° perspective camera at (0, 0, 150) looking at the origin.
#[must_use]
pub fn default_camera(aspect: f32) -> Camera {
    Camera::new_perspective(60.0, aspect, 1.0, 1000.0)
        .with_position(Vec3::new(0.0, 0.0, 150.0))
        .looking_at(Vec3::ZERO)
}

/// A large flat plane lying in XZ that receives shadows.
#[must_use]
pub fn ground_plane(size: f32, color: u32) -> Entity {
    Entity::new(Geometry::plane(size, size), Material::color(color_from_hex(color)))
        .with_name("ground")
        .with_transform(Transform::IDENTITY.with_rotation_euler(-std::f32::consts::FRAC_PI_2, 0.0, 0.0))
        .with_shadows(false, true)
}

/// Opaque clear-color background from a hex RGB value.
#[must_use]
pub fn solid_background(hex: u32) -> Background {
    Background::Color(Vec4::from((color_from_hex(hex), 1.0)))
}
