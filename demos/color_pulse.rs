//! Colour pulse: a sphere oscillating between two colours over a ground
//! plane. Settings can be supplied as a JSON file in the first argument.

use glam::Vec3;
use halcyon::app::DEFAULT_COLOR_PARAM;
use halcyon::{
    App, Entity, Geometry, Material, ShaderMode, ShaderParameterSet, ShaderProgram, ViewerHandler, ViewerSettings,
    ViewerState, color_from_hex, init_logging, presets,
};

const PULSE_WGSL: &str = include_str!("shaders/color_pulse.wgsl");

struct ColorPulse;

impl ViewerHandler for ColorPulse {
    fn init(viewer: &mut ViewerState) -> Self {
        let scene = viewer.scene_mut();
        presets::basic_lighting(scene);
        scene.set_background(presets::solid_background(0x202830));

        let mut ground = presets::ground_plane(400.0, 0x808080);
        ground.transform.position = Vec3::new(0.0, -40.0, 0.0);
        scene.add_entity(ground);

        let from = color_from_hex(0xff3355);
        let to = color_from_hex(0x33aaff);

        let program = ShaderProgram::new("color_pulse", PULSE_WGSL, [DEFAULT_COLOR_PARAM]);
        let params = ShaderParameterSet::new().with(DEFAULT_COLOR_PARAM, from);
        let sphere = Entity::new(Geometry::sphere(30.0), Material::shader(program, params))
            .with_name("sphere")
            .with_shadows(true, false);

        let key = scene.add_entity(sphere);
        viewer.bind_shader_mode(key, ShaderMode::color_oscillation(from, to));

        ColorPulse
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let settings = match std::env::args().nth(1) {
        Some(path) => ViewerSettings::from_path(path)?,
        None => ViewerSettings::default(),
    };

    App::new()
        .with_settings(settings)
        .with_title("Halcyon: Colour Pulse")
        .run::<ColorPulse>()?;
    Ok(())
}
