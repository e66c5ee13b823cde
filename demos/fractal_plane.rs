//! Fractal plane: a 100×100 plane whose fragment shader animates from the
//! elapsed time, in front of an optional skybox.
//!
//! ```sh
//! cargo run --example fractal_plane --features winit
//! ```

use halcyon::app::DEFAULT_TIME_PARAM;
use halcyon::{
    App, CubemapPaths, Entity, Geometry, Material, ShaderMode, ShaderParameterSet, ShaderProgram, ViewerHandler,
    ViewerSettings, ViewerState, init_logging, presets,
};

const FRACTAL_WGSL: &str = include_str!("shaders/fractal.wgsl");
const ASSET_ROOT: &str = env!("CARGO_MANIFEST_DIR");
const SKYBOX_DIR: &str = "demos/assets/skybox";

struct FractalPlane;

impl ViewerHandler for FractalPlane {
    fn init(viewer: &mut ViewerState) -> Self {
        presets::basic_lighting(viewer.scene_mut());

        if std::path::Path::new(ASSET_ROOT).join(SKYBOX_DIR).is_dir() {
            viewer.load_cubemap(&CubemapPaths::from_directory(SKYBOX_DIR, "png"));
        }

        let program = ShaderProgram::new("fractal", FRACTAL_WGSL, [DEFAULT_TIME_PARAM]);
        let params = ShaderParameterSet::new().with(DEFAULT_TIME_PARAM, 0.0_f32);
        let screen = Entity::new(Geometry::plane(100.0, 100.0), Material::shader(program, params))
            .with_name("screen")
            .with_shadows(false, true);

        let key = viewer.scene_mut().add_entity(screen);
        viewer.bind_shader_mode(key, ShaderMode::elapsed_time());

        FractalPlane
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let settings = ViewerSettings::default().with_title("Halcyon: Fractal Plane");
    App::new()
        .with_settings(settings)
        .with_asset_root(ASSET_ROOT)
        .run::<FractalPlane>()?;
    Ok(())
}
