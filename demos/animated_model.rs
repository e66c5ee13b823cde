//! Animated model: loads a skinned glTF mesh and an animation clip in the
//! background and starts playback once both have arrived.
//!
//! ```sh
//! cargo run --example animated_model --features winit -- model.glb [clip.glb]
//! ```
//!
//! Without a separate clip file the first animation of the model is used.

use std::time::Duration;

use halcyon::{
    App, Entity, FrameTime, Geometry, Material, MixerState, RequestId, ViewerHandler, ViewerSettings,
    ViewerState, color_from_hex, init_logging, presets,
};

struct AnimatedModel {
    mesh_request: Option<RequestId>,
    framed: bool,
    last_state: MixerState,
    since_report: Duration,
}

impl ViewerHandler for AnimatedModel {
    fn init(viewer: &mut ViewerState) -> Self {
        let scene = viewer.scene_mut();
        presets::basic_lighting(scene);
        scene.set_background(presets::solid_background(0x1a1a1a));
        scene.add_entity(presets::ground_plane(400.0, 0x606060));

        let mut args = std::env::args().skip(1);
        let mesh_request = match args.next() {
            Some(mesh_path) => {
                let clip_path = args.next().unwrap_or_else(|| mesh_path.clone());
                let template = Entity::new(Geometry::sphere(1.0), Material::color(color_from_hex(0xd0c0a0)))
                    .with_name("model")
                    .with_shadows(true, true);
                let (mesh_request, _) = viewer.load_animated_mesh(&mesh_path, &clip_path, template);
                Some(mesh_request)
            }
            None => {
                log::warn!("No model given; pass a .gltf or .glb path");
                None
            }
        };

        Self {
            mesh_request,
            framed: false,
            last_state: viewer.mixer().state(),
            since_report: Duration::ZERO,
        }
    }

    fn update(&mut self, viewer: &mut ViewerState, last: &FrameTime) {
        if !self.framed {
            self.frame_model(viewer);
        }

        let mixer = viewer.mixer();
        if mixer.state() != self.last_state {
            log::info!("Mixer: {:?} -> {:?}", self.last_state, mixer.state());
            if let Some(e) = mixer.last_error() {
                log::error!("Animation load failed: {e}");
            }
            self.last_state = mixer.state();
        }

        self.since_report += last.delta;
        if self.since_report >= Duration::from_secs(2) {
            self.since_report = Duration::ZERO;
            if let Some(time) = mixer.playback_time() {
                log::info!("Playback time: {time:.2}s");
            }
        }
    }
}

impl AnimatedModel {
    /// Points the camera at the model once its mesh has arrived.
    fn frame_model(&mut self, viewer: &mut ViewerState) {
        let Some(key) = self.mesh_request.and_then(|request| viewer.loaded_entity(request)) else {
            return;
        };
        self.framed = true;

        let Some(Geometry::Mesh(mesh)) = viewer.scene().entity(key).map(|e| e.geometry.clone()) else {
            return;
        };
        if mesh.bounds.is_empty() {
            return;
        }
        let center = mesh.bounds.center();
        let camera = viewer.camera_mut();
        camera.target = center;
        camera.position = center + glam::Vec3::new(0.0, 0.0, mesh.bounds.size().length() * 1.5);
        log::info!("Framed '{}' at {center}", mesh.name);
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let settings = ViewerSettings::default().with_title("Halcyon: Animated Model");
    App::new().with_settings(settings).run::<AnimatedModel>()?;
    Ok(())
}
