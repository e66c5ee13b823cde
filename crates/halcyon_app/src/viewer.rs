//! The viewer aggregate and its frame loop.
//!
//! [`ViewerState`] owns every component of a running viewer. The host calls
//! [`ViewerState::frame`] from its display-refresh callback; each frame runs
//! the same fixed sequence:
//!
//! 1. Poll in-flight loads and apply finished ones
//! 2. Tick the clock
//! 3. Write time-driven shader parameters
//! 4. Advance animation playback by the frame delta
//! 5. Render the scene through the camera
//! 6. Request the next frame
//!
//! Updates always precede rendering, so a frame shows the state for its own
//! timestamp.

use std::sync::Arc;

use futures::future::BoxFuture;
use glam::UVec2;
use halcyon_animation::AnimationMixer;
use halcyon_assets::{
    AssetLoader, CompletionQueue, CompletionSender, CubemapPaths, LoadCompletion, LoadTasks,
    LoadedMesh, RequestId,
};
use halcyon_core::{AssetError, Clock, Error, FrameTime, Result};
use halcyon_scene::{Background, Camera, Entity, EntityKey, Geometry, SceneState};
use rustc_hash::FxHashMap;

use crate::presets;
use crate::scheduler::{FrameScheduler, SchedulerState};
use crate::settings::ViewerSettings;
use crate::shader_params::{ShaderMode, ShaderParameterUpdater};
use crate::surface::{FrameView, RenderSurface};
use crate::viewport::ViewportManager;

/// What an in-flight request will do once it completes.
#[derive(Debug)]
enum PendingLoad {
    Mesh {
        template: Entity,
    },
    /// `generation` ties the load to one `load_animated_mesh` call.
    AnimatedMesh {
        template: Entity,
        generation: u64,
    },
    Clip {
        generation: u64,
    },
    Cubemap,
}

pub struct ViewerState {
    settings: ViewerSettings,

    clock: Clock,
    scene: SceneState,
    camera: Camera,
    viewport: ViewportManager,
    shader_params: ShaderParameterUpdater,
    mixer: AnimationMixer,
    scheduler: FrameScheduler,

    surface: Box<dyn RenderSurface>,
    loader: Arc<dyn AssetLoader>,
    tasks: LoadTasks,
    completions: CompletionQueue,
    pending: FxHashMap<RequestId, PendingLoad>,
    loaded_entities: FxHashMap<RequestId, EntityKey>,
    animation_generation: u64,

    redraw: Option<Box<dyn FnMut()>>,
    disposed: bool,
}

impl ViewerState {
    /// Creates a viewer over the system clock and starts its frame loop.
    ///
    /// Fails with [`Error::SurfaceUnavailable`] if the surface cannot be
    /// initialized; no frame loop exists in that case.
    pub fn new(
        settings: ViewerSettings,
        surface: Box<dyn RenderSurface>,
        loader: Arc<dyn AssetLoader>,
    ) -> Result<Self> {
        Self::with_clock(settings, surface, loader, Clock::new())
    }

    /// Like [`new`](Self::new) with an explicit clock.
    pub fn with_clock(
        settings: ViewerSettings,
        mut surface: Box<dyn RenderSurface>,
        loader: Arc<dyn AssetLoader>,
        clock: Clock,
    ) -> Result<Self> {
        let viewport = ViewportManager::new(settings.width, settings.height, 1.0);
        let aspect = if settings.height == 0 {
            1.0
        } else {
            settings.width as f32 / settings.height as f32
        };

        if let Err(e) = surface.initialize(viewport.physical_size()) {
            log::error!("Fatal: render surface initialization failed: {e}");
            return Err(match e {
                Error::SurfaceUnavailable(_) => e,
                other => Error::SurfaceUnavailable(other.to_string()),
            });
        }

        let mut scene = SceneState::new();
        scene.set_background(Background::Color(settings.clear_color()));

        let mixer = AnimationMixer::new()
            .with_auto_play(settings.auto_play)
            .with_loop_mode(settings.loop_mode.into())
            .with_time_scale(settings.time_scale);

        let mut scheduler = FrameScheduler::new();
        scheduler.start();

        log::info!(
            "Viewer '{}' started at {}x{}",
            settings.title,
            settings.width,
            settings.height
        );

        Ok(Self {
            camera: presets::default_camera(aspect),
            settings,
            clock,
            scene,
            viewport,
            shader_params: ShaderParameterUpdater::new(),
            mixer,
            scheduler,
            surface,
            loader,
            tasks: LoadTasks::new(),
            completions: CompletionQueue::new(),
            pending: FxHashMap::default(),
            loaded_entities: FxHashMap::default(),
            animation_generation: 0,
            redraw: None,
            disposed: false,
        })
    }

    // ========================================================================
    // Frame loop
    // ========================================================================

    /// Runs one frame. Returns the frame's timing, or `None` when the loop is
    /// not running.
    pub fn frame(&mut self) -> Option<FrameTime> {
        if !self.scheduler.begin_frame() {
            return None;
        }

        self.process_loads();

        let time = self.clock.tick();

        self.shader_params.update(time.elapsed_secs(), &mut self.scene);
        self.mixer.advance(time.delta_secs());

        let view = FrameView {
            scene: &self.scene,
            camera: &self.camera,
            time,
        };
        if let Err(e) = self.surface.render(&view) {
            log::error!("Render error: {e}");
        }

        if let Some(request_redraw) = &mut self.redraw {
            request_redraw();
        }

        Some(time)
    }

    /// Called at the end of every executed frame, typically to request the
    /// next display refresh.
    pub fn set_redraw_hook(&mut self, hook: impl FnMut() + 'static) {
        self.redraw = Some(Box::new(hook));
    }

    pub fn start(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        let started = self.scheduler.start();
        if started {
            self.clock.reset_delta();
        }
        started
    }

    pub fn pause(&mut self) -> bool {
        self.scheduler.pause()
    }

    /// Resumes a paused loop. The first frame after resuming reports the time
    /// since resuming as its delta, not the time since the last frame.
    pub fn resume(&mut self) -> bool {
        let resumed = self.scheduler.resume();
        if resumed {
            self.clock.reset_delta();
        }
        resumed
    }

    pub fn stop(&mut self) -> bool {
        self.scheduler.stop()
    }

    #[inline]
    #[must_use]
    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    // ========================================================================
    // Viewport
    // ========================================================================

    /// Handles a window resize in logical pixels.
    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(physical) = self.viewport.on_resize(width, height, &mut self.camera) {
            self.surface.resize(physical);
        }
    }

    /// Handles a device pixel density change.
    pub fn set_scale_factor(&mut self, scale_factor: f32) {
        if let Some(physical) = self.viewport.set_scale_factor(scale_factor) {
            self.surface.resize(physical);
        }
    }

    #[must_use]
    pub fn physical_size(&self) -> UVec2 {
        self.viewport.physical_size()
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Loads a mesh and adds `template` to the scene with the loaded geometry
    /// once it arrives. A failed load leaves the scene unchanged.
    pub fn load_mesh(&mut self, path: &str, template: Entity) -> RequestId {
        let request = self.completions.next_request_id();
        log::info!("Loading mesh '{path}' ({request:?})");
        let load = self.loader.load_mesh(path);
        self.spawn_load(request, PendingLoad::Mesh { template }, load, |request, result| {
            LoadCompletion::Mesh { request, result }
        });
        request
    }

    /// Loads a skinned mesh and a clip to play on it.
    ///
    /// Both loads start immediately. Playback begins once both have arrived,
    /// regardless of order. Any earlier animated load is abandoned.
    pub fn load_animated_mesh(&mut self, mesh_path: &str, clip_path: &str, template: Entity) -> (RequestId, RequestId) {
        self.animation_generation += 1;
        let generation = self.animation_generation;
        self.mixer.begin_loading();

        let mesh_request = self.completions.next_request_id();
        let clip_request = self.completions.next_request_id();
        log::info!("Loading animated mesh '{mesh_path}' with clip '{clip_path}'");

        let mesh_load = self.loader.load_mesh(mesh_path);
        self.spawn_load(
            mesh_request,
            PendingLoad::AnimatedMesh { template, generation },
            mesh_load,
            |request, result| LoadCompletion::Mesh { request, result },
        );

        let clip_load = self.loader.load_animation_clip(clip_path);
        self.spawn_load(
            clip_request,
            PendingLoad::Clip { generation },
            clip_load,
            |request, result| LoadCompletion::Clip { request, result },
        );

        (mesh_request, clip_request)
    }

    /// Loads six cubemap faces and makes them the scene background.
    pub fn load_cubemap(&mut self, paths: &CubemapPaths) -> RequestId {
        let request = self.completions.next_request_id();
        log::info!("Loading cubemap ({request:?})");
        let load = self.loader.load_cubemap(paths);
        self.spawn_load(request, PendingLoad::Cubemap, load, |request, result| {
            LoadCompletion::Cubemap { request, result }
        });
        request
    }

    /// Handle for posting completions from outside the built-in loaders.
    #[must_use]
    pub fn completion_sender(&self) -> CompletionSender {
        self.completions.sender()
    }

    /// Entity created by a finished mesh load.
    #[must_use]
    pub fn loaded_entity(&self, request: RequestId) -> Option<EntityKey> {
        self.loaded_entities.get(&request).copied()
    }

    /// Requests that have not completed yet.
    #[must_use]
    pub fn pending_loads(&self) -> usize {
        self.pending.len()
    }

    fn spawn_load<T: 'static>(
        &mut self,
        request: RequestId,
        pending: PendingLoad,
        load: BoxFuture<'static, std::result::Result<T, AssetError>>,
        finish: impl FnOnce(RequestId, std::result::Result<T, AssetError>) -> LoadCompletion + 'static,
    ) {
        if self.disposed {
            log::warn!("Ignoring load {request:?}: viewer disposed");
            return;
        }
        self.pending.insert(request, pending);
        let sender = self.completions.sender();
        self.tasks.spawn(async move {
            sender.send(finish(request, load.await));
        });
    }

    fn process_loads(&mut self) {
        self.tasks.poll();
        for completion in self.completions.drain() {
            self.apply_completion(completion);
        }
    }

    fn apply_completion(&mut self, completion: LoadCompletion) {
        let request = completion.request();
        let Some(pending) = self.pending.remove(&request) else {
            log::debug!("Ignoring completion for unknown request {request:?}");
            return;
        };

        match (pending, completion) {
            (PendingLoad::Mesh { template }, LoadCompletion::Mesh { result, .. }) => match result {
                Ok(loaded) => {
                    self.add_loaded_mesh(request, template, loaded);
                }
                Err(e) => log::warn!("Mesh load {request:?} failed: {e}"),
            },
            (PendingLoad::AnimatedMesh { template, generation }, LoadCompletion::Mesh { result, .. }) => {
                let current = generation == self.animation_generation;
                match result {
                    Ok(mut loaded) => {
                        let skeleton = loaded.skeleton.take();
                        self.add_loaded_mesh(request, template, loaded);
                        if !current {
                            return;
                        }
                        match skeleton {
                            Some(skeleton) => self.mixer.on_mesh_loaded(skeleton),
                            None => self.mixer.on_load_failed(AssetError::InvalidData(format!(
                                "mesh of request {request:?} has no skeleton"
                            ))),
                        }
                    }
                    Err(e) => {
                        log::warn!("Animated mesh load {request:?} failed: {e}");
                        if current {
                            self.mixer.on_load_failed(e);
                        }
                    }
                }
            }
            (PendingLoad::Clip { generation }, LoadCompletion::Clip { result, .. }) => {
                if generation != self.animation_generation {
                    log::debug!("Ignoring stale clip {request:?}");
                    return;
                }
                match result {
                    Ok(clip) => self.mixer.on_clip_loaded(Arc::new(clip)),
                    Err(e) => {
                        log::warn!("Clip load {request:?} failed: {e}");
                        self.mixer.on_load_failed(e);
                    }
                }
            }
            (PendingLoad::Cubemap, LoadCompletion::Cubemap { result, .. }) => match result {
                Ok(cubemap) => self.scene.set_background(Background::Cubemap(Arc::new(cubemap))),
                Err(e) => log::warn!("Cubemap load {request:?} failed: {e}"),
            },
            (pending, completion) => {
                log::warn!(
                    "Completion for {request:?} has the wrong kind (ok: {})",
                    completion.is_ok()
                );
                if let PendingLoad::AnimatedMesh { generation, .. } | PendingLoad::Clip { generation } = pending
                    && generation == self.animation_generation
                {
                    self.mixer.on_load_failed(AssetError::InvalidData(format!(
                        "request {request:?} completed with the wrong asset kind"
                    )));
                }
            }
        }
    }

    fn add_loaded_mesh(&mut self, request: RequestId, mut template: Entity, loaded: LoadedMesh) {
        log::info!(
            "Mesh '{}' ready: {} vertices",
            loaded.mesh.name,
            loaded.mesh.vertex_count
        );
        template.geometry = Geometry::Mesh(Arc::new(loaded.mesh));
        let key = self.scene.add_entity(template);
        self.loaded_entities.insert(request, key);
    }

    // ========================================================================
    // Shader parameters
    // ========================================================================

    pub fn bind_shader_mode(&mut self, entity: EntityKey, mode: ShaderMode) {
        self.shader_params.bind(entity, mode);
    }

    #[must_use]
    pub fn shader_params(&self) -> &ShaderParameterUpdater {
        &self.shader_params
    }

    pub fn shader_params_mut(&mut self) -> &mut ShaderParameterUpdater {
        &mut self.shader_params
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    #[must_use]
    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneState {
        &mut self.scene
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    #[must_use]
    pub fn viewport(&self) -> &ViewportManager {
        &self.viewport
    }

    #[must_use]
    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    pub fn mixer_mut(&mut self) -> &mut AnimationMixer {
        &mut self.mixer
    }

    #[must_use]
    pub fn surface(&self) -> &dyn RenderSurface {
        self.surface.as_ref()
    }

    /// Downcasts the render surface to its concrete type.
    #[must_use]
    pub fn surface_as<T: 'static>(&self) -> Option<&T> {
        self.surface.as_any().downcast_ref::<T>()
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Stops the loop and cancels every in-flight load. Completions that
    /// arrive afterwards are discarded. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        self.completions.close();
        self.tasks.abort_all();
        self.pending.clear();
        self.scheduler.stop();
        self.mixer.reset();
        self.redraw = None;

        log::info!("Viewer '{}' disposed", self.settings.title);
    }
}

impl Drop for ViewerState {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for ViewerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerState")
            .field("scheduler", &self.scheduler.state())
            .field("frame", &self.clock.frame_count())
            .field("entities", &self.scene.entity_count())
            .field("mixer", &self.mixer.state())
            .field("pending_loads", &self.pending.len())
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}
