//! Render output abstraction.
//!
//! The frame loop hands a [`FrameView`] to a [`RenderSurface`] once per frame.
//! [`HeadlessSurface`] records what it was given, which is how the frame loop
//! is exercised without a GPU.

use std::any::Any;

use glam::UVec2;
use halcyon_core::{FrameTime, Result};
use halcyon_scene::{Camera, EntityKey, ParamValue, SceneState};

/// Everything a surface needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub scene: &'a SceneState,
    pub camera: &'a Camera,
    pub time: FrameTime,
}

/// An output target the viewer renders into.
pub trait RenderSurface {
    /// Acquires the underlying output. Failure is fatal for the viewer.
    fn initialize(&mut self, physical_size: UVec2) -> Result<()>;

    /// Reconfigures the output buffer. Both dimensions are non-zero.
    fn resize(&mut self, physical_size: UVec2);

    /// Draws one frame. Errors are logged by the caller and the loop goes on.
    fn render(&mut self, view: &FrameView<'_>) -> Result<()>;

    /// Downcast support for backend-specific access.
    fn as_any(&self) -> &dyn Any;
}

/// What a [`HeadlessSurface`] saw for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    pub frame: u64,
    pub elapsed: f32,
    pub physical_size: UVec2,
    pub camera_aspect: f32,
    /// Shader parameters of every entity, sorted by entity name then
    /// parameter name.
    pub params: Vec<(EntityKey, String, ParamValue)>,
}

impl FrameRecord {
    /// First recorded value of `param` on `entity`.
    #[must_use]
    pub fn param(&self, entity: EntityKey, param: &str) -> Option<ParamValue> {
        self.params
            .iter()
            .find_map(|(key, name, value)| (*key == entity && name == param).then_some(*value))
    }
}

/// A surface without any output that keeps a log of rendered frames.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    available: bool,
    initialized: bool,
    physical_size: UVec2,
    resizes: Vec<UVec2>,
    frames: Vec<FrameRecord>,
}

impl HeadlessSurface {
    #[must_use]
    pub fn new() -> Self {
        Self {
            available: true,
            ..Self::default()
        }
    }

    /// A surface whose initialization always fails.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[must_use]
    pub fn physical_size(&self) -> UVec2 {
        self.physical_size
    }

    /// Every size the surface was configured with, in order.
    #[must_use]
    pub fn resizes(&self) -> &[UVec2] {
        &self.resizes
    }

    #[must_use]
    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<&FrameRecord> {
        self.frames.last()
    }
}

impl RenderSurface for HeadlessSurface {
    fn initialize(&mut self, physical_size: UVec2) -> Result<()> {
        if !self.available {
            return Err(halcyon_core::Error::SurfaceUnavailable(
                "headless surface marked unavailable".to_string(),
            ));
        }
        self.initialized = true;
        self.physical_size = physical_size;
        self.resizes.push(physical_size);
        Ok(())
    }

    fn resize(&mut self, physical_size: UVec2) {
        self.physical_size = physical_size;
        self.resizes.push(physical_size);
    }

    fn render(&mut self, view: &FrameView<'_>) -> Result<()> {
        let mut entities: Vec<_> = view.scene.entities().collect();
        entities.sort_by(|(_, a), (_, b)| a.name.cmp(&b.name));

        let mut params = Vec::new();
        for (key, entity) in entities {
            let mut values: Vec<_> = entity.params().iter().collect();
            values.sort_by(|(a, _), (b, _)| a.cmp(b));
            params.extend(values.into_iter().map(|(name, value)| (key, name.to_string(), value)));
        }

        self.frames.push(FrameRecord {
            frame: view.time.frame,
            elapsed: view.time.elapsed_secs(),
            physical_size: self.physical_size,
            camera_aspect: view.camera.aspect(),
            params,
        });
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
