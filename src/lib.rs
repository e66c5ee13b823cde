//! # Halcyon
//!
//! A small real-time 3D viewer core. It drives a single scene through a
//! fixed per-frame sequence: tick the clock, update time-driven shader
//! parameters, advance skeletal animation, then render.
//!
//! The workspace is split by concern and re-exported here:
//!
//! | Module | Crate | Contents |
//! |---|---|---|
//! | [`core`] | `halcyon_core` | clock, errors, fps counter |
//! | [`scene`] | `halcyon_scene` | entities, camera, lights, shader parameters |
//! | [`animation`] | `halcyon_animation` | tracks, clips, skeleton, mixer |
//! | [`assets`] | `halcyon_assets` | async loading and completion queue |
//! | [`app`] | `halcyon_app` | viewer state, viewport, scheduler, surfaces |
//!
//! Enable the `winit` feature for a windowed host backed by wgpu.

pub use halcyon_animation as animation;
pub use halcyon_app as app;
pub use halcyon_assets as assets;
pub use halcyon_core as core;
pub use halcyon_scene as scene;

pub use halcyon_animation::{AnimationClip, AnimationMixer, LoopMode, MixerState, Skeleton};
pub use halcyon_app::{
    FrameScheduler, HeadlessSurface, RenderSurface, SchedulerState, ShaderMode, ShaderParameterUpdater,
    ViewerSettings, ViewerState, ViewportManager, init_logging, presets,
};
pub use halcyon_assets::{AssetLoader, CubemapPaths, FileAssetLoader, LoadCompletion, RequestId};
pub use halcyon_core::{AssetError, Clock, Error, FrameTime, ManualTime, Result};
pub use halcyon_scene::{
    Background, Camera, Entity, EntityKey, Geometry, Light, Material, ParamValue, SceneState,
    ShaderParameterSet, ShaderProgram, Transform, color_from_hex,
};

#[cfg(feature = "winit")]
pub use halcyon_app::winit::{App, GpuSurface, ViewerHandler};
